use crate::areas::repository::{CONFIG_FILE, DATABASE_DIR, GITLET_DIR, Repository};
use crate::areas::config::Config;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Create the repository skeleton at `path` and open it
    ///
    /// Lays down the repository directory with HEAD pointing at an unborn
    /// `master` branch, an empty object store, and the refs namespaces.
    pub fn init_at(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Repository> {
        let repo_path = path.join(GITLET_DIR);
        if repo_path.exists() {
            anyhow::bail!(
                "a gitlet repository already exists in {}",
                path.display()
            );
        }

        std::fs::create_dir_all(repo_path.join(DATABASE_DIR))?;
        std::fs::create_dir_all(repo_path.join("refs").join("heads"))?;
        std::fs::create_dir_all(repo_path.join("refs").join("remotes"))?;
        std::fs::write(repo_path.join("HEAD"), "ref: refs/heads/master\n")?;

        let mut config = Config::load(repo_path.join(CONFIG_FILE).into_boxed_path())?;
        config.set_bare(false);
        config.store()?;

        let repository = Repository::open(path, writer)?;
        writeln!(
            repository.writer(),
            "Initialized empty Gitlet repository in {}",
            repository.repo_path().display()
        )?;

        Ok(repository)
    }
}
