//! Repository abstraction and coordination
//!
//! The `Repository` type wires the lower-level components together (database,
//! index, workspace, refs, config) and hosts the high-level commands, which
//! live one-per-file under `commands/`.

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::errors::GitletError;
use crate::areas::index::Index;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::Toc;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Repository directory name
pub const GITLET_DIR: &str = ".gitlet";

/// Object database directory name
pub const DATABASE_DIR: &str = "objects";

/// Index file name
pub const INDEX_FILE: &str = "index";

/// Config file name
pub const CONFIG_FILE: &str = "config";

/// Repository
///
/// Coordinates all repository operations. Commands are implemented as
/// methods in the `commands` module; this type owns the shared state.
pub struct Repository {
    /// Working copy root (equal to the repository directory when bare)
    root: Box<Path>,
    /// Repository directory holding HEAD, config, objects/ and refs/
    repo_path: Box<Path>,
    /// Output writer (stdout, or a sink for peer repositories)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Object database
    database: Database,
    /// Staging area
    index: RefCell<Index>,
    /// Reference manager
    refs: Refs,
    /// Working directory
    workspace: Workspace,
    /// Repository configuration
    config: RefCell<Config>,
}

impl Repository {
    /// Open an existing repository rooted at `path`
    ///
    /// A directory is a repository when it contains a `.gitlet` directory, or
    /// when it is itself a bare repository (a config file with `core.bare`
    /// set). Anything else fails with `NotInRepo`.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|_| GitletError::NotInRepo)?;

        let worktree_repo = path.join(GITLET_DIR);
        if worktree_repo.is_dir() {
            return Self::from_paths(path.clone(), worktree_repo, writer);
        }

        let config_path = path.join(CONFIG_FILE);
        if config_path.is_file() {
            let config = Config::load(config_path.into_boxed_path())?;
            if config.is_bare() {
                return Self::from_paths(path.clone(), path, writer);
            }
        }

        Err(GitletError::NotInRepo.into())
    }

    /// Open a peer repository for fetch, with its output discarded
    pub fn open_peer(path: &Path) -> anyhow::Result<Self> {
        Self::open(path, Box::new(std::io::sink()))
    }

    fn from_paths(
        root: PathBuf,
        repo_path: PathBuf,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let database = Database::new(repo_path.join(DATABASE_DIR).into_boxed_path());
        let index = Index::new(repo_path.join(INDEX_FILE).into_boxed_path());
        let refs = Refs::new(repo_path.clone().into_boxed_path());
        let workspace = Workspace::new(root.clone().into_boxed_path());
        let config = Config::load(repo_path.join(CONFIG_FILE).into_boxed_path())?;

        Ok(Repository {
            root: root.into_boxed_path(),
            repo_path: repo_path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            index: RefCell::new(index),
            refs,
            workspace,
            config: RefCell::new(config),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> RefMut<'_, Config> {
        self.config.borrow_mut()
    }

    /// Refuse working-copy commands on bare repositories
    pub(crate) fn require_work_tree(&self) -> anyhow::Result<()> {
        if self.config.borrow().is_bare() {
            return Err(GitletError::BareRepoRefusal.into());
        }
        Ok(())
    }

    /// Resolve a ref name or hash to an existing commit
    pub(crate) fn resolve_commit(&self, name: &str) -> anyhow::Result<ObjectId> {
        let oid = self
            .refs
            .hash_of(name)?
            .ok_or_else(|| GitletError::RefNotFound {
                name: name.to_string(),
            })?;

        if !self.database.exists(&oid) {
            return Err(GitletError::RefNotFound {
                name: name.to_string(),
            }
            .into());
        }
        if self.database.object_type(&oid)? != ObjectType::Commit {
            return Err(GitletError::NotACommit {
                name: name.to_string(),
            }
            .into());
        }

        Ok(oid)
    }

    /// Table of contents of the commit HEAD points at, empty before the
    /// first commit
    pub(crate) fn head_toc(&self) -> anyhow::Result<Toc> {
        match self.refs.read_hash(HEAD_REF_NAME)? {
            Some(head) => self.database.read_commit_toc(&head),
            None => Ok(Toc::new()),
        }
    }

    /// Hash every workspace file as a blob, without storing anything
    pub(crate) fn workspace_toc(&self) -> anyhow::Result<Toc> {
        let mut toc = Toc::new();
        for path in self.workspace.list_files(None)? {
            let blob = Blob::new(self.workspace.read_file(&path)?);
            toc.insert(path, blob.object_id()?);
        }
        Ok(toc)
    }
}
