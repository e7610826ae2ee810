use crate::areas::errors::GitletError;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;

impl Repository {
    /// Stage the files matched by each path argument
    ///
    /// Directories resolve recursively; an argument matching nothing is a
    /// pathspec error. Staging a conflicted path resolves its conflict.
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.require_work_tree()?;

        let mut index = self.index();
        index.rehydrate()?;

        for file_path in paths {
            let absolute_path = self.root().join(file_path);
            if !absolute_path.exists() {
                return Err(GitletError::PathspecMismatch {
                    path: file_path.clone(),
                }
                .into());
            }

            let matched = self.workspace().list_files(Some(&absolute_path))?;
            if matched.is_empty() {
                return Err(GitletError::PathspecMismatch {
                    path: file_path.clone(),
                }
                .into());
            }

            for path in matched {
                let data = self.workspace().read_file(&path)?;
                let blob_id = self.database().store(&Blob::new(data))?;
                index.stage_file(&path, blob_id);
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
