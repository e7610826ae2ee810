use crate::areas::errors::GitletError;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use std::path::Path;

impl Repository {
    /// Register or drop a single file in the index
    pub fn update_index(&mut self, add: bool, remove: bool, path: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        match (add, remove) {
            (true, false) => {
                self.require_work_tree()?;
                if !self.workspace().file_exists(Path::new(path)) {
                    return Err(GitletError::PathspecMismatch {
                        path: path.to_string(),
                    }
                    .into());
                }

                let data = self.workspace().read_file(Path::new(path))?;
                let blob_id = self.database().store(&Blob::new(data))?;
                index.stage_file(Path::new(path), blob_id);
            }
            (false, true) => {
                index.remove_file(Path::new(path))?;
            }
            _ => anyhow::bail!("update-index requires exactly one of --add or --remove"),
        }

        index.write_updates()
    }
}
