use crate::areas::errors::GitletError;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Delete tracked files from the working copy and the index
    ///
    /// Refuses files whose working-copy content differs from HEAD, conflicted
    /// paths, and directories unless `-r` is given.
    pub fn rm(&mut self, paths: &[String], recursive: bool) -> anyhow::Result<()> {
        self.require_work_tree()?;

        let mut index = self.index();
        index.rehydrate()?;

        let head_toc = self.head_toc()?;
        let mut matched = Vec::new();

        for file_path in paths {
            let entries = index.entries_under_path(&PathBuf::from(file_path));
            if entries.is_empty() {
                return Err(GitletError::PathspecMismatch {
                    path: file_path.clone(),
                }
                .into());
            }

            if self.root().join(file_path).is_dir() && !recursive {
                anyhow::bail!("not removing '{}' recursively without -r", file_path);
            }

            matched.extend(entries);
        }

        for path in &matched {
            if index.is_conflicted(path) {
                return Err(GitletError::Unsupported {
                    what: format!("removing the conflicted path '{}'", path.display()),
                }
                .into());
            }
        }

        // refuse when any matched file was modified since HEAD
        let mut modified = Vec::new();
        for path in &matched {
            let workspace_hash = if self.workspace().file_exists(path) {
                Some(Blob::new(self.workspace().read_file(path)?).object_id()?)
            } else {
                None
            };
            if workspace_hash.as_ref() != head_toc.get(path) {
                modified.push(path.display().to_string());
            }
        }
        if !modified.is_empty() {
            return Err(GitletError::UncommittedChanges { paths: modified }.into());
        }

        for path in &matched {
            self.workspace().remove_file(path)?;
            index.remove_file(path)?;
            writeln!(self.writer(), "rm '{}'", path.display())?;
        }

        index.write_updates()?;

        Ok(())
    }
}
