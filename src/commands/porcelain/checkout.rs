use crate::areas::errors::GitletError;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::repository::Repository;
use crate::artifacts::diff::tree_diff;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Switch the working copy, index and HEAD to another branch or commit
    ///
    /// Refuses when local changes would be overwritten. A branch name leaves
    /// HEAD symbolic; a raw hash detaches it.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.require_work_tree()?;

        if self.refs().current_branch_name()?.as_deref() == Some(target) {
            writeln!(self.writer(), "Already on '{}'", target)?;
            return Ok(());
        }

        let target_oid = self.resolve_commit(target)?;
        let target_toc = self.database().read_commit_toc(&target_oid)?;
        let head_toc = self.head_toc()?;
        let workspace_toc = self.workspace_toc()?;

        let overwritten = tree_diff::overwritten_paths(&head_toc, &target_toc, &workspace_toc);
        if !overwritten.is_empty() {
            return Err(GitletError::UncommittedChanges {
                paths: overwritten
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect(),
            }
            .into());
        }

        // objects already exist; mutate the working copy, then the index,
        // then HEAD
        let plan = tree_diff::file_plan(&head_toc, &target_toc);
        self.workspace().apply_file_plan(&plan, self.database())?;

        let mut index = self.index();
        index.rehydrate()?;
        index.replace_with_toc(&target_toc);
        index.write_updates()?;
        drop(index);

        let is_branch = !ObjectId::looks_like_oid(target)
            && self
                .refs()
                .read_hash(&Refs::to_local_ref(target))?
                .is_some();
        if is_branch {
            self.refs()
                .write_ref(HEAD_REF_NAME, &format!("ref: {}", Refs::to_local_ref(target)))?;
            writeln!(self.writer(), "Switched to branch '{}'", target)?;
        } else {
            self.refs().write_ref(HEAD_REF_NAME, target_oid.as_ref())?;
            writeln!(
                self.writer(),
                "Note: switching to '{}' leaves HEAD detached at {}",
                target,
                target_oid.to_short_oid()
            )?;
        }

        Ok(())
    }
}
