use crate::areas::errors::GitletError;
use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use std::io::Write;
use tracing::debug;

impl Repository {
    /// Record the staged tree as a new commit
    ///
    /// Parents are `[HEAD]` normally and `[HEAD, MERGE_HEAD]` while a merge
    /// is in progress; a concluding commit clears the merge state. The
    /// unmerged-files check runs before any object is written.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        if index.has_conflicts() {
            debug!(paths = ?index.conflicted_paths(), "unmerged paths block the commit");
            return Err(GitletError::UnmergedFiles.into());
        }

        let merge_head = self.refs().merge_head()?;
        let head = self.refs().read_hash(HEAD_REF_NAME)?;

        let tree_id = self.database().store_tree_from(&index.toc())?;

        if let Some(head_oid) = &head
            && merge_head.is_none()
            && self.database().load_commit(head_oid)?.tree() == &tree_id
        {
            anyhow::bail!("nothing to commit, working tree clean");
        }

        let parents = head.into_iter().chain(merge_head.clone()).collect();
        let author = Author::load_from_env()?;
        let commit = Commit::new(tree_id, parents, author, message.trim().to_string());
        let commit_id = self.database().store(&commit)?;

        self.refs().update_head(&commit_id)?;
        if merge_head.is_some() {
            self.refs().conclude_merge()?;
        }

        let location = match self.refs().current_branch_name()? {
            Some(branch) => branch,
            None => "detached HEAD".to_string(),
        };
        writeln!(
            self.writer(),
            "[{} {}] {}",
            location,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
