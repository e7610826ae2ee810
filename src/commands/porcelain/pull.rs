use crate::areas::refs::FETCH_HEAD_REF_NAME;
use crate::areas::repository::Repository;

impl Repository {
    /// Fetch from a peer repository, then merge FETCH_HEAD
    ///
    /// The fetch completes before the merge begins.
    pub fn pull(&mut self, remote: &str) -> anyhow::Result<()> {
        self.require_work_tree()?;
        self.fetch(remote)?;
        self.merge(FETCH_HEAD_REF_NAME)
    }
}
