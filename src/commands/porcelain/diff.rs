use crate::areas::errors::GitletError;
use crate::areas::repository::Repository;
use crate::artifacts::diff::tree_diff;
use std::io::Write;

impl Repository {
    /// Show changed paths between two snapshots
    ///
    /// With two commits their trees are compared; with one, that commit is
    /// compared against the index; with none, the index is compared against
    /// the working copy. Only `--name-status` output exists.
    pub fn diff(
        &mut self,
        name_status: bool,
        first: Option<&str>,
        second: Option<&str>,
    ) -> anyhow::Result<()> {
        if !name_status {
            return Err(GitletError::Unsupported {
                what: "diff without --name-status".to_string(),
            }
            .into());
        }

        let (a, b) = match (first, second) {
            (Some(first), Some(second)) => {
                let first_oid = self.resolve_commit(first)?;
                let second_oid = self.resolve_commit(second)?;
                (
                    self.database().read_commit_toc(&first_oid)?,
                    self.database().read_commit_toc(&second_oid)?,
                )
            }
            (Some(first), None) => {
                let first_oid = self.resolve_commit(first)?;
                let mut index = self.index();
                index.rehydrate()?;
                (self.database().read_commit_toc(&first_oid)?, index.toc())
            }
            (None, None) => {
                self.require_work_tree()?;
                let mut index = self.index();
                index.rehydrate()?;
                let index_toc = index.toc();
                drop(index);
                (index_toc, self.workspace_toc()?)
            }
            (None, Some(_)) => unreachable!("clap fills positionals in order"),
        };

        for (path, kind) in tree_diff::changed_paths(&a, &b) {
            writeln!(self.writer(), "{}\t{}", kind.as_letter(), path.display())?;
        }

        Ok(())
    }
}
