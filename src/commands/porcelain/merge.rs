use crate::areas::errors::GitletError;
use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::diff::tree_diff;
use crate::artifacts::merge::ancestry::CommitGraph;
use crate::artifacts::merge::three_way::{self, MergeOutcome};
use crate::artifacts::objects::Toc;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;
use tracing::debug;

impl Repository {
    /// Merge another ref into the current branch
    ///
    /// Ancestor givers are a no-op; a receiver that is an ancestor of the
    /// giver fast-forwards; anything else runs a three-way merge against the
    /// lowest common ancestor and leaves MERGE_HEAD behind for the
    /// concluding commit.
    pub fn merge(&mut self, target: &str) -> anyhow::Result<()> {
        self.require_work_tree()?;

        if self.refs().head_is_detached()? {
            return Err(GitletError::Unsupported {
                what: "merging with a detached HEAD".to_string(),
            }
            .into());
        }

        let giver = self.resolve_commit(target)?;
        let giver_toc = self.database().read_commit_toc(&giver)?;
        let workspace_toc = self.workspace_toc()?;

        // merging into an unborn branch adopts the giver outright
        let Some(receiver) = self.refs().read_hash(HEAD_REF_NAME)? else {
            let receiver_toc = Toc::new();
            let overwritten =
                tree_diff::overwritten_paths(&receiver_toc, &giver_toc, &workspace_toc);
            if !overwritten.is_empty() {
                return Err(GitletError::UncommittedChanges {
                    paths: overwritten
                        .iter()
                        .map(|path| path.display().to_string())
                        .collect(),
                }
                .into());
            }
            return self.fast_forward(&receiver_toc, &giver, &giver_toc);
        };

        let graph = CommitGraph::new(self.database());
        if graph.is_ancestor(&giver, &receiver)? {
            writeln!(self.writer(), "Already up-to-date.")?;
            return Ok(());
        }

        let receiver_toc = self.database().read_commit_toc(&receiver)?;

        let overwritten =
            tree_diff::overwritten_paths(&receiver_toc, &giver_toc, &workspace_toc);
        if !overwritten.is_empty() {
            return Err(GitletError::UncommittedChanges {
                paths: overwritten
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect(),
            }
            .into());
        }

        if graph.is_ancestor(&receiver, &giver)? {
            self.fast_forward(&receiver_toc, &giver, &giver_toc)
        } else {
            let base = graph
                .common_ancestor(&receiver, &giver)?
                .ok_or_else(|| anyhow::anyhow!("no common ancestor with {}", target))?;
            debug!(receiver = %receiver, giver = %giver, base = %base, "three-way merge");
            self.three_way_merge(target, &base, &receiver_toc, &giver, &giver_toc)
        }
    }

    /// Move HEAD's branch to the giver and mirror its snapshot
    fn fast_forward(
        &self,
        receiver_toc: &Toc,
        giver: &ObjectId,
        giver_toc: &Toc,
    ) -> anyhow::Result<()> {
        let plan = tree_diff::file_plan(receiver_toc, giver_toc);
        self.workspace().apply_file_plan(&plan, self.database())?;

        let mut index = self.index();
        index.rehydrate()?;
        index.replace_with_toc(giver_toc);
        index.write_updates()?;
        drop(index);

        self.refs().update_head(giver)?;
        writeln!(self.writer(), "Fast-forward")?;

        Ok(())
    }

    /// Reconcile receiver and giver against their common ancestor
    fn three_way_merge(
        &self,
        target: &str,
        base: &ObjectId,
        receiver_toc: &Toc,
        giver: &ObjectId,
        giver_toc: &Toc,
    ) -> anyhow::Result<()> {
        let base_toc = self.database().read_commit_toc(base)?;
        let plan = three_way::merge_plan(&base_toc, receiver_toc, giver_toc);

        let mut index = self.index();
        index.rehydrate()?;

        let mut conflicted = Vec::new();
        for (path, outcome) in &plan {
            match outcome {
                MergeOutcome::Keep => {}
                MergeOutcome::Take(oid) => {
                    let blob = self
                        .database()
                        .parse_object_as_blob(oid)?
                        .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", oid))?;
                    self.workspace().write_file(path, blob.content())?;
                    index.stage_file(path, oid.clone());
                }
                MergeOutcome::Drop => {
                    self.workspace().remove_file(path)?;
                    index.remove_file(path)?;
                }
                MergeOutcome::Conflict {
                    base,
                    receiver,
                    giver,
                } => {
                    let receiver_text = self.blob_text(receiver.as_ref())?;
                    let giver_text = self.blob_text(giver.as_ref())?;
                    let markers =
                        three_way::conflict_markers(&receiver_text, &giver_text, target);
                    self.workspace().write_file(path, markers.as_bytes())?;

                    index.stage_conflict(
                        path,
                        base.clone(),
                        receiver.clone(),
                        giver.clone(),
                    );
                    conflicted.push(path.clone());
                }
            }
        }

        index.write_updates()?;
        drop(index);

        self.refs()
            .start_merge(giver, &format!("Merge commit {}", target))?;

        if conflicted.is_empty() {
            writeln!(
                self.writer(),
                "Merge made by the three-way strategy; commit to conclude the merge."
            )?;
        } else {
            for path in &conflicted {
                writeln!(
                    self.writer(),
                    "CONFLICT (content): Merge conflict in {}",
                    path.display()
                )?;
            }
            writeln!(
                self.writer(),
                "Automatic merge failed; fix conflicts and then commit the result."
            )?;
        }

        Ok(())
    }

    fn blob_text(&self, oid: Option<&ObjectId>) -> anyhow::Result<String> {
        match oid {
            Some(oid) => {
                let blob = self
                    .database()
                    .parse_object_as_blob(oid)?
                    .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", oid))?;
                Ok(blob.content_as_text())
            }
            None => Ok(String::new()),
        }
    }
}
