use crate::areas::refs::{FetchedBranch, Refs};
use crate::areas::repository::Repository;
use crate::artifacts::merge::ancestry::CommitGraph;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

impl Repository {
    /// Copy objects and branch heads from a peer repository
    ///
    /// The peer is addressed by the filesystem path recorded under
    /// `remote.<name>.url` and opened through its own repository handle.
    /// Object transfer is idempotent; remote-tracking refs mirror the peer's
    /// local heads, and FETCH_HEAD records what a subsequent pull merges.
    pub fn fetch(&mut self, remote: &str) -> anyhow::Result<()> {
        let url = self
            .config()
            .remote_url(remote)
            .map(|url| url.to_string())
            .ok_or_else(|| anyhow::anyhow!("no remote named {}", remote))?;

        let peer_path = {
            let path = PathBuf::from(&url);
            if path.is_absolute() {
                path
            } else {
                self.root().join(path)
            }
        };
        let peer = Repository::open_peer(&peer_path)?;

        let mut copied = 0usize;
        for oid in peer.database().list_object_ids()? {
            if self.database().copy_object_from(peer.database(), &oid)? {
                copied += 1;
            }
        }
        debug!(remote, copied, "transferred objects from peer");

        let peer_heads = peer.refs().local_heads()?;
        let merge_branch = self.merge_candidate(remote, &peer_heads)?;

        writeln!(self.writer(), "From {}", url)?;

        let graph = CommitGraph::new(self.database());
        let mut fetched = Vec::new();
        for (branch, oid) in peer_heads {
            let remote_ref = Refs::to_remote_ref(remote, &branch);
            let previous = self.refs().read_hash(&remote_ref)?;

            // an update is forced iff the new head does not descend from the
            // previously tracked one
            let forced = match &previous {
                Some(previous) => !graph.is_ancestor(previous, &oid)?,
                None => false,
            };

            self.refs().write_ref(&remote_ref, oid.as_ref())?;
            writeln!(
                self.writer(),
                " * branch '{}' -> {}/{}{}",
                branch,
                remote,
                branch,
                if forced { " (forced)" } else { "" }
            )?;

            let for_merge = Some(&branch) == merge_branch.as_ref();
            fetched.push(FetchedBranch::new(branch, oid, for_merge));
        }

        self.refs().write_fetch_head(&fetched, &url)?;
        writeln!(self.writer(), "Fetched {} objects.", copied)?;

        Ok(())
    }

    /// Which peer branch a subsequent pull should merge
    ///
    /// The current branch's configured upstream wins; otherwise the peer's
    /// `master`, otherwise the first fetched branch.
    fn merge_candidate(
        &self,
        remote: &str,
        peer_heads: &[(String, ObjectId)],
    ) -> anyhow::Result<Option<String>> {
        if let Some(current) = self.refs().current_branch_name()?
            && let Some(upstream) = self.config().branch_upstream(&current).map(|u| u.to_string())
            && let Some((upstream_remote, upstream_branch)) = upstream.split_once('/')
            && upstream_remote == remote
            && peer_heads.iter().any(|(branch, _)| branch == upstream_branch)
        {
            return Ok(Some(upstream_branch.to_string()));
        }

        if peer_heads.iter().any(|(branch, _)| branch == "master") {
            return Ok(Some("master".to_string()));
        }

        Ok(peer_heads.first().map(|(branch, _)| branch.clone()))
    }
}
