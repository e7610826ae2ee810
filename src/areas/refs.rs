//! References (branches, HEAD, remotes)
//!
//! References are human-readable names pointing at commits. A ref is either:
//! - Direct: containing a 40-hex commit hash
//! - Symbolic: containing `ref: <other-ref-name>`
//!
//! ## Reference namespaces
//!
//! - `HEAD`: the current checkout, symbolic when attached to a branch and
//!   direct when detached
//! - `refs/heads/*`: local branches
//! - `refs/remotes/<remote>/*`: remote-tracking branches
//! - `FETCH_HEAD`, `MERGE_HEAD`: transient refs written by fetch and merge
//!
//! Terminal resolution follows a chain of symbolic refs to the *name* of the
//! final direct ref; reading a hash dereferences that final ref.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";
pub const FETCH_HEAD_REF_NAME: &str = "FETCH_HEAD";
pub const MERGE_HEAD_REF_NAME: &str = "MERGE_HEAD";
const MERGE_MSG_FILE_NAME: &str = "MERGE_MSG";

const LOCAL_HEADS_PREFIX: &str = "refs/heads";
const REMOTE_HEADS_PREFIX: &str = "refs/remotes";

/// Symbolic chains longer than this indicate a cycle or corruption
const MAX_SYMREF_DEPTH: usize = 16;

/// One branch head transferred by fetch, as recorded in FETCH_HEAD
#[derive(Debug, Clone, new)]
pub struct FetchedBranch {
    pub branch: String,
    pub oid: ObjectId,
    pub for_merge: bool,
}

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { target: String },
    /// Direct object id
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                target: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

/// References manager
///
/// Handles reading and writing refs under the repository directory.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory holding HEAD, refs/ and friends
    path: Box<Path>,
}

impl Refs {
    /// Full ref name of a local branch
    pub fn to_local_ref(branch: &str) -> String {
        format!("{LOCAL_HEADS_PREFIX}/{branch}")
    }

    /// Full ref name of a remote-tracking branch
    pub fn to_remote_ref(remote: &str, branch: &str) -> String {
        format!("{REMOTE_HEADS_PREFIX}/{remote}/{branch}")
    }

    /// Check whether a name belongs to one of the recognized ref families
    pub fn is_valid_ref_name(name: &str) -> bool {
        if matches!(name, HEAD_REF_NAME | FETCH_HEAD_REF_NAME | MERGE_HEAD_REF_NAME) {
            return true;
        }

        if let Some(branch) = name.strip_prefix(&format!("{LOCAL_HEADS_PREFIX}/")) {
            return BranchName::try_parse(branch.to_string()).is_ok();
        }
        if let Some(rest) = name.strip_prefix(&format!("{REMOTE_HEADS_PREFIX}/")) {
            return match rest.split_once('/') {
                Some((remote, branch)) => {
                    !remote.is_empty() && BranchName::try_parse(branch.to_string()).is_ok()
                }
                None => false,
            };
        }

        false
    }

    /// Follow the symbolic chain from a ref and return the name of the final
    /// direct ref
    ///
    /// The returned name may not exist on disk yet; that is the name a write
    /// through this ref would create.
    pub fn terminal(&self, name: &str) -> anyhow::Result<String> {
        let mut current = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read(&self.path.join(&current))? {
                Some(SymRefOrOid::SymRef { target }) => current = target,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        Err(anyhow::anyhow!("symbolic ref chain too deep at {}", name))
    }

    /// Read the hash a ref resolves to, following symbolic links
    ///
    /// # Returns
    ///
    /// Some(hash) when the chain ends at an existing direct ref, None otherwise
    pub fn read_hash(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        if name == FETCH_HEAD_REF_NAME {
            return self.fetch_head_merge_hash();
        }

        let terminal = self.terminal(name)?;
        match SymRefOrOid::read(&self.path.join(&terminal))? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef { .. }) => unreachable!("terminal ref is symbolic"),
            None => Ok(None),
        }
    }

    /// Resolve a ref name or a literal hash to a hash
    ///
    /// A 40-hex argument is returned as-is. Otherwise the name is tried
    /// verbatim, then under `refs/heads/`, then under `refs/remotes/`.
    pub fn hash_of(&self, ref_or_hash: &str) -> anyhow::Result<Option<ObjectId>> {
        if ObjectId::looks_like_oid(ref_or_hash) {
            return Ok(Some(ObjectId::try_parse(ref_or_hash.to_string())?));
        }

        let candidates = [
            ref_or_hash.to_string(),
            Self::to_local_ref(ref_or_hash),
            format!("{REMOTE_HEADS_PREFIX}/{ref_or_hash}"),
        ];

        for candidate in candidates {
            if candidate == FETCH_HEAD_REF_NAME || self.path.join(&candidate).exists() {
                return self.read_hash(&candidate);
            }
        }

        Ok(None)
    }

    /// Store a literal value into a ref file
    ///
    /// The value may be a 40-hex hash or `ref: <name>`; it is written verbatim
    /// under an exclusive lock.
    pub fn write_ref(&self, name: &str, value: &str) -> anyhow::Result<()> {
        if !Self::is_valid_ref_name(name) {
            anyhow::bail!("refusing to write unrecognized ref {}", name);
        }

        debug!(name, value, "updating ref");
        self.write_ref_file(&self.path.join(name), value)
    }

    fn write_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to locate parent directory for ref file at {:?}", path)
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;
        lock.deref_mut().write_all(b"\n")?;

        Ok(())
    }

    fn delete_ref_file(&self, name: &str) -> anyhow::Result<()> {
        let path = self.path.join(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to delete ref file at {:?}", path))?;
        }
        Ok(())
    }

    /// Move the ref HEAD terminates in to a new commit
    ///
    /// When HEAD is attached this updates the branch; when detached it
    /// rewrites HEAD itself.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let terminal = self.terminal(HEAD_REF_NAME)?;
        self.write_ref(&terminal, oid.as_ref())
    }

    /// True when HEAD holds a raw hash rather than a branch pointer
    pub fn head_is_detached(&self) -> anyhow::Result<bool> {
        Ok(matches!(
            SymRefOrOid::read(&self.path.join(HEAD_REF_NAME))?,
            Some(SymRefOrOid::Oid(_))
        ))
    }

    /// Name of the currently checked-out branch, None when HEAD is detached
    pub fn current_branch_name(&self) -> anyhow::Result<Option<String>> {
        if self.head_is_detached()? {
            return Ok(None);
        }

        let terminal = self.terminal(HEAD_REF_NAME)?;
        Ok(terminal
            .strip_prefix(&format!("{LOCAL_HEADS_PREFIX}/"))
            .map(|branch| branch.to_string()))
    }

    /// All local branches with their head commits, sorted by name
    pub fn local_heads(&self) -> anyhow::Result<Vec<(String, ObjectId)>> {
        self.list_heads(&self.path.join(LOCAL_HEADS_PREFIX))
    }

    /// All tracking branches of one remote with their head commits
    pub fn remote_heads(&self, remote: &str) -> anyhow::Result<Vec<(String, ObjectId)>> {
        self.list_heads(&self.path.join(REMOTE_HEADS_PREFIX).join(remote))
    }

    fn list_heads(&self, base: &Path) -> anyhow::Result<Vec<(String, ObjectId)>> {
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut heads = WalkDir::new(base)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry
                    .path()
                    .strip_prefix(base)
                    .ok()?
                    .to_string_lossy()
                    .to_string();
                let oid = match SymRefOrOid::read(entry.path()) {
                    Ok(Some(SymRefOrOid::Oid(oid))) => oid,
                    _ => return None,
                };
                Some((name, oid))
            })
            .collect::<Vec<_>>();
        heads.sort();

        Ok(heads)
    }

    /// Serialize the FETCH_HEAD lines for a set of fetched branches
    ///
    /// Exactly one entry should carry `for_merge`; every other line is marked
    /// `not-for-merge`.
    pub fn compose_fetch_head(entries: &[FetchedBranch], remote_url: &str) -> String {
        entries
            .iter()
            .map(|entry| {
                let marker = if entry.for_merge { "" } else { "not-for-merge " };
                format!(
                    "{} {}branch '{}' of {}\n",
                    entry.oid, marker, entry.branch, remote_url
                )
            })
            .collect()
    }

    pub fn write_fetch_head(
        &self,
        entries: &[FetchedBranch],
        remote_url: &str,
    ) -> anyhow::Result<()> {
        let content = Self::compose_fetch_head(entries, remote_url);
        std::fs::write(self.path.join(FETCH_HEAD_REF_NAME), content)
            .context("failed to write FETCH_HEAD")
    }

    /// Hash of the one FETCH_HEAD entry a pull should merge
    fn fetch_head_merge_hash(&self) -> anyhow::Result<Option<ObjectId>> {
        let path = self.path.join(FETCH_HEAD_REF_NAME);
        if !path.exists() {
            return Ok(None);
        }

        for line in std::fs::read_to_string(&path)?.lines() {
            if line.contains("not-for-merge") {
                continue;
            }
            let hash = line
                .split_whitespace()
                .next()
                .ok_or_else(|| anyhow::anyhow!("malformed FETCH_HEAD line: {}", line))?;
            return Ok(Some(ObjectId::try_parse(hash.to_string())?));
        }

        Ok(None)
    }

    /// The commit being merged, when a merge is in progress
    pub fn merge_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read(&self.path.join(MERGE_HEAD_REF_NAME))? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef { .. }) => {
                Err(anyhow::anyhow!("MERGE_HEAD must be a direct ref"))
            }
            None => Ok(None),
        }
    }

    /// Record an in-progress merge: MERGE_HEAD plus the prepared message
    pub fn start_merge(&self, giver: &ObjectId, message: &str) -> anyhow::Result<()> {
        self.write_ref(MERGE_HEAD_REF_NAME, giver.as_ref())?;
        std::fs::write(self.path.join(MERGE_MSG_FILE_NAME), message)
            .context("failed to write MERGE_MSG")
    }

    /// Drop the in-progress merge state after a concluding commit
    pub fn conclude_merge(&self) -> anyhow::Result<()> {
        self.delete_ref_file(MERGE_HEAD_REF_NAME)?;
        let merge_msg = self.path.join(MERGE_MSG_FILE_NAME);
        if merge_msg.exists() {
            std::fs::remove_file(&merge_msg).context("failed to delete MERGE_MSG")?;
        }
        Ok(())
    }
}
