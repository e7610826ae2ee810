//! Index (staging area)
//!
//! The index tracks which blob belongs at which path in the next commit. It
//! bridges the working copy and the object store, and carries unresolved
//! merge conflicts as extra stages per path.
//!
//! ## Index File Format
//!
//! A newline-delimited text table, one entry per line:
//! ```text
//! <path> <stage>\t<hash>
//! ```
//! Stage 0 is normal staged content; stages 1, 2 and 3 are the base, receiver
//! and giver versions of a conflicted path. For any path, either a single
//! stage-0 entry exists or only conflict stages do, never both.

use crate::artifacts::objects::Toc;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Conflict stage numbers: base, receiver (ours), giver (theirs)
pub const CONFLICT_STAGES: [u8; 3] = [1, 2, 3];

/// Staging area
///
/// A sorted `(path, stage) -> hash` table persisted to the `index` file.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file
    path: Box<Path>,
    /// Staged entries keyed by path and stage
    entries: BTreeMap<(PathBuf, u8), ObjectId>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    /// Create a new empty index
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the index file
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// Parses the text table. A missing or empty file yields an empty index.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = String::new();
        std::io::Read::read_to_string(lock.deref_mut(), &mut content)?;

        for line in content.lines() {
            if line.is_empty() {
                continue;
            }

            let (front, hash) = line
                .split_once('\t')
                .ok_or_else(|| anyhow::anyhow!("malformed index entry: {}", line))?;
            let (path, stage) = front
                .rsplit_once(' ')
                .ok_or_else(|| anyhow::anyhow!("malformed index entry: {}", line))?;
            let stage = stage
                .parse::<u8>()
                .map_err(|_| anyhow::anyhow!("malformed index stage: {}", line))?;
            if stage > 3 {
                return Err(anyhow::anyhow!("invalid index stage {} for {}", stage, path));
            }

            self.entries.insert(
                (PathBuf::from(path), stage),
                ObjectId::try_parse(hash.to_string())?,
            );
        }

        Ok(())
    }

    /// Rewrite the index file from the in-memory table
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the index file during the rewrite.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        for ((path, stage), hash) in &self.entries {
            writeln!(
                lock.deref_mut(),
                "{} {}\t{}",
                path.display(),
                stage,
                hash
            )?;
        }
        self.changed = false;

        Ok(())
    }

    /// Stage-0 view of the index
    pub fn toc(&self) -> Toc {
        self.entries
            .iter()
            .filter(|((_, stage), _)| *stage == 0)
            .map(|((path, _), hash)| (path.clone(), hash.clone()))
            .collect()
    }

    pub fn has_entry(&self, path: &Path, stage: u8) -> bool {
        self.entries.contains_key(&(path.to_path_buf(), stage))
    }

    /// True iff any non-zero stage exists for the path
    pub fn is_conflicted(&self, path: &Path) -> bool {
        CONFLICT_STAGES
            .iter()
            .any(|stage| self.has_entry(path, *stage))
    }

    pub fn conflicted_paths(&self) -> Vec<PathBuf> {
        let mut paths = self
            .entries
            .keys()
            .filter(|(_, stage)| *stage != 0)
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();
        paths.dedup();
        paths
    }

    pub fn has_conflicts(&self) -> bool {
        self.entries.keys().any(|(_, stage)| *stage != 0)
    }

    /// Record normal staged content for a path, clearing any conflict stages
    pub fn stage_file(&mut self, path: &Path, oid: ObjectId) {
        for stage in CONFLICT_STAGES {
            self.entries.remove(&(path.to_path_buf(), stage));
        }
        self.entries.insert((path.to_path_buf(), 0), oid);
        self.changed = true;
    }

    /// Remove all stages for a path
    ///
    /// Removing a conflicted path is refused; conflicts are resolved by
    /// staging new content, not by dropping the entry.
    pub fn remove_file(&mut self, path: &Path) -> anyhow::Result<()> {
        if self.is_conflicted(path) {
            anyhow::bail!("cannot remove conflicted path {}", path.display());
        }

        self.entries.remove(&(path.to_path_buf(), 0));
        self.changed = true;

        Ok(())
    }

    /// Record a conflict for a path
    ///
    /// Drops the stage-0 entry and stores whichever of base/receiver/giver
    /// versions are present as stages 1, 2 and 3.
    pub fn stage_conflict(
        &mut self,
        path: &Path,
        base: Option<ObjectId>,
        receiver: Option<ObjectId>,
        giver: Option<ObjectId>,
    ) {
        self.entries.remove(&(path.to_path_buf(), 0));
        for (stage, oid) in CONFLICT_STAGES.into_iter().zip([base, receiver, giver]) {
            match oid {
                Some(oid) => {
                    self.entries.insert((path.to_path_buf(), stage), oid);
                }
                None => {
                    self.entries.remove(&(path.to_path_buf(), stage));
                }
            }
        }
        self.changed = true;
    }

    /// Replace the whole index with a stage-0 mirror of a table of contents
    pub fn replace_with_toc(&mut self, toc: &Toc) {
        self.entries = toc
            .iter()
            .map(|(path, hash)| ((path.clone(), 0), hash.clone()))
            .collect();
        self.changed = true;
    }

    /// Stage-0 paths equal to or nested under the given path
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|(_, stage)| *stage == 0)
            .filter(|(entry_path, _)| {
                if path == Path::new(".") || path == Path::new("") {
                    return true;
                }
                entry_path.starts_with(path)
            })
            .map(|(entry_path, _)| entry_path.clone())
            .collect()
    }
}
