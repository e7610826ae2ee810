//! Table-of-contents diffing
//!
//! Diffs operate on flattened `path -> blob id` tables rather than on raw
//! trees: comparing two snapshots is then a walk over the union of their
//! keys. The same comparison powers the `diff` command, the checkout/merge
//! overwrite guard, and the three-way merge.

use crate::artifacts::objects::Toc;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-path classification between two tables of contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Modify,
    Delete,
    Same,
}

impl ChangeKind {
    /// Single-letter status used by `diff --name-status`
    pub fn as_letter(&self) -> &'static str {
        match self {
            ChangeKind::Add => "A",
            ChangeKind::Modify => "M",
            ChangeKind::Delete => "D",
            ChangeKind::Same => "S",
        }
    }
}

/// The hash pair the working copy needs to realize one file change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDelta {
    pub from: Option<ObjectId>,
    pub to: Option<ObjectId>,
}

/// Classify every path in the union of two tables of contents
///
/// A path is ADD when absent from `a`, DELETE when absent from `b`, MODIFY
/// when the hashes differ and SAME when they are equal.
pub fn name_status(a: &Toc, b: &Toc) -> BTreeMap<PathBuf, ChangeKind> {
    a.keys()
        .chain(b.keys())
        .map(|path| {
            let kind = match (a.get(path), b.get(path)) {
                (None, Some(_)) => ChangeKind::Add,
                (Some(_), None) => ChangeKind::Delete,
                (Some(from), Some(to)) if from != to => ChangeKind::Modify,
                _ => ChangeKind::Same,
            };
            (path.clone(), kind)
        })
        .collect()
}

/// Paths whose classification is not SAME
pub fn changed_paths(a: &Toc, b: &Toc) -> BTreeMap<PathBuf, ChangeKind> {
    name_status(a, b)
        .into_iter()
        .filter(|(_, kind)| *kind != ChangeKind::Same)
        .collect()
}

/// File-level plan turning snapshot `a` into snapshot `b`
///
/// Contains an entry per changed path with the `(from, to)` hash pair; SAME
/// paths are omitted.
pub fn file_plan(a: &Toc, b: &Toc) -> BTreeMap<PathBuf, FileDelta> {
    changed_paths(a, b)
        .into_keys()
        .map(|path| {
            let delta = FileDelta {
                from: a.get(&path).cloned(),
                to: b.get(&path).cloned(),
            };
            (path, delta)
        })
        .collect()
}

/// Paths a checkout or merge of `target` would clobber
///
/// A path blocks the operation when the working copy changed it relative to
/// HEAD *and* the target changes it relative to HEAD; applying the target
/// diff would then silently discard local work.
pub fn overwritten_paths(head: &Toc, target: &Toc, workspace: &Toc) -> Vec<PathBuf> {
    let local_changes = changed_paths(head, workspace);
    let target_changes = changed_paths(head, target);

    local_changes
        .into_keys()
        .filter(|path| target_changes.contains_key(path))
        .collect()
}
