//! Three-way file reconciliation
//!
//! Given the tables of contents of a merge base, the receiver (the current
//! branch's tip) and the giver (the commit being merged in), every path in
//! their union is classified into a per-file outcome. Conflicts carry all
//! surviving versions so the index can record them as stages and the working
//! copy can show conflict markers.

use crate::artifacts::objects::Toc;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-path result of the three-way classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The receiver's version (or absence) stands
    Keep,
    /// Adopt the giver's version
    Take(ObjectId),
    /// The path disappears from index and working copy
    Drop,
    /// The sides disagree; all surviving versions are recorded
    Conflict {
        base: Option<ObjectId>,
        receiver: Option<ObjectId>,
        giver: Option<ObjectId>,
    },
}

impl MergeOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeOutcome::Conflict { .. })
    }
}

/// Classify one path given its version in base, receiver and giver
pub fn classify(
    base: Option<&ObjectId>,
    receiver: Option<&ObjectId>,
    giver: Option<&ObjectId>,
) -> MergeOutcome {
    let conflict = || MergeOutcome::Conflict {
        base: base.cloned(),
        receiver: receiver.cloned(),
        giver: giver.cloned(),
    };

    match (base, receiver, giver) {
        // never existed, or deleted everywhere
        (None, None, None) | (Some(_), None, None) => MergeOutcome::Drop,
        // created on one side only
        (None, None, Some(giver)) => MergeOutcome::Take(giver.clone()),
        (None, Some(_), None) => MergeOutcome::Keep,
        // created independently on both sides
        (None, Some(receiver), Some(giver)) if receiver == giver => MergeOutcome::Keep,
        (None, Some(_), Some(_)) => conflict(),
        // deleted by the receiver
        (Some(base), None, Some(giver)) if base == giver => MergeOutcome::Drop,
        (Some(_), None, Some(_)) => conflict(),
        // deleted by the giver
        (Some(base), Some(receiver), None) if base == receiver => MergeOutcome::Drop,
        (Some(_), Some(_), None) => conflict(),
        // present everywhere
        (Some(base), Some(receiver), Some(giver)) => {
            if receiver == giver || giver == base {
                MergeOutcome::Keep
            } else if receiver == base {
                MergeOutcome::Take(giver.clone())
            } else {
                conflict()
            }
        }
    }
}

/// Classify every path in the union of the three snapshots
pub fn merge_plan(base: &Toc, receiver: &Toc, giver: &Toc) -> BTreeMap<PathBuf, MergeOutcome> {
    base.keys()
        .chain(receiver.keys())
        .chain(giver.keys())
        .map(|path| {
            let outcome = classify(base.get(path), receiver.get(path), giver.get(path));
            (path.clone(), outcome)
        })
        .collect()
}

/// Render the conflict-marker file content for one conflicted path
///
/// The receiver and giver versions are separated by marker lines; a side that
/// deleted the file contributes an empty section.
pub fn conflict_markers(receiver_text: &str, giver_text: &str, giver_label: &str) -> String {
    let mut out = String::new();
    out.push_str("<<<<<<< HEAD\n");
    push_section(&mut out, receiver_text);
    out.push_str("=======\n");
    push_section(&mut out, giver_text);
    out.push_str(&format!(">>>>>>> {}\n", giver_label));
    out
}

fn push_section(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}
