//! Commit graph traversal
//!
//! Parent-edge walks over the commit DAG: the ancestor test behind
//! fast-forward detection, and the lowest common ancestor computation behind
//! three-way merges.
//!
//! ## Algorithm
//!
//! The common ancestor search runs in two phases:
//! 1. Walk every ancestor of the receiver (including the receiver itself),
//!    marking each commit as visited from the receiver side.
//! 2. Breadth-first search from the giver; the first commit already carrying
//!    the receiver mark is the lowest common ancestor.
//!
//! Parent lists are stored in a fixed order, so the BFS is deterministic
//! across runs. The graph is acyclic by construction (parents are older
//! objects), but every walk carries a step bound as a defense against
//! corrupted storage.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};

/// Walks longer than this indicate a corrupt or cyclic parent structure
const MAX_WALK_STEPS: usize = 100_000;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    struct VisitState: u8 {
        const FROM_RECEIVER = 0b01;
        const FROM_GIVER = 0b10;
    }
}

/// Read-only view of the commit DAG backed by the object database
pub struct CommitGraph<'d> {
    database: &'d Database,
}

impl<'d> CommitGraph<'d> {
    pub fn new(database: &'d Database) -> Self {
        CommitGraph { database }
    }

    /// Parent commit ids of a commit (0, 1, or 2)
    pub fn parents(&self, oid: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self.database.load_commit(oid)?.parents().to_vec())
    }

    /// True iff `ancestor` is reachable from `descendant` over parent edges
    ///
    /// A commit is considered its own ancestor.
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        let mut queue = VecDeque::from([descendant.clone()]);
        let mut seen = HashMap::new();
        let mut steps = 0usize;

        while let Some(current) = queue.pop_front() {
            if &current == ancestor {
                return Ok(true);
            }
            if seen.insert(current.clone(), ()).is_some() {
                continue;
            }

            steps += 1;
            if steps > MAX_WALK_STEPS {
                anyhow::bail!("commit graph walk exceeded {} steps", MAX_WALK_STEPS);
            }

            queue.extend(self.parents(&current)?);
        }

        Ok(false)
    }

    /// Lowest common ancestor of two commits
    ///
    /// Returns None when the commits share no history.
    pub fn common_ancestor(
        &self,
        receiver: &ObjectId,
        giver: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut states: HashMap<ObjectId, VisitState> = HashMap::new();

        // Phase 1: mark every ancestor of the receiver, itself included.
        let mut stack = vec![receiver.clone()];
        let mut steps = 0usize;
        while let Some(current) = stack.pop() {
            let state = states.entry(current.clone()).or_default();
            if state.contains(VisitState::FROM_RECEIVER) {
                continue;
            }
            state.insert(VisitState::FROM_RECEIVER);

            steps += 1;
            if steps > MAX_WALK_STEPS {
                anyhow::bail!("commit graph walk exceeded {} steps", MAX_WALK_STEPS);
            }

            stack.extend(self.parents(&current)?);
        }

        // Phase 2: BFS from the giver; the first receiver-marked commit is
        // the closest shared ancestor.
        let mut queue = VecDeque::from([giver.clone()]);
        while let Some(current) = queue.pop_front() {
            let state = states.entry(current.clone()).or_default();
            if state.contains(VisitState::FROM_RECEIVER) {
                return Ok(Some(current));
            }
            if state.contains(VisitState::FROM_GIVER) {
                continue;
            }
            state.insert(VisitState::FROM_GIVER);

            steps += 1;
            if steps > MAX_WALK_STEPS {
                anyhow::bail!("commit graph walk exceeded {} steps", MAX_WALK_STEPS);
            }

            queue.extend(self.parents(&current)?);
        }

        Ok(None)
    }
}
