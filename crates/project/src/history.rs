//! Snapshot-based undo/redo history manager.
//!
//! Two stacks of [`Snapshot`]s: undo (past states) and redo (states undone).
//! Every mutating project operation captures the *pre-mutation* state with
//! [`HistoryManager::push`], so the undo stack always holds the states to
//! return to. Pushing clears the redo stack (a new timeline branch). The
//! undo stack is bounded; the oldest entry is evicted first.

use tracing::debug;

use crate::model::Project;
use crate::snapshot::Snapshot;

/// Default maximum number of undo entries.
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// Manages undo/redo history over whole-state snapshots.
///
/// This is full-state undo, not an operation log: `undo` swaps the live
/// project with the most recent captured state wholesale.
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_entries: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl HistoryManager {
    /// Create a history manager holding at most `max_entries` undo snapshots.
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Capture the current project state onto the undo stack.
    ///
    /// Call this *before* applying a mutation. Clears the redo stack and
    /// evicts the oldest entry when the stack is full.
    pub fn push(&mut self, project: &Project) {
        self.redo_stack.clear();
        self.undo_stack.push(Snapshot::capture(project));
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
        debug!(undo_depth = self.undo_stack.len(), "History entry pushed");
    }

    /// Undo the last mutation: push the current state onto the redo stack and
    /// restore the most recent undo snapshot. No-op (returns `false`) when
    /// there is nothing to undo.
    pub fn undo(&mut self, project: &mut Project) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Snapshot::capture(project));
        snapshot.restore(project);
        debug!(
            undo_remaining = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "Undo"
        );
        true
    }

    /// Redo the last undone mutation. Symmetric to [`undo`](Self::undo).
    pub fn redo(&mut self, project: &mut Project) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Snapshot::capture(project));
        snapshot.restore(project);
        debug!(
            undo_depth = self.undo_stack.len(),
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!("History cleared");
    }
}
