//! Snapshot-based undo/redo over any cloneable state.

use std::collections::VecDeque;

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo history of whole-state snapshots.
///
/// Every [`History::set_state`] replaces the present with a fully formed value
/// and invalidates the redo branch. There is no branching history.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Earlier states, oldest first.
    past: VecDeque<T>,
    /// Current state.
    present: T,
    /// Undone states, most recently undone last.
    future: Vec<T>,
    /// Maximum length of `past` (None = unbounded).
    limit: Option<usize>,
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> History<T> {
    /// Create an unbounded history rooted at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: Vec::new(),
            limit: None,
        }
    }

    /// Create a history that keeps at most `limit` undo states.
    ///
    /// Once full, the oldest state is dropped and becomes unreachable.
    pub fn with_limit(initial: T, limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::new(initial)
        }
    }

    /// Get the current state.
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Replace the current state, pushing the old one onto the undo stack.
    pub fn set_state(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);
        self.future.clear();
        self.enforce_limit();
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.past.pop_back() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.present, previous);
                self.future.push(current);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.future.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.present, next);
                self.past.push_back(current);
                self.enforce_limit();
                true
            }
            None => false,
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Drop all undo/redo states, keeping the present as the new root.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Replace the present without recording an undo step and forget all history.
    pub fn reset_to(&mut self, state: T) {
        self.present = state;
        self.clear();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
    }
}
