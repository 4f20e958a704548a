//! History Engine
//!
//! Undo/redo over whole cue-list snapshots. Each track owns one
//! [`HistoryStack`]; the session keeps the active track's stack live and
//! caches the rest.
//!
//! Commits compare field-wise, so an edit that produces an equal list does
//! not create a history entry.

use std::collections::VecDeque;

use crate::core::captions::Cue;

/// Per-track `{past, present, future}` history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryStack {
    /// Prior snapshots, oldest at the front
    past: VecDeque<Vec<Cue>>,
    /// Current cue list
    present: Vec<Cue>,
    /// Undone snapshots, next redo at the back
    future: Vec<Vec<Cue>>,
    /// Maximum depth of `past`; `None` is unbounded
    limit: Option<usize>,
}

impl HistoryStack {
    /// Creates an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack whose present is `present`, with no past or future
    pub fn seeded(present: Vec<Cue>) -> Self {
        Self {
            present,
            ..Self::default()
        }
    }

    /// Sets the maximum past depth (0 = unbounded)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.set_limit(limit);
        self
    }

    /// Changes the past depth, dropping the oldest entries if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = (limit > 0).then_some(limit);
        self.trim();
    }

    pub fn present(&self) -> &[Cue] {
        &self.present
    }

    /// Commits a new cue list.
    ///
    /// Returns false (and records nothing) when `next` equals the present.
    pub fn commit(&mut self, next: Vec<Cue>) -> bool {
        if next == self.present {
            return false;
        }

        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);
        self.future.clear();
        self.trim();
        true
    }

    /// Steps back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        true
    }

    /// Steps forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.trim();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Returns the number of undo steps available
    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    /// Returns the number of redo steps available
    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Clears past and future, keeping the present
    pub fn clear_history(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(texts: &[&str]) -> Vec<Cue> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Cue::from_seconds(i as u32 + 1, i as f64, i as f64 + 1.0, text)
                    .with_uuid(&format!("u{i}"))
            })
            .collect()
    }

    fn texts(stack: &HistoryStack) -> Vec<&str> {
        stack.present().iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut stack = HistoryStack::seeded(list(&["a"]));
        assert!(!stack.can_undo());

        assert!(stack.commit(list(&["a", "b"])));
        assert!(stack.commit(list(&["a", "b", "c"])));
        assert_eq!(stack.undo_count(), 2);

        assert!(stack.undo());
        assert_eq!(texts(&stack), vec!["a", "b"]);
        assert!(stack.undo());
        assert_eq!(texts(&stack), vec!["a"]);
        assert!(!stack.undo());
        assert_eq!(texts(&stack), vec!["a"]);

        assert!(stack.redo());
        assert!(stack.redo());
        assert_eq!(texts(&stack), vec!["a", "b", "c"]);
        assert!(!stack.redo());
    }

    #[test]
    fn test_equal_commit_is_noop() {
        let mut stack = HistoryStack::seeded(list(&["a"]));
        // Structurally equal but a distinct allocation
        assert!(!stack.commit(list(&["a"])));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_commit_clears_future() {
        let mut stack = HistoryStack::seeded(list(&["a"]));
        stack.commit(list(&["b"]));
        stack.undo();
        assert!(stack.can_redo());

        stack.commit(list(&["c"]));
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_count(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut stack = HistoryStack::seeded(list(&["0"])).with_limit(2);
        for text in ["1", "2", "3"] {
            stack.commit(list(&[text]));
        }
        assert_eq!(stack.undo_count(), 2);
        stack.undo();
        stack.undo();
        assert_eq!(texts(&stack), vec!["1"]);
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut stack = HistoryStack::new();
        for i in 0..250 {
            stack.commit(list(&[&i.to_string()]));
        }
        assert_eq!(stack.undo_count(), 250);
    }

    #[test]
    fn test_clear_history_keeps_present() {
        let mut stack = HistoryStack::seeded(list(&["a"]));
        stack.commit(list(&["b"]));
        stack.clear_history();
        assert_eq!(texts(&stack), vec!["b"]);
        assert!(!stack.can_undo());
    }
}
