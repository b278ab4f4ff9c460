//! Picked answers for the question on screen

use std::collections::BTreeSet;

use crate::questions::{QuestionRecord, SelectionMode};

#[derive(Debug, Clone)]
pub struct AnswerSelection {
    picked: BTreeSet<usize>,
    mode: SelectionMode,
}

impl Default for AnswerSelection {
    fn default() -> Self {
        Self::new(SelectionMode::Single)
    }
}

impl AnswerSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            picked: BTreeSet::new(),
            mode,
        }
    }

    /// Clear picks and adopt the question's mode
    pub fn reset_for(&mut self, question: &QuestionRecord) {
        self.mode = question.selection_mode();
        self.clear();
    }

    /// Single: replace the pick (re-picking is a no-op). Multi: toggle.
    pub fn select(&mut self, index: usize) {
        match self.mode {
            SelectionMode::Single => {
                if !self.picked.contains(&index) {
                    self.picked.clear();
                    self.picked.insert(index);
                }
            }
            SelectionMode::Multi => {
                if !self.picked.remove(&index) {
                    self.picked.insert(index);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    /// Exact set equality, no partial credit
    pub fn is_correct(&self, correct: &BTreeSet<usize>) -> bool {
        self.picked == *correct
    }

    pub fn picked(&self) -> &BTreeSet<usize> {
        &self.picked
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_replaces() {
        let mut sel = AnswerSelection::new(SelectionMode::Single);
        sel.select(0);
        sel.select(2);
        assert_eq!(*sel.picked(), BTreeSet::from([2]));
        assert!(!sel.is_correct(&BTreeSet::from([1])));
    }

    #[test]
    fn test_single_cannot_deselect() {
        let mut sel = AnswerSelection::new(SelectionMode::Single);
        sel.select(3);
        sel.select(3);
        assert_eq!(*sel.picked(), BTreeSet::from([3]));
    }

    #[test]
    fn test_multi_exact_set() {
        let correct = BTreeSet::from([0, 2]);
        let mut sel = AnswerSelection::new(SelectionMode::Multi);
        sel.select(0);
        assert!(!sel.is_correct(&correct));
        sel.select(2);
        assert!(sel.is_correct(&correct));
        sel.select(1);
        assert!(!sel.is_correct(&correct));
        sel.select(1);
        assert!(sel.is_correct(&correct));
    }

    #[test]
    fn test_nothing_picked_is_wrong() {
        let sel = AnswerSelection::default();
        assert!(!sel.is_correct(&BTreeSet::from([0])));
    }

    #[test]
    fn test_reset_for_adopts_mode() {
        let question = QuestionRecord {
            text: "q".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: BTreeSet::from([0, 3]),
            tier: crate::questions::Tier::Easy,
            uses_timer: true,
            time_limit_seconds: 10,
            score_value: 5,
        };
        let mut sel = AnswerSelection::default();
        sel.select(1);
        sel.reset_for(&question);
        assert!(sel.picked().is_empty());
        assert_eq!(sel.mode(), SelectionMode::Multi);
    }
}
