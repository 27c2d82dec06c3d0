//! Hint sequences
//!
//! Hints are revealed in order, one at a time, each costing the learner
//! some XP. Position is the index in the sequence and is always contiguous
//! from zero. Every mutation either succeeds completely or leaves the
//! sequence untouched.

use crate::error::{QuizError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub text: String,
    /// XP deducted when the hint is revealed
    #[serde(default)]
    pub cost_xp: u32,
}

impl Hint {
    pub fn new(text: impl Into<String>, cost_xp: u32) -> Self {
        Self {
            text: text.into(),
            cost_xp,
        }
    }
}

/// Partial update for a single hint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintPatch {
    pub text: Option<String>,
    pub cost_xp: Option<u32>,
}

impl HintPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            cost_xp: None,
        }
    }

    pub fn cost(cost_xp: u32) -> Self {
        Self {
            text: None,
            cost_xp: Some(cost_xp),
        }
    }
}

/// Ordered hints in reveal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HintSequence(Vec<Hint>);

impl HintSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Hint> {
        self.0.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hint> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Hint] {
        &self.0
    }

    /// Add a hint at the end of the reveal order
    pub fn append(&mut self, hint: Hint) {
        self.0.push(hint);
    }

    /// Remove and return the hint at `position`
    pub fn remove(&mut self, position: usize) -> Result<Hint> {
        self.check(position)?;
        Ok(self.0.remove(position))
    }

    /// Move a hint to a new position, shifting the hints in between by one.
    ///
    /// `move_hint(0, 2)` on `[A, B, C]` gives `[B, C, A]`.
    pub fn move_hint(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        if from < to {
            self.0[from..=to].rotate_left(1);
        } else if from > to {
            self.0[to..=from].rotate_right(1);
        }
        Ok(())
    }

    /// Apply a patch to the hint at `position`
    pub fn update(&mut self, position: usize, patch: HintPatch) -> Result<()> {
        self.check(position)?;
        let hint = &mut self.0[position];
        if let Some(text) = patch.text {
            hint.text = text;
        }
        if let Some(cost) = patch.cost_xp {
            hint.cost_xp = cost;
        }
        Ok(())
    }

    /// Next hint to disclose after `revealed` hints have been shown
    pub fn next_reveal(&self, revealed: usize) -> Option<&Hint> {
        self.0.get(revealed)
    }

    /// XP cost of revealing the first `count` hints
    pub fn reveal_cost(&self, count: usize) -> u64 {
        self.0.iter().take(count).map(|h| u64::from(h.cost_xp)).sum()
    }

    pub fn total_cost(&self) -> u64 {
        self.reveal_cost(self.0.len())
    }

    fn check(&self, position: usize) -> Result<()> {
        if position < self.0.len() {
            Ok(())
        } else {
            Err(QuizError::Index {
                index: position,
                len: self.0.len(),
            })
        }
    }
}

impl From<Vec<Hint>> for HintSequence {
    fn from(hints: Vec<Hint>) -> Self {
        Self(hints)
    }
}

impl<'a> IntoIterator for &'a HintSequence {
    type Item = &'a Hint;
    type IntoIter = std::slice::Iter<'a, Hint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> HintSequence {
        HintSequence::from(vec![Hint::new("A", 1), Hint::new("B", 2), Hint::new("C", 3)])
    }

    fn texts(seq: &HintSequence) -> Vec<&str> {
        seq.iter().map(|h| h.text.as_str()).collect()
    }

    #[test]
    fn test_move_forward_shifts() {
        let mut seq = abc();
        seq.move_hint(0, 2).unwrap();
        assert_eq!(texts(&seq), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_move_backward_shifts() {
        let mut seq = abc();
        seq.move_hint(2, 0).unwrap();
        assert_eq!(texts(&seq), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_move_out_of_range_leaves_sequence() {
        let mut seq = abc();
        let err = seq.move_hint(0, 3).unwrap_err();
        assert_eq!(err, QuizError::Index { index: 3, len: 3 });
        assert_eq!(texts(&seq), vec!["A", "B", "C"]);

        assert!(seq.move_hint(5, 0).is_err());
        assert_eq!(texts(&seq), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_remove() {
        let mut seq = abc();
        let removed = seq.remove(1).unwrap();
        assert_eq!(removed.text, "B");
        assert_eq!(texts(&seq), vec!["A", "C"]);

        assert!(matches!(seq.remove(2), Err(QuizError::Index { index: 2, len: 2 })));
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_update() {
        let mut seq = abc();
        seq.update(0, HintPatch::text("Alpha")).unwrap();
        seq.update(0, HintPatch::cost(9)).unwrap();
        assert_eq!(seq.get(0), Some(&Hint::new("Alpha", 9)));
        assert!(seq.update(3, HintPatch::cost(1)).is_err());
    }

    #[test]
    fn test_staged_reveal_costs() {
        let seq = abc();
        assert_eq!(seq.next_reveal(0).map(|h| h.text.as_str()), Some("A"));
        assert_eq!(seq.next_reveal(3), None);
        assert_eq!(seq.reveal_cost(2), 3);
        assert_eq!(seq.total_cost(), 6);
    }
}
