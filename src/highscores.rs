//! Best-result board for one mounted game
//!
//! Lives as long as the [`crate::SessionHandle`] that owns it; restarts of the
//! same handle share it. Never written to storage.

use serde::{Deserialize, Serialize};

/// Maximum number of results to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Whether bigger or smaller results rank first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ranking {
    /// Scores, words per minute
    HigherIsBetter,
    /// Reaction latency, moves taken
    LowerIsBetter,
}

/// A single board entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub value: u64,
    /// Session (run) that produced it
    pub session: u64,
}

/// Ranked results, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    ranking: Ranking,
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new(ranking: Ranking) -> Self {
        Self {
            ranking,
            entries: Vec::new(),
        }
    }

    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    fn beats(&self, a: u64, b: u64) -> bool {
        match self.ranking {
            Ranking::HigherIsBetter => a > b,
            Ranking::LowerIsBetter => a < b,
        }
    }

    /// Check if a result qualifies for the board
    pub fn qualifies(&self, value: u64) -> bool {
        if self.ranking == Ranking::HigherIsBetter && value == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| self.beats(value, e.value))
            .unwrap_or(true)
    }

    /// Get the rank a result would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, value: u64) -> Option<usize> {
        if !self.qualifies(value) {
            return None;
        }
        let rank = self.entries.iter().position(|e| self.beats(value, e.value));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a result to the board (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, value: u64, session: u64) -> Option<usize> {
        let rank = self.potential_rank(value)?;
        self.entries
            .insert(rank - 1, HighScoreEntry { value, session });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best result so far (if any)
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.value)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_better_ordering() {
        let mut board = HighScores::new(Ranking::HigherIsBetter);
        assert_eq!(board.add_score(30, 1), Some(1));
        assert_eq!(board.add_score(50, 2), Some(1));
        assert_eq!(board.add_score(40, 3), Some(2));
        assert_eq!(board.best(), Some(50));
        let values: Vec<_> = board.entries().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![50, 40, 30]);
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut board = HighScores::new(Ranking::HigherIsBetter);
        assert_eq!(board.add_score(0, 1), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_lower_is_better_accepts_zero() {
        let mut board = HighScores::new(Ranking::LowerIsBetter);
        board.add_score(250, 1);
        assert_eq!(board.add_score(0, 2), Some(1));
        assert_eq!(board.best(), Some(0));
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = HighScores::new(Ranking::LowerIsBetter);
        for v in 0..MAX_HIGH_SCORES as u64 {
            board.add_score(100 + v, v);
        }
        assert!(!board.qualifies(500));
        assert_eq!(board.potential_rank(50), Some(1));
        board.add_score(50, 99);
        assert_eq!(board.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries().last().map(|e| e.value), Some(108));
    }
}
