//! High score leaderboard system
//!
//! Persisted to a JSON file next to the binary, tracks top 10 scores.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Pipes passed in the round
    pub score: u64,
    /// Session seed the round was played under
    pub seed: u64,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, seed: u64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            seed,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard from a JSON file; missing or corrupt files start
    /// a fresh board rather than failing
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores from {}", scores.entries.len(), path.display());
                    scores
                }
                Err(err) => {
                    log::warn!("ignoring corrupt high score file {}: {}", path.display(), err);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the leaderboard to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("high scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_scores_sorted_descending_and_capped() {
        let mut scores = HighScores::new();
        for s in 1..=15u64 {
            scores.add_score(s, 0, s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(15));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        // 1..=5 were pushed out
        assert_eq!(scores.entries.last().unwrap().score, 6);
    }

    #[test]
    fn test_rank_reported() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(10, 0, 0), Some(1));
        assert_eq!(scores.add_score(20, 0, 1), Some(1));
        assert_eq!(scores.add_score(15, 0, 2), Some(2));
        assert_eq!(scores.add_score(5, 0, 3), Some(4));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let mut scores = HighScores::new();
        scores.add_score(7, 42, 1000);
        scores.add_score(3, 42, 1001);

        let dir = std::env::temp_dir();
        let path = dir.join("flappy_sim_highscores_test.json");
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.top_score(), Some(7));
        assert_eq!(loaded.entries[0].seed, 42);
    }
}
