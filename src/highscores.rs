//! Highest-score record
//!
//! The core only knows the value and its JSON form; the host decides where
//! it lives. Anything unreadable counts as no record.

use serde::{Deserialize, Serialize};

/// Best score ever reached on this table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
}

impl HighScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Raise the record if `score` beats it. Returns true when it changed.
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.score {
            log::info!("New high score: {}", score);
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Parse a saved record. Corrupt input resets to zero.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("High score unreadable ({}), starting from 0", e);
            Self::default()
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
