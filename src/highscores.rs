//! High score leaderboard system
//!
//! Every finished run is recorded; views are limited to the best few when
//! read. The engine knows nothing about it; the app submits the final score
//! (with a player name) after a game over.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::persistence;
use crate::settings::normalize_player_name;

/// Number of entries shown on the leaderboard
pub const TOP_SCORES_LIMIT: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_name: String,
    /// Correct taps in the run
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// All recorded scores, sorted by descending score
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

    /// True if `score` would beat the current best (or nothing is recorded yet)
    pub fn is_new_high_score(&self, score: u32) -> bool {
        self.top_score().is_none_or(|top| score > top)
    }

    /// Get the rank a score would achieve (1-indexed)
    pub fn potential_rank(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1
    }

    /// Record a score. Returns the rank achieved (1-indexed).
    /// Ties rank below the earlier entry.
    pub fn add_score(&mut self, player_name: &str, score: u32, timestamp: f64) -> usize {
        let rank = self.potential_rank(score);
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                player_name: normalize_player_name(player_name),
                score,
                timestamp,
            },
        );
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Best `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Where finished-game scores go
pub trait ScoreStore {
    /// Record a score. Returns its rank among everything recorded.
    fn submit(&mut self, player_name: &str, score: u32) -> Result<usize, PersistError>;

    /// Best scores first
    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry>;

    /// True if `score` beats the best recorded score, or nothing is recorded
    fn is_new_high_score(&self, score: u32) -> bool {
        self.top_scores(1).first().is_none_or(|top| score > top.score)
    }
}

impl ScoreStore for HighScores {
    fn submit(&mut self, player_name: &str, score: u32) -> Result<usize, PersistError> {
        Ok(self.add_score(player_name, score, crate::now_millis()))
    }

    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.top(limit).to_vec()
    }
}

/// Leaderboard persisted to a JSON file
#[derive(Debug)]
pub struct LocalScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl LocalScoreStore {
    /// Open the leaderboard at `path`, starting fresh if nothing is saved there
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let scores = match persistence::load::<HighScores>(&path)? {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
        };
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    /// Write `scores` to disk, then adopt them. On failure the store is unchanged.
    fn commit(&mut self, scores: HighScores) -> Result<(), PersistError> {
        persistence::save(&self.path, &scores)?;
        log::info!("High scores saved ({} entries)", scores.len());
        self.scores = scores;
        Ok(())
    }

    /// Drop every entry and persist the empty board
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.commit(HighScores::new())
    }
}

impl ScoreStore for LocalScoreStore {
    fn submit(&mut self, player_name: &str, score: u32) -> Result<usize, PersistError> {
        let mut scores = self.scores.clone();
        let rank = scores.add_score(player_name, score, crate::now_millis());
        self.commit(scores)?;
        Ok(rank)
    }

    fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.scores.top(limit).to_vec()
    }
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_ms = (now - timestamp).max(0.0);
    let diff_mins = diff_ms / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else if days < 14 {
            "Last week".to_string()
        } else {
            format!("{} weeks ago", days / 7)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
