use crate::model::GameMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Summary of a finished game.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct GameStats {
    pub score: u32,
    pub max_tile: u32,
    pub completion_time: Duration,
    pub moves: u32,
    pub mode: GameMode,
    pub timestamp: i64,
    pub playthrough_id: Uuid,
}

/// A player's best single game.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct BestScoreEntry {
    pub player: String,
    pub score: u32,
    pub time_secs: u32,
}

/// Accumulated score over every submitted game of a player.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct TotalScoreEntry {
    pub player: String,
    pub score_total: u64,
    pub games_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub best_scores: Vec<BestScoreEntry>,
    pub total_scores: Vec<TotalScoreEntry>,
}
