use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use crate::model::{BestScoreEntry, Leaderboard, TotalScoreEntry};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("player id is empty")]
    EmptyPlayer,
    #[error("unknown player {0}")]
    UnknownPlayer(String),
}

/// Where finished games are submitted and ranked.
pub trait ScoreLedger {
    fn save_score(&mut self, player: &str, score: u32, time_secs: u32) -> Result<(), LedgerError>;

    fn best_score(&self, player: &str) -> Result<BestScoreEntry, LedgerError>;

    /// Highest single game per player, best first.
    fn best_scores(&self) -> Vec<BestScoreEntry>;

    /// Score accumulated over all games per player, highest first.
    fn total_scores(&self) -> Vec<TotalScoreEntry>;

    fn leaderboard(&self) -> Leaderboard {
        Leaderboard {
            best_scores: self.best_scores(),
            total_scores: self.total_scores(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    best: HashMap<String, BestScoreEntry>,
    totals: HashMap<String, TotalScoreEntry>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreLedger for InMemoryLedger {
    fn save_score(&mut self, player: &str, score: u32, time_secs: u32) -> Result<(), LedgerError> {
        if player.trim().is_empty() {
            return Err(LedgerError::EmptyPlayer);
        }

        let is_new_best = self.best.get(player).map_or(true, |best| score > best.score);
        if is_new_best {
            self.best.insert(
                player.to_string(),
                BestScoreEntry {
                    player: player.to_string(),
                    score,
                    time_secs,
                },
            );
        }

        let total = self
            .totals
            .entry(player.to_string())
            .or_insert_with(|| TotalScoreEntry {
                player: player.to_string(),
                ..Default::default()
            });
        total.score_total += score as u64;
        total.games_played += 1;

        debug!(
            target: "score_ledger",
            "Saved score {} for {} (new best: {}, total {} over {} games)",
            score, player, is_new_best, total.score_total, total.games_played
        );
        Ok(())
    }

    fn best_score(&self, player: &str) -> Result<BestScoreEntry, LedgerError> {
        self.best
            .get(player)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownPlayer(player.to_string()))
    }

    fn best_scores(&self) -> Vec<BestScoreEntry> {
        self.best
            .values()
            .cloned()
            .sorted_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)))
            .collect()
    }

    fn total_scores(&self) -> Vec<TotalScoreEntry> {
        self.totals
            .values()
            .cloned()
            .sorted_by(|a, b| {
                b.score_total
                    .cmp(&a.score_total)
                    .then_with(|| a.player.cmp(&b.player))
            })
            .collect()
    }
}
