use super::{GameStats, Grid, Leaderboard, MergedGrid, TimerState};
use crate::game::settings::Settings;

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    HistoryChanged {
        history_index: usize,
        history_length: usize,
    },
    GridUpdated {
        grid: Grid,
        merged: MergedGrid,
    },
    ScoreChanged {
        score: u32,
        best_score: u32,
        gained: u32,
    },
    TimerStateChanged(TimerState),
    GameOver(GameStats),
    ScoreSubmitted {
        player: String,
        score: u32,
    },
    SubmitFailed(String),
    LeaderboardUpdated(Leaderboard),
    SettingsChanged(Settings),
}
