use log::trace;
use uuid::Uuid;

use crate::game::GameState;
use crate::model::{GameMode, GridError};

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot grid rejected: {0}")]
    Grid(#[from] GridError),
    #[error("snapshot timer does not fit {mode} mode")]
    TimerMismatch { mode: GameMode },
}

/// Serializable picture of a game in progress, used to resume or replay it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameStateSnapshot {
    pub state: GameState,
    pub score_saved: bool,
    pub playthrough_id: Uuid,
}

impl GameStateSnapshot {
    pub fn new(state: GameState, score_saved: bool, playthrough_id: Uuid) -> Self {
        // a resumed game starts paused so the clock does not run unattended
        let mut state = state;
        if state.timer.running && !state.game_over {
            state.pause();
        }
        Self {
            state,
            score_saved,
            playthrough_id,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(contents: &str) -> Result<Self, SnapshotError> {
        let snapshot = serde_json::from_str::<GameStateSnapshot>(contents)?;
        snapshot.state.validate()?;
        trace!(target: "game_state", "Loaded snapshot {}", snapshot.playthrough_id);
        Ok(snapshot)
    }
}
