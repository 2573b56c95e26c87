use super::{Direction, GameMode, GameStateSnapshot};

/// Partial settings update; `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChange {
    pub game_mode: Option<GameMode>,
    pub two_probability: Option<f64>,
    pub swipe_threshold: Option<f32>,
    pub time_limit_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineCommand {
    Move(Direction),
    Tick,
    NewGame(Option<GameMode>, Option<u64>), // mode, seed
    Restart,
    Undo,
    Redo,
    Pause,
    Resume,
    TogglePause,
    SetPlayer(Option<String>),
    SubmitScore,
    RefreshLeaderboard,
    LoadState(GameStateSnapshot),
    InitDisplay,
    ChangeSettings(SettingsChange),
}
