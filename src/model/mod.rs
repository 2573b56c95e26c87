mod direction;
mod game_engine_command;
mod game_engine_event;
mod game_mode;
pub mod game_state_snapshot;
mod game_stats;
mod grid;
mod input_event;
mod move_result;
mod timer_state;

pub use direction::Direction;
pub use game_engine_command::{GameEngineCommand, SettingsChange};
pub use game_engine_event::GameEngineEvent;
pub use game_mode::{GameMode, TIME_MODE_LIMIT_SECS};
pub use game_state_snapshot::{GameStateSnapshot, SnapshotError};
pub use game_stats::{BestScoreEntry, GameStats, Leaderboard, TotalScoreEntry};
pub use grid::{is_valid_tile, Grid, GridError, Matrix, MergedGrid, MAX_TILE};
pub use input_event::{InputEvent, Key, Point};
pub use move_result::MoveResult;
pub use timer_state::TimerState;
