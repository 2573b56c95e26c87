pub mod game_engine;
pub mod game_state;
pub mod grid_engine;
pub mod score_ledger;
pub mod settings;
pub mod tile_source;

pub use game_engine::GameEngine;
pub use game_state::{GameState, MoveOutcome};
pub use grid_engine::{add_random_tile, empty_grid, is_game_over, move_grid, move_grid_named};
