use std::time::Duration;

use log::{info, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grid_engine::{add_random_tile, empty_grid, is_game_over, move_grid};
use super::tile_source::TileSource;
use crate::model::{
    Direction, GameMode, GameStateSnapshot, Grid, GridError, MergedGrid, SnapshotError,
    TimerState,
};

/// What a single direction input did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game over or paused; nothing was evaluated.
    Ignored,
    /// The grid could not move that way; no tile spawned.
    Unchanged,
    Moved { gained: u32 },
    /// The move succeeded and left the grid terminal.
    GameOver { gained: u32 },
}

/// Everything needed to display, resume or replay a game.
///
/// Transitions go through the grid engine and return the outcome; the
/// previous value is never shared, so a clone is a complete undo point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    pub grid: Grid,
    pub merged: MergedGrid,
    pub score: u32,
    pub best_score: u32,
    pub moves: u32,
    pub timer: TimerState,
    pub game_over: bool,
}

impl GameState {
    /// Fresh game: two tiles spawned on an empty grid.
    pub fn new(
        mode: GameMode,
        time_limit_secs: u32,
        source: &mut dyn TileSource,
        two_probability: f64,
    ) -> Self {
        let size = mode.grid_size();
        let grid = add_random_tile(
            &add_random_tile(&empty_grid(size), source, two_probability),
            source,
            two_probability,
        );
        let limit = mode
            .time_limit(time_limit_secs)
            .map(|secs| Duration::from_secs(secs as u64));
        Self {
            mode,
            grid,
            merged: MergedGrid::new(size),
            score: 0,
            best_score: 0,
            moves: 0,
            timer: TimerState::with_limit(limit),
            game_over: false,
        }
    }

    /// New grid for the same mode; the best score carries over.
    pub fn restarted(
        &self,
        time_limit_secs: u32,
        source: &mut dyn TileSource,
        two_probability: f64,
    ) -> Self {
        let mut next = Self::new(self.mode, time_limit_secs, source, two_probability);
        next.best_score = self.best_score;
        next
    }

    pub fn apply_move(
        &mut self,
        direction: Direction,
        source: &mut dyn TileSource,
        two_probability: f64,
    ) -> MoveOutcome {
        if self.game_over || self.timer.is_paused() {
            trace!(
                target: "game_state",
                "Ignoring {} (over: {}, paused: {})",
                direction,
                self.game_over,
                self.timer.is_paused()
            );
            return MoveOutcome::Ignored;
        }
        self.timer = self.timer.started();

        let result = move_grid(&self.grid, direction);
        if !result.changed_from(&self.grid) {
            self.merged = MergedGrid::new(self.grid.size());
            return MoveOutcome::Unchanged;
        }

        let (grid, merged, gained) = result.into_parts();
        self.add_score(gained);
        self.grid = add_random_tile(&grid, source, two_probability);
        self.merged = merged;
        self.moves += 1;

        if is_game_over(&self.grid) {
            self.finish();
            return MoveOutcome::GameOver { gained };
        }
        MoveOutcome::Moved { gained }
    }

    /// Advances the clock one second. Returns true when this tick ended the game.
    pub fn tick(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.timer = self.timer.ticked();
        if self.timer.is_expired() {
            info!(target: "game_state", "Time is up at score {}", self.score);
            self.finish();
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        self.timer = self.timer.paused();
    }

    pub fn resume(&mut self) {
        self.timer = self.timer.resumed();
    }

    pub fn set_best_score(&mut self, best_score: u32) {
        self.best_score = best_score.max(self.score);
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed.as_secs() as u32
    }

    pub fn snapshot(&self, score_saved: bool, playthrough_id: Uuid) -> GameStateSnapshot {
        GameStateSnapshot::new(self.clone(), score_saved, playthrough_id)
    }

    /// Rejects states that could not have come from the engine.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        Grid::from_rows(self.grid.rows())?;
        self.grid.check_cell_count()?;
        self.merged.check_cell_count()?;
        let expected = self.mode.grid_size();
        for actual in [self.grid.size(), self.merged.size()] {
            if actual != expected {
                return Err(GridError::SizeMismatch { expected, actual }.into());
            }
        }
        if self.timer.limit.is_some() != self.mode.is_timed() {
            return Err(SnapshotError::TimerMismatch { mode: self.mode });
        }
        Ok(())
    }

    fn add_score(&mut self, gained: u32) {
        self.score = self.score.saturating_add(gained);
        if self.score > self.best_score {
            self.best_score = self.score;
        }
    }

    fn finish(&mut self) {
        self.game_over = true;
        self.timer = self.timer.ended();
    }
}
