use super::{Grid, MergedGrid};

/// Outcome of sliding a grid in one direction, before any tile is spawned.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    pub merged: MergedGrid,
    pub gained_score: u32,
}

impl MoveResult {
    pub fn new(grid: Grid, merged: MergedGrid, gained_score: u32) -> Self {
        Self {
            grid,
            merged,
            gained_score,
        }
    }

    /// Whether the move changed `before`. Unchanged moves must not spawn.
    pub fn changed_from(&self, before: &Grid) -> bool {
        self.grid != *before
    }

    pub fn into_parts(self) -> (Grid, MergedGrid, u32) {
        (self.grid, self.merged, self.gained_score)
    }
}
