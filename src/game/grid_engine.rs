//! Pure grid transitions: sliding, merging, spawning and terminal detection.
//!
//! Every function takes the grid by reference and returns a new value, so a
//! caller holding an older grid can keep using it for undo or comparison.

use log::trace;

use super::tile_source::TileSource;
use crate::model::{Direction, Grid, MergedGrid, MoveResult, MAX_TILE};

/// Probability that a spawned tile is a 2 rather than a 4.
pub const DEFAULT_TWO_PROBABILITY: f64 = 0.9;

pub fn empty_grid(size: usize) -> Grid {
    Grid::new(size)
}

/// Places a 2 (with probability `two_probability`) or a 4 into one uniformly
/// chosen empty cell. A full grid is returned unchanged.
pub fn add_random_tile(grid: &Grid, source: &mut dyn TileSource, two_probability: f64) -> Grid {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return grid.clone();
    }
    let (row, col) = empty[source.next_index(empty.len())];
    let value = if source.next_unit() < two_probability { 2 } else { 4 };
    trace!(target: "grid_engine", "Spawning {} at ({}, {})", value, row, col);
    grid.with(row, col, value)
}

/// Slides every line of the grid toward the edge `direction` points at.
///
/// Always returns a result; an unchanged grid comes back with a gained score
/// of 0 and no merged cells.
pub fn move_grid(grid: &Grid, direction: Direction) -> MoveResult {
    debug_assert!(grid.is_valid(), "malformed grid: {:?}", grid);
    let size = grid.size();
    let mut next = Grid::new(size);
    let mut merged = MergedGrid::new(size);
    let mut gained_score: u32 = 0;

    for line in 0..size {
        let cells: Vec<(usize, usize)> = (0..size)
            .map(|step| line_cell(line, step, size, direction))
            .collect();
        let values: Vec<u32> = cells.iter().map(|&(r, c)| grid.get(r, c)).collect();
        let (slid, merges, gained) = slide_line(&values);
        for (step, &(r, c)) in cells.iter().enumerate() {
            next.set(r, c, slid[step]);
            merged.set(r, c, merges[step]);
        }
        gained_score = gained_score.saturating_add(gained);
    }

    trace!(
        target: "grid_engine",
        "Moved {}: gained {}, {} merges",
        direction,
        gained_score,
        merged.merge_count()
    );
    MoveResult::new(next, merged, gained_score)
}

/// Like [`move_grid`] for a textual direction; unknown names yield `None`.
pub fn move_grid_named(grid: &Grid, direction: &str) -> Option<MoveResult> {
    Direction::from_name(direction).map(|direction| move_grid(grid, direction))
}

/// No empty cell and no two orthogonally adjacent equal tiles.
pub fn is_game_over(grid: &Grid) -> bool {
    if grid.has_empty_cell() {
        return false;
    }
    let size = grid.size();
    for row in 0..size {
        for col in 0..size {
            let value = grid.get(row, col);
            if col + 1 < size && can_merge(value, grid.get(row, col + 1)) {
                return false;
            }
            if row + 1 < size && can_merge(value, grid.get(row + 1, col)) {
                return false;
            }
        }
    }
    true
}

#[inline]
fn can_merge(a: u32, b: u32) -> bool {
    a == b && a < MAX_TILE
}

/// Coordinates of the `step`-th cell of `line`, counted from the target edge.
#[inline]
fn line_cell(line: usize, step: usize, size: usize, direction: Direction) -> (usize, usize) {
    let along = if direction.toward_origin() {
        step
    } else {
        size - 1 - step
    };
    if direction.is_horizontal() {
        (line, along)
    } else {
        (along, line)
    }
}

/// Compacts and merges one line given in travel order (index 0 is the target
/// edge). Returns the new line, the merge markers and the score gained.
fn slide_line(line: &[u32]) -> (Vec<u32>, Vec<bool>, u32) {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut merges = Vec::with_capacity(line.len());
    let mut gained: u32 = 0;

    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && can_merge(tiles[i], tiles[i + 1]) {
            let value = tiles[i] * 2;
            out.push(value);
            merges.push(true);
            gained = gained.saturating_add(value);
            // the merged tile is final for this move
            i += 2;
        } else {
            out.push(tiles[i]);
            merges.push(false);
            i += 1;
        }
    }

    out.resize(line.len(), 0);
    merges.resize(line.len(), false);
    (out, merges, gained)
}
