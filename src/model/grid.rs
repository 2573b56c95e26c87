use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Row-major square matrix. Operations on the board never mutate a shared
/// matrix; they build a new one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matrix<T> {
    size: usize,
    cells: Vec<T>,
}

/// Tile values: 0 is empty, anything else a power of two >= 2.
pub type Grid = Matrix<u32>;

/// Cells produced by a merge during the last move.
pub type MergedGrid = Matrix<bool>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,
    #[error("grid is not square: row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("invalid tile {value} at ({row}, {col})")]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[error("grid is {actual}x{actual}, expected {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("grid holds {actual} cells, expected {expected}")]
    CellCount { expected: usize, actual: usize },
}

impl<T: Copy + Default> Matrix<T> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[self.idx(row, col)]
    }

    /// Returns a copy with one cell replaced.
    pub fn with(&self, row: usize, col: usize, value: T) -> Self {
        let mut next = self.clone();
        let i = next.idx(row, col);
        next.cells[i] = value;
        next
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.idx(row, col);
        self.cells[i] = value;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Fails when the stored cells do not fill `size` x `size`, which only a
    /// hand-edited or corrupt snapshot can produce.
    pub fn check_cell_count(&self) -> Result<(), GridError> {
        let expected = self.size * self.size;
        if self.cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> Vec<Vec<T>> {
        self.cells.chunks(self.size.max(1)).map(|r| r.to_vec()).collect()
    }

    /// All cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / self.size, i % self.size, v))
    }
}

impl Grid {
    /// Builds a grid from rows, rejecting anything that is not square or holds
    /// a value other than 0 or a power of two >= 2.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }
        Ok(Self { size, cells })
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, v)| v == 0)
            .map(|(r, c, _)| (r, c))
            .collect()
    }

    pub fn has_empty_cell(&self) -> bool {
        self.cells.contains(&0)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.cells.len() == self.size * self.size && self.cells.iter().all(|&v| is_valid_tile(v))
    }
}

impl MergedGrid {
    pub fn merge_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m).count()
    }
}

/// Largest tile a `u32` grid can hold. Two of them never merge.
pub const MAX_TILE: u32 = 1 << 31;

#[inline]
pub fn is_valid_tile(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for row in 0..self.size {
            let line = self
                .row(row)
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .map(|s| format!("{s:>5}"))
                .join("|");
            writeln!(f, "{row}|{line}|")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MergedGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.max_tile().to_string().len().max(4);
        let border = format!("+{}+", vec!["-".repeat(width + 2); self.size].join("+"));
        writeln!(f, "{border}")?;
        for row in 0..self.size {
            let line = self
                .row(row)
                .iter()
                .map(|&v| match v {
                    0 => format!(" {:>width$} ", ""),
                    v => format!(" {v:>width$} "),
                })
                .join("|");
            writeln!(f, "|{line}|")?;
            writeln!(f, "{border}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_accepts_valid_grid() {
        let grid = Grid::from_rows(vec![vec![0, 2], vec![4, 2048]]).unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.get(1, 1), 2048);
        assert_eq!(grid.empty_cells(), vec![(0, 0)]);
        assert_eq!(grid.max_tile(), 2048);
    }

    #[test]
    fn test_from_rows_rejects_malformed_grids() {
        assert_eq!(Grid::from_rows(vec![]), Err(GridError::Empty));
        assert_eq!(
            Grid::from_rows(vec![vec![0, 0], vec![0]]),
            Err(GridError::NotSquare {
                row: 1,
                len: 1,
                size: 2
            })
        );
        assert_eq!(
            Grid::from_rows(vec![vec![0, 3], vec![0, 0]]),
            Err(GridError::InvalidTile {
                row: 0,
                col: 1,
                value: 3
            })
        );
        assert!(matches!(
            Grid::from_rows(vec![vec![1, 0], vec![0, 0]]),
            Err(GridError::InvalidTile { value: 1, .. })
        ));
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let grid = Grid::new(3);
        let next = grid.with(2, 1, 4);
        assert_eq!(grid.get(2, 1), 0);
        assert_eq!(next.get(2, 1), 4);
        assert_eq!(next.tile_sum(), 4);
    }

    #[test]
    fn test_display_shows_every_row() {
        let grid = Grid::from_rows(vec![vec![2, 0], vec![0, 16]]).unwrap();
        let rendered = grid.to_string();
        assert_eq!(rendered.lines().count(), 5);
        assert!(rendered.contains("   16 "));
    }
}
