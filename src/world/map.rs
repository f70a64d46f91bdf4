//! Tile maps: the static blocked-cell layer of the world
//!
//! A [`TileMap`] is the per-map collision truth the pathfinder and the tile
//! probe read from. It is immutable during a frame; the surrounding game
//! loads it before the core runs.

use std::fmt;
use std::fs;
use std::path::Path;

/// A single map's collision layer: a `cols` x `rows` grid of blocked flags.
#[derive(Debug, Clone)]
pub struct TileMap {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl TileMap {
    /// Create an all-walkable map
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// Parse a map from a text grid: one line per row, whitespace-separated
    /// tile numbers, `0` walkable and anything else blocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, a row has a different width
    /// than the first, or a cell is not a number.
    pub fn from_text(text: &str) -> Result<Self, MapError> {
        let mut cols = 0;
        let mut rows = 0;
        let mut cells = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut width = 0;
            for token in line.split_whitespace() {
                let tile: u32 = token
                    .parse()
                    .map_err(|_| MapError::BadCell(line_no + 1, token.to_string()))?;
                cells.push(tile != 0);
                width += 1;
            }
            if rows == 0 {
                cols = width;
            } else if width != cols {
                return Err(MapError::RaggedRow(line_no + 1));
            }
            rows += 1;
        }

        if rows == 0 || cols == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self { cols, rows, cells })
    }

    /// Load a map from a text file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the grid is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = fs::read_to_string(path).map_err(|e| MapError::Io(e.to_string()))?;
        Self::from_text(&text)
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Mark a cell blocked or free
    pub fn set_blocked(&mut self, col: usize, row: usize, blocked: bool) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = blocked;
        }
    }

    /// The blocked-cell predicate. Coordinates outside the grid read as
    /// blocked, so callers can never walk off the edge of the world.
    #[must_use]
    pub fn is_blocked(&self, col: usize, row: usize) -> bool {
        if col >= self.cols || row >= self.rows {
            return true;
        }
        self.cells[row * self.cols + col]
    }
}

/// Errors from parsing or loading a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map text had no cells
    Empty,
    /// A row's width differed from the first row (1-based line number)
    RaggedRow(usize),
    /// A cell was not a tile number (1-based line number, offending token)
    BadCell(usize, String),
    /// The map file could not be read
    Io(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map text contains no cells"),
            Self::RaggedRow(line) => write!(f, "row width mismatch at line {line}"),
            Self::BadCell(line, token) => write!(f, "bad tile number {token:?} at line {line}"),
            Self::Io(e) => write!(f, "map file error: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let map = TileMap::from_text("0 0 1\n1 0 0\n").unwrap();
        assert_eq!(map.cols(), 3);
        assert_eq!(map.rows(), 2);
        assert!(map.is_blocked(2, 0));
        assert!(map.is_blocked(0, 1));
        assert!(!map.is_blocked(1, 1));
    }

    #[test]
    fn test_from_text_skips_blank_lines() {
        let map = TileMap::from_text("\n0 0\n\n0 1\n").unwrap();
        assert_eq!(map.rows(), 2);
        assert!(map.is_blocked(1, 1));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = TileMap::from_text("0 0 0\n0 0\n").unwrap_err();
        assert_eq!(err, MapError::RaggedRow(2));
    }

    #[test]
    fn test_bad_cell_rejected() {
        let err = TileMap::from_text("0 x 0\n").unwrap_err();
        assert!(matches!(err, MapError::BadCell(1, _)));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(TileMap::from_text("  \n \n").unwrap_err(), MapError::Empty);
    }

    #[test]
    fn test_out_of_range_reads_blocked() {
        let map = TileMap::new(4, 4);
        assert!(!map.is_blocked(3, 3));
        assert!(map.is_blocked(4, 0));
        assert!(map.is_blocked(0, 4));
    }
}
