//! Core engine for solving 9x9 Sudoku puzzles by exhaustive backtracking
//! while recording every trial placement the search makes.
//!
//! The engine is synchronous and single-threaded: one call to
//! [`Solver::solve`] runs the whole search and hands back the final grid,
//! a terminal [`Outcome`], and the ordered trace of [`Step`]s. How (and
//! how fast) that trace is replayed is entirely the caller's business.

mod solver;
mod tracker;

pub use solver::{Outcome, SolveResult, Solver, Step};
pub use tracker::ConstraintTracker;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the grid.
pub const GRID_SIZE: usize = 9;
/// Side length of one 3x3 box.
pub const BOX_SIZE: usize = 3;
/// Total number of cells.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Bitmask with one bit set for each digit 1-9.
const ALL_DIGITS: u16 = 0b11_1111_1110;

/// A cell coordinate, row-major, `(0, 0)` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a position. Coordinates must be in `0..9`.
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
        Self { row, col }
    }

    /// Position for a row-major cell index in `0..81`.
    pub fn from_index(index: usize) -> Self {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    /// Row-major cell index in `0..81`.
    pub fn index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    /// Index of the 3x3 box containing this position, in `0..9`.
    pub fn box_index(self) -> usize {
        (self.row / BOX_SIZE) * BOX_SIZE + self.col / BOX_SIZE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, the way players read coordinates
        write!(f, "({}, {})", self.row + 1, self.col + 1)
    }
}

/// Why a grid could not be constructed from external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Puzzle string was not exactly 81 characters.
    WrongLength(usize),
    /// Character at `index` is not a digit 1-9 or an empty marker.
    BadCharacter { index: usize, found: char },
    /// Cell value outside 1-9.
    OutOfRange { pos: Position, value: u8 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::WrongLength(len) => {
                write!(f, "expected 81 characters, got {}", len)
            }
            GridError::BadCharacter { index, found } => {
                write!(f, "invalid character {:?} at index {}", found, index)
            }
            GridError::OutOfRange { pos, value } => {
                write!(f, "value {} at {} is outside 1-9", value, pos)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A 9x9 grid of optional digits. `None` is the explicit empty marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<u8>; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Parse a compact puzzle string: 81 characters, row-major,
    /// `'1'..='9'` for digits and `'0'` or `'.'` for empty cells.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(GridError::WrongLength(chars.len()));
        }

        let mut grid = Self::new();
        for (index, &ch) in chars.iter().enumerate() {
            let pos = Position::from_index(index);
            match ch {
                '0' | '.' => {}
                '1'..='9' => grid.cells[pos.row][pos.col] = Some(ch as u8 - b'0'),
                found => return Err(GridError::BadCharacter { index, found }),
            }
        }
        Ok(grid)
    }

    /// Build a grid from raw cells, rejecting values outside 1-9.
    pub fn from_cells(cells: [[Option<u8>; GRID_SIZE]; GRID_SIZE]) -> Result<Self, GridError> {
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, &cell) in row_cells.iter().enumerate() {
                if let Some(value) = cell {
                    if !(1..=9).contains(&value) {
                        return Err(GridError::OutOfRange {
                            pos: Position::new(row, col),
                            value,
                        });
                    }
                }
            }
        }
        Ok(Self { cells })
    }

    /// Get the value at a position.
    pub fn get(&self, pos: Position) -> Option<u8> {
        self.cells[pos.row][pos.col]
    }

    /// Set or clear the value at a position.
    pub fn set(&mut self, pos: Position, value: Option<u8>) {
        debug_assert!(value.map_or(true, |v| (1..=9).contains(&v)));
        self.cells[pos.row][pos.col] = value;
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        CELL_COUNT - self.filled_count()
    }

    /// Check if every cell is filled.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.is_some())
    }

    /// Check if the grid is a valid complete solution: every row, column
    /// and box contains each digit 1-9 exactly once.
    pub fn is_solved(&self) -> bool {
        let mut rows = [0u16; GRID_SIZE];
        let mut cols = [0u16; GRID_SIZE];
        let mut boxes = [0u16; GRID_SIZE];

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let pos = Position::new(row, col);
                let value = match self.get(pos) {
                    Some(v) => v,
                    None => return false,
                };
                let bit = 1u16 << value;
                if rows[row] & bit != 0
                    || cols[col] & bit != 0
                    || boxes[pos.box_index()] & bit != 0
                {
                    return false;
                }
                rows[row] |= bit;
                cols[col] |= bit;
                boxes[pos.box_index()] |= bit;
            }
        }

        rows.iter()
            .chain(cols.iter())
            .chain(boxes.iter())
            .all(|&mask| mask == ALL_DIGITS)
    }

    /// Format as a compact 81-character string (`'0'` for empty).
    pub fn to_string_compact(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|c| match c {
                Some(v) => (b'0' + v) as char,
                None => '0',
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..GRID_SIZE {
            if row % BOX_SIZE == 0 {
                writeln!(f, "+-------+-------+-------+")?;
            }
            for col in 0..GRID_SIZE {
                if col % BOX_SIZE == 0 {
                    write!(f, "| ")?;
                }
                match self.cells[row][col] {
                    Some(v) => write!(f, "{} ", v)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "+-------+-------+-------+")
    }
}
