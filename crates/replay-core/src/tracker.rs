use crate::{Grid, Position, GRID_SIZE};

/// Bookkeeping for which digits are already used in each row, column and
/// 3x3 box. One `u16` bitmask per unit, bit `v` set when digit `v` is
/// placed somewhere in that unit.
///
/// The tracker and the grid are kept mutually consistent by routing every
/// mutation through [`place`](Self::place) and [`remove`](Self::remove),
/// which update the cell and the three masks together.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTracker {
    rows: [u16; GRID_SIZE],
    cols: [u16; GRID_SIZE],
    boxes: [u16; GRID_SIZE],
}

impl ConstraintTracker {
    /// Tracker with no digits placed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker pre-loaded with every filled cell of `grid`.
    ///
    /// Input consistency is not checked: duplicate givens in one unit
    /// collapse into a single mask bit, and the search simply exhausts
    /// later without finding a solution.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut tracker = Self::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let pos = Position::new(row, col);
                if let Some(value) = grid.get(pos) {
                    tracker.mark(pos, value);
                }
            }
        }
        tracker
    }

    /// Check whether `value` is legal at `pos`: absent from the row,
    /// column and box. O(1), no side effects.
    pub fn is_valid(&self, pos: Position, value: u8) -> bool {
        let used = self.rows[pos.row] | self.cols[pos.col] | self.boxes[pos.box_index()];
        used & (1 << value) == 0
    }

    /// Write `value` into the grid cell and mark it used in the three
    /// units. The caller must have checked [`is_valid`](Self::is_valid)
    /// immediately before; a violation is a bug in the search, not a
    /// runtime condition.
    pub fn place(&mut self, grid: &mut Grid, pos: Position, value: u8) {
        debug_assert!(self.is_valid(pos, value), "place() without is_valid() at {}", pos);
        debug_assert!(grid.get(pos).is_none(), "place() over a filled cell at {}", pos);
        grid.set(pos, Some(value));
        self.mark(pos, value);
    }

    /// Clear the grid cell and unmark `value` in the three units. Must
    /// match a prior unmatched [`place`](Self::place).
    pub fn remove(&mut self, grid: &mut Grid, pos: Position, value: u8) {
        debug_assert_eq!(grid.get(pos), Some(value), "remove() mismatch at {}", pos);
        grid.set(pos, None);
        let bit = 1u16 << value;
        self.rows[pos.row] &= !bit;
        self.cols[pos.col] &= !bit;
        self.boxes[pos.box_index()] &= !bit;
    }

    fn mark(&mut self, pos: Position, value: u8) {
        let bit = 1u16 << value;
        self.rows[pos.row] |= bit;
        self.cols[pos.col] |= bit;
        self.boxes[pos.box_index()] |= bit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_allows_everything() {
        let tracker = ConstraintTracker::new();
        for value in 1..=9 {
            assert!(tracker.is_valid(Position::new(0, 0), value));
            assert!(tracker.is_valid(Position::new(8, 8), value));
        }
    }

    #[test]
    fn test_place_blocks_row_col_box() {
        let mut grid = Grid::new();
        let mut tracker = ConstraintTracker::new();
        tracker.place(&mut grid, Position::new(4, 4), 7);

        assert_eq!(grid.get(Position::new(4, 4)), Some(7));
        // Same row
        assert!(!tracker.is_valid(Position::new(4, 0), 7));
        // Same column
        assert!(!tracker.is_valid(Position::new(0, 4), 7));
        // Same box, different row and column
        assert!(!tracker.is_valid(Position::new(3, 3), 7));
        // Unrelated cell
        assert!(tracker.is_valid(Position::new(0, 0), 7));
        // Different digit in the same cell's units
        assert!(tracker.is_valid(Position::new(4, 0), 6));
    }

    #[test]
    fn test_remove_restores_validity() {
        let mut grid = Grid::new();
        let mut tracker = ConstraintTracker::new();
        let pos = Position::new(2, 6);

        tracker.place(&mut grid, pos, 3);
        assert!(!tracker.is_valid(Position::new(2, 0), 3));

        tracker.remove(&mut grid, pos, 3);
        assert_eq!(grid.get(pos), None);
        assert!(tracker.is_valid(Position::new(2, 0), 3));
        assert!(tracker.is_valid(pos, 3));
    }

    #[test]
    fn test_from_grid_marks_givens() {
        let grid = Grid::from_string(
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        )
        .unwrap();
        let tracker = ConstraintTracker::from_grid(&grid);

        // Row 0 already holds 5, 3 and 7
        assert!(!tracker.is_valid(Position::new(0, 2), 5));
        assert!(!tracker.is_valid(Position::new(0, 2), 3));
        assert!(!tracker.is_valid(Position::new(0, 2), 7));
        // Column 0 holds 6; box 0 holds 9 (via cell (2, 1))
        assert!(!tracker.is_valid(Position::new(0, 2), 6));
        assert!(!tracker.is_valid(Position::new(0, 2), 9));
        // 4 conflicts with nothing at (0, 2)
        assert!(tracker.is_valid(Position::new(0, 2), 4));
    }

    #[test]
    fn test_from_grid_tolerates_duplicate_givens() {
        let mut grid = Grid::new();
        grid.set(Position::new(0, 0), Some(5));
        grid.set(Position::new(0, 5), Some(5));

        // Duplicates collapse into one bit, so 5 stays blocked in row 0
        let tracker = ConstraintTracker::from_grid(&grid);
        assert!(!tracker.is_valid(Position::new(0, 2), 5));
        assert!(tracker.is_valid(Position::new(1, 0), 6));
    }
}
