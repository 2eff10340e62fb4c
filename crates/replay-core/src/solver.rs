use crate::{ConstraintTracker, Grid, Position, CELL_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trial placement made during the search. The trace keeps every
/// step ever made, including placements the search later undid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub pos: Position,
    pub value: u8,
}

/// Terminal state of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A complete valid solution was found (the first one in digit order).
    Solved,
    /// Every branch was tried without finding a solution.
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Solved => write!(f, "solved"),
            Outcome::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Everything one solve call produces.
///
/// On [`Outcome::Solved`] the grid holds a complete valid solution; on
/// [`Outcome::Exhausted`] it holds exactly the input's filled cells,
/// every speculative placement having been undone. The trace is the full
/// chronological record of attempts either way.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub outcome: Outcome,
    pub grid: Grid,
    pub trace: Vec<Step>,
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }
}

/// Unit struct solver — stateless, all state is per-call.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Run the backtracking search over a copy of `grid`.
    ///
    /// Cells are visited in row-major order; each empty cell tries the
    /// digits 1-9 ascending and recurses, undoing the placement when the
    /// branch fails. The search stops at the first solution.
    pub fn solve(&self, grid: &Grid) -> SolveResult {
        let mut working = grid.clone();
        let mut tracker = ConstraintTracker::from_grid(&working);
        let mut trace = Vec::new();

        let outcome = if solve_recursive(&mut working, &mut tracker, &mut trace, 0) {
            Outcome::Solved
        } else {
            Outcome::Exhausted
        };

        SolveResult {
            outcome,
            grid: working,
            trace,
        }
    }
}

/// Depth-first search from the given row-major cell index. Returns true
/// when a full solution is in place; "found" propagates up the call
/// chain instead of living in a shared flag.
fn solve_recursive(
    grid: &mut Grid,
    tracker: &mut ConstraintTracker,
    trace: &mut Vec<Step>,
    index: usize,
) -> bool {
    if index == CELL_COUNT {
        return true;
    }

    let pos = Position::from_index(index);
    if grid.get(pos).is_some() {
        // Pre-filled cell: advance without branching
        return solve_recursive(grid, tracker, trace, index + 1);
    }

    for value in 1..=9 {
        if tracker.is_valid(pos, value) {
            tracker.place(grid, pos, value);
            trace.push(Step { pos, value });
            if solve_recursive(grid, tracker, trace, index + 1) {
                return true;
            }
            tracker.remove(grid, pos, value);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_solve_classic_puzzle() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let result = Solver::new().solve(&grid);

        assert_eq!(result.outcome, Outcome::Solved);
        assert!(result.grid.is_solved());
        // Row 0, column 2 was empty and must resolve to 4
        assert_eq!(result.grid.get(Position::new(0, 2)), Some(4));
    }

    #[test]
    fn test_solve_empty_grid() {
        let result = Solver::new().solve(&Grid::new());

        assert_eq!(result.outcome, Outcome::Solved);
        assert!(result.grid.is_solved());
        // Every cell needed at least one successful placement
        assert!(result.trace.len() >= 81, "trace has {} steps", result.trace.len());
    }

    #[test]
    fn test_determinism() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let solver = Solver::new();
        let first = solver.solve(&grid);
        let second = solver.solve(&grid);

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.grid, second.grid);
        assert_eq!(first.trace, second.trace);
    }

    #[test]
    fn test_givens_preserved() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let result = Solver::new().solve(&grid);
        assert!(result.is_solved());

        for index in 0..crate::CELL_COUNT {
            let pos = Position::from_index(index);
            if let Some(given) = grid.get(pos) {
                assert_eq!(result.grid.get(pos), Some(given), "given at {} changed", pos);
            }
        }
    }

    #[test]
    fn test_input_grid_untouched() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let copy = grid.clone();
        let _ = Solver::new().solve(&grid);
        assert_eq!(grid, copy);
    }

    #[test]
    fn test_trace_replay_reconstructs_solution() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let result = Solver::new().solve(&grid);
        assert!(result.is_solved());

        // Keeping only the steps still present in the final grid and
        // applying them to the input reconstructs the final grid.
        let mut replay = grid.clone();
        for step in &result.trace {
            if result.grid.get(step.pos) == Some(step.value) {
                replay.set(step.pos, Some(step.value));
            }
        }
        assert_eq!(replay, result.grid);
    }

    #[test]
    fn test_trace_steps_in_range() {
        let result = Solver::new().solve(&Grid::from_string(CLASSIC).unwrap());
        for step in &result.trace {
            assert!(step.pos.row < 9 && step.pos.col < 9);
            assert!((1..=9).contains(&step.value));
        }
    }

    /// Classic puzzle with a second 5 wedged into row 0 at (0, 3):
    /// contradictory input that from_string happily accepts.
    fn contradictory_grid() -> Grid {
        let mut grid = Grid::from_string(CLASSIC).unwrap();
        grid.set(Position::new(0, 3), Some(5));
        grid
    }

    #[test]
    fn test_exhausted_duplicate_in_row() {
        // Two 5s in row 0: not rejected up front, but no completion exists
        let grid = contradictory_grid();
        let result = Solver::new().solve(&grid);

        assert_eq!(result.outcome, Outcome::Exhausted);
        // No leftover speculative digits: filled cells equal the input's
        assert_eq!(result.grid, grid);
    }

    #[test]
    fn test_exhausted_trace_retained() {
        let result = Solver::new().solve(&contradictory_grid());
        assert_eq!(result.outcome, Outcome::Exhausted);
        // The failed search still attempted placements worth replaying
        assert!(!result.trace.is_empty());
    }

    #[test]
    fn test_step_serde_round_trip() {
        let step = Step { pos: Position::new(3, 7), value: 8 };
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);

        let outcome: Outcome = serde_json::from_str("\"Exhausted\"").unwrap();
        assert_eq!(outcome, Outcome::Exhausted);
    }
}
