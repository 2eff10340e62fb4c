//! Solve a puzzle and print the recorded search trace.

use replay_core::{Grid, Solver};

fn main() {
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let puzzle = Grid::from_string(puzzle_string).expect("valid puzzle string");

    println!("Puzzle ({} givens):", puzzle.filled_count());
    println!("{}\n", puzzle);

    let solver = Solver::new();
    let result = solver.solve(&puzzle);

    println!("Outcome: {}", result.outcome);
    println!("Steps recorded: {}", result.trace.len());

    println!("\nFirst placements tried:");
    for step in result.trace.iter().take(10) {
        println!("  {} <- {}", step.pos, step.value);
    }

    if result.is_solved() {
        println!("\nSolution:");
        println!("{}", result.grid);
    } else {
        println!("\nNo solution exists; the trace still records every attempt.");
    }
}
