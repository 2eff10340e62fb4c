mod app;
mod render;
mod theme;

use app::{App, AppAction};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use replay_core::{Grid, Outcome, Solver, Step};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use theme::Theme;

/// Watch a backtracking Sudoku solver work, one placement at a time.
#[derive(Parser)]
#[command(name = "sudoku-replay", version, about)]
struct Args {
    /// Puzzle as 81 characters, row-major, '0' or '.' for empty cells
    #[arg(long)]
    puzzle: Option<String>,

    /// Initial delay between replayed steps, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay: u64,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeChoice::Dark)]
    theme: ThemeChoice,

    /// Solve without the UI and write the recorded trace as JSON
    #[arg(long, value_name = "FILE")]
    dump_trace: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Dark,
    Light,
    HighContrast,
}

impl ThemeChoice {
    fn theme(self) -> Theme {
        match self {
            ThemeChoice::Dark => Theme::dark(),
            ThemeChoice::Light => Theme::light(),
            ThemeChoice::HighContrast => Theme::high_contrast(),
        }
    }
}

/// Shape of the JSON written by `--dump-trace`.
#[derive(Serialize)]
struct TraceDump {
    puzzle: String,
    outcome: Outcome,
    final_grid: String,
    steps: Vec<Step>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let puzzle = match &args.puzzle {
        Some(s) => Grid::from_string(s)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?,
        None => Grid::new(),
    };

    if let Some(path) = &args.dump_trace {
        return dump_trace(&puzzle, path);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let app = App::new(puzzle, Duration::from_millis(args.delay), args.theme.theme());
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, &app)?;
        stdout.flush()?;

        // Handle input with a timeout so playback keeps ticking
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Solve headlessly and write the puzzle, outcome and full step trace.
fn dump_trace(puzzle: &Grid, path: &PathBuf) -> io::Result<()> {
    let result = Solver::new().solve(puzzle);

    let dump = TraceDump {
        puzzle: puzzle.to_string_compact(),
        outcome: result.outcome,
        final_grid: result.grid.to_string_compact(),
        steps: result.trace,
    };

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &dump)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    println!(
        "{}: {} steps written to {}",
        dump.outcome,
        dump.steps.len(),
        path.display()
    );
    Ok(())
}
