use crate::app::{App, ScreenState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use replay_core::{Outcome, Position};
use std::io;

// Grid dimensions: 9 cells of 3 chars plus 10 borders = 37 wide,
// 9 cell rows plus 10 border rows = 19 tall.
const GRID_WIDTH: u16 = 37;
const GRID_HEIGHT: u16 = 19;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    // Center the grid, leaving room for the info panel on the right
    let total_width = GRID_WIDTH + 25;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > GRID_HEIGHT + 6 { 2 } else { 1 };

    render_grid(stdout, app, start_x, start_y)?;

    let info_x = start_x + GRID_WIDTH + 3;
    render_info_panel(stdout, app, info_x, start_y)?;

    let controls_y = start_y + GRID_HEIGHT + 1;
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width, controls_y + 2)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let grid = app.display_grid();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // 10 horizontal borders, thick at box boundaries
    for line in 0..=9u16 {
        let (color, segment) = if line % 3 == 0 {
            (theme.box_border, "+===+===+===+===+===+===+===+===+===+")
        } else {
            (theme.border, "+---+---+---+---+---+---+---+---+---+")
        };
        execute!(
            stdout,
            MoveTo(x, y + line * 2),
            SetForegroundColor(color),
            Print(segment)
        )?;
    }

    for row in 0..9usize {
        let cell_y = y + 1 + row as u16 * 2;
        for col in 0..9usize {
            let cell_x = x + col as u16 * 4;
            let sep_color = if col % 3 == 0 { theme.box_border } else { theme.border };
            execute!(
                stdout,
                MoveTo(cell_x, cell_y),
                SetForegroundColor(sep_color),
                Print("|")
            )?;

            let pos = Position::new(row, col);
            render_cell(stdout, app, pos, cell_x + 1, cell_y)?;
        }
        execute!(
            stdout,
            MoveTo(x + GRID_WIDTH - 1, cell_y),
            SetForegroundColor(theme.box_border),
            Print("|")
        )?;
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let bg = if app.highlight == Some(pos) {
        theme.step_bg
    } else if app.screen_state == ScreenState::Editing && app.cursor == pos {
        theme.cursor_bg
    } else {
        theme.bg
    };

    // Givens keep their own color so replayed placements stand out
    let is_given = app.puzzle.get(pos).is_some();
    let (text, fg) = match app.display_grid().get(pos) {
        Some(v) if is_given => (format!(" {} ", v), theme.given),
        Some(v) => (format!(" {} ", v), theme.placed),
        None => (" . ".to_string(), theme.border),
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(text),
        SetBackgroundColor(theme.bg)
    )?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print("SUDOKU REPLAY")
    )?;

    let state_line = match app.screen_state {
        ScreenState::Editing => "editing puzzle".to_string(),
        ScreenState::Replaying => {
            if app.replay.as_ref().is_some_and(|r| r.paused) {
                "replaying (paused)".to_string()
            } else {
                "replaying".to_string()
            }
        }
        ScreenState::Done => "finished".to_string(),
    };
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(state_line)
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("delay  {} ms", app.step_delay.as_millis()))
    )?;

    match app.screen_state {
        ScreenState::Editing => {
            execute!(
                stdout,
                MoveTo(x, y + 5),
                SetForegroundColor(theme.info),
                Print(format!("givens {}", app.puzzle.filled_count()))
            )?;
        }
        ScreenState::Replaying | ScreenState::Done => {
            execute!(
                stdout,
                MoveTo(x, y + 5),
                SetForegroundColor(theme.info),
                Print(format!("step   {} / {}", app.steps_applied(), app.steps_total()))
            )?;
        }
    }

    if app.screen_state == ScreenState::Done {
        let (text, color) = match app.outcome() {
            Some(Outcome::Solved) => ("SOLVED", theme.success),
            Some(Outcome::Exhausted) => ("NO SOLUTION", theme.error),
            None => ("", theme.info),
        };
        execute!(
            stdout,
            MoveTo(x, y + 7),
            SetForegroundColor(color),
            Print(text)
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let bindings: &[(&str, &str)] = match app.screen_state {
        ScreenState::Editing => &[
            ("arrows", "move"),
            ("1-9", "set"),
            ("0", "clear cell"),
            ("x", "sample"),
            ("c", "clear board"),
            ("enter", "solve"),
            ("+/-", "delay"),
            ("q", "quit"),
        ],
        ScreenState::Replaying => &[
            ("space", "pause"),
            ("+/-", "delay"),
            ("esc", "stop"),
            ("q", "quit"),
        ],
        ScreenState::Done => &[
            ("r", "replay again"),
            ("esc", "edit"),
            ("q", "quit"),
        ],
    };

    execute!(stdout, MoveTo(x, y))?;
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            execute!(stdout, SetForegroundColor(theme.border), Print("  "))?;
        }
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(*key),
            SetForegroundColor(theme.info),
            Print(format!(" {}", action))
        )?;
    }
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
    y: u16,
) -> io::Result<()> {
    let x = term_width.saturating_sub(msg.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(app.theme.fg),
        SetBackgroundColor(Color::Reset),
        Print(msg)
    )?;
    Ok(())
}
