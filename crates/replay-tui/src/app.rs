use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use replay_core::{Grid, Outcome, Position, Solver, Step};
use std::time::Duration;

/// The demo puzzle loaded by the `x` key.
pub const SAMPLE_PUZZLE: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

/// How much `+` / `-` change the step delay.
const DELAY_INCREMENT: Duration = Duration::from_millis(10);

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Entering or editing the puzzle
    Editing,
    /// Stepping through the recorded trace
    Replaying,
    /// Replay finished; outcome on display
    Done,
}

/// Playback cursor over one recorded search.
pub struct Replay {
    pub trace: Vec<Step>,
    pub outcome: Outcome,
    /// Index of the next step to apply
    pub next: usize,
    pub paused: bool,
}

/// The main application state
pub struct App {
    /// The puzzle as entered (givens only)
    pub puzzle: Grid,
    /// Grid shown during replay; each step is written into it in order
    pub board: Grid,
    /// Currently selected cell while editing
    pub cursor: Position,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Color theme
    pub theme: Theme,
    /// Delay between replayed steps
    pub step_delay: Duration,
    /// Active replay, if any
    pub replay: Option<Replay>,
    /// Cell written by the most recently applied step
    pub highlight: Option<Position>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
}

impl App {
    /// Create the app with an initial puzzle and step delay.
    pub fn new(puzzle: Grid, step_delay: Duration, theme: Theme) -> Self {
        Self {
            board: puzzle.clone(),
            puzzle,
            cursor: Position::new(4, 4),
            screen_state: ScreenState::Editing,
            theme,
            step_delay,
            replay: None,
            highlight: None,
            message: None,
            message_timer: 0,
        }
    }

    /// The grid the renderer should draw.
    pub fn display_grid(&self) -> &Grid {
        match self.screen_state {
            ScreenState::Editing => &self.puzzle,
            ScreenState::Replaying | ScreenState::Done => &self.board,
        }
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Replaying if !self.is_paused() => {
                // One step per tick; never spin on a zero delay
                self.step_delay.max(Duration::from_millis(1))
            }
            _ => Duration::from_millis(100),
        }
    }

    fn is_paused(&self) -> bool {
        self.replay.as_ref().is_some_and(|r| r.paused)
    }

    /// Number of steps applied so far.
    pub fn steps_applied(&self) -> usize {
        self.replay.as_ref().map_or(0, |r| r.next)
    }

    /// Total steps in the recorded trace.
    pub fn steps_total(&self) -> usize {
        self.replay.as_ref().map_or(0, |r| r.trace.len())
    }

    /// Outcome of the recorded search, once one exists.
    pub fn outcome(&self) -> Option<Outcome> {
        self.replay.as_ref().map(|r| r.outcome)
    }

    /// Advance timers and playback (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.screen_state == ScreenState::Replaying && !self.is_paused() {
            self.apply_next_step();
        }
    }

    /// Write the next recorded step into the board, or finish the replay.
    fn apply_next_step(&mut self) {
        let Some(replay) = self.replay.as_mut() else {
            return;
        };

        if replay.next < replay.trace.len() {
            let step = replay.trace[replay.next];
            self.board.set(step.pos, Some(step.value));
            self.highlight = Some(step.pos);
            replay.next += 1;
        } else {
            self.highlight = None;
            self.screen_state = ScreenState::Done;
            match replay.outcome {
                Outcome::Solved => self.show_message("Solved!"),
                Outcome::Exhausted => self.show_message("No solution exists"),
            }
        }
    }

    /// Solve the current puzzle and start replaying its trace.
    fn start_replay(&mut self) {
        let result = Solver::new().solve(&self.puzzle);
        self.show_message(&format!("Recorded {} steps", result.trace.len()));
        self.replay = Some(Replay {
            trace: result.trace,
            outcome: result.outcome,
            next: 0,
            paused: false,
        });
        self.board = self.puzzle.clone();
        self.highlight = None;
        self.screen_state = ScreenState::Replaying;
    }

    /// Drop the replay and return to editing.
    fn stop_replay(&mut self) {
        self.replay = None;
        self.highlight = None;
        self.board = self.puzzle.clone();
        self.screen_state = ScreenState::Editing;
    }

    /// Restart playback of the existing trace from the beginning.
    fn restart_replay(&mut self) {
        if let Some(replay) = self.replay.as_mut() {
            replay.next = 0;
            replay.paused = false;
            self.board = self.puzzle.clone();
            self.highlight = None;
            self.screen_state = ScreenState::Replaying;
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at the editing tick rate
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Editing => self.handle_editing_key(key),
            ScreenState::Replaying => self.handle_replaying_key(key),
            ScreenState::Done => self.handle_done_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Digit entry
            KeyCode::Char(c @ '1'..='9') => {
                let value = c.to_digit(10).unwrap() as u8;
                self.puzzle.set(self.cursor, Some(value));
            }
            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                self.puzzle.set(self.cursor, None);
            }

            // Board management
            KeyCode::Char('x') => {
                self.puzzle = Grid::from_string(SAMPLE_PUZZLE)
                    .expect("sample puzzle string is valid");
                self.show_message("Sample puzzle loaded");
            }
            KeyCode::Char('c') => {
                self.puzzle = Grid::new();
                self.show_message("Board cleared");
            }

            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_delay(true),
            KeyCode::Char('-') => self.adjust_delay(false),

            KeyCode::Enter | KeyCode::Char('s') => self.start_replay(),

            _ => {}
        }
        AppAction::Continue
    }

    fn handle_replaying_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Esc => self.stop_replay(),
            KeyCode::Char(' ') => {
                if let Some(replay) = self.replay.as_mut() {
                    replay.paused = !replay.paused;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_delay(true),
            KeyCode::Char('-') => self.adjust_delay(false),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_done_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('r') => self.restart_replay(),
            KeyCode::Esc | KeyCode::Enter => self.stop_replay(),
            _ => {}
        }
        AppAction::Continue
    }

    fn move_cursor(&mut self, delta_row: i32, delta_col: i32) {
        let row = (self.cursor.row as i32 + delta_row).clamp(0, 8) as usize;
        let col = (self.cursor.col as i32 + delta_col).clamp(0, 8) as usize;
        self.cursor = Position::new(row, col);
    }

    fn adjust_delay(&mut self, up: bool) {
        self.step_delay = if up {
            self.step_delay.saturating_add(DELAY_INCREMENT)
        } else {
            self.step_delay.saturating_sub(DELAY_INCREMENT)
        };
        self.show_message(&format!("Step delay: {} ms", self.step_delay.as_millis()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(Grid::new(), Duration::from_millis(0), Theme::dark())
    }

    #[test]
    fn test_cursor_navigation() {
        let mut app = test_app();
        assert_eq!(app.cursor, Position::new(4, 4));

        app.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(app.cursor, Position::new(3, 4));
        app.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(app.cursor, Position::new(4, 4));
        app.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.cursor, Position::new(4, 3));
        app.handle_key(KeyEvent::from(KeyCode::Right));
        assert_eq!(app.cursor, Position::new(4, 4));
    }

    #[test]
    fn test_cursor_clamps_at_edges() {
        let mut app = test_app();
        for _ in 0..20 {
            app.handle_key(KeyEvent::from(KeyCode::Up));
            app.handle_key(KeyEvent::from(KeyCode::Left));
        }
        assert_eq!(app.cursor, Position::new(0, 0));
    }

    #[test]
    fn test_digit_entry_and_clear() {
        let mut app = test_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('5')));
        assert_eq!(app.puzzle.get(app.cursor), Some(5));

        app.handle_key(KeyEvent::from(KeyCode::Char('0')));
        assert_eq!(app.puzzle.get(app.cursor), None);
    }

    #[test]
    fn test_sample_load_and_clear_board() {
        let mut app = test_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        assert_eq!(app.puzzle, Grid::from_string(SAMPLE_PUZZLE).unwrap());

        app.handle_key(KeyEvent::from(KeyCode::Char('c')));
        assert_eq!(app.puzzle, Grid::new());
    }

    #[test]
    fn test_delay_adjust() {
        let mut app = test_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('+')));
        assert_eq!(app.step_delay, Duration::from_millis(10));
        app.handle_key(KeyEvent::from(KeyCode::Char('-')));
        app.handle_key(KeyEvent::from(KeyCode::Char('-')));
        assert_eq!(app.step_delay, Duration::ZERO);
    }

    #[test]
    fn test_replay_runs_to_completion() {
        let mut app = test_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.screen_state, ScreenState::Replaying);

        let total = app.steps_total();
        assert!(total > 0);

        // One step per tick, plus one tick to notice the end
        for _ in 0..=total {
            app.tick();
        }
        assert_eq!(app.screen_state, ScreenState::Done);
        assert_eq!(app.outcome(), Some(Outcome::Solved));
        assert!(app.board.is_solved());
    }

    #[test]
    fn test_escape_stops_replay() {
        let mut app = test_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        app.tick();

        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.screen_state, ScreenState::Editing);
        assert_eq!(app.board, app.puzzle);
    }
}
