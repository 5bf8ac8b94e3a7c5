//! Main TUI application state and logic

use crate::playback::{LogLevel, Mode, PlaybackError, Runner};
use crate::ui::panes::{
    render_log_pane, render_narrative_pane, render_status_bar, render_visual_pane,
    StatusRenderData, StepView,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Speeds offered by `+` and `-`
const SPEED_STEPS: [f64; 6] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Visual,
    Narrative,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: visual -> narrative -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Visual => FocusedPane::Narrative,
            FocusedPane::Narrative => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Visual,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Visual => FocusedPane::Log,
            FocusedPane::Narrative => FocusedPane::Visual,
            FocusedPane::Log => FocusedPane::Narrative,
        }
    }
}

/// The player state
pub struct App<K> {
    /// Cursor, mode and timer over the trace being shown
    pub runner: Runner<K>,

    /// Algorithm name shown on the visualization pane
    pub title: String,

    pub focused_pane: FocusedPane,
    pub visual_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl<K: StepView> App<K> {
    pub fn new(runner: Runner<K>, title: impl Into<String>) -> Self {
        App {
            runner,
            title: title.into(),
            focused_pane: FocusedPane::Visual,
            visual_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI event loop until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.runner.is_playing() {
                if self.runner.tick(Instant::now()).is_some() {
                    self.status_message = "Playing...".to_string();
                } else if !self.runner.is_playing() {
                    self.status_message = "Playback complete".to_string();
                }
            }

            // Poll with a timeout so ticks keep firing without input
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Right column: narrative (top) | activity (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        let step = self.runner.current();

        render_visual_pane(
            frame,
            columns[0],
            &self.title,
            step,
            self.focused_pane == FocusedPane::Visual,
            &mut self.visual_scroll,
        );

        render_narrative_pane(
            frame,
            right_rows[0],
            step,
            self.focused_pane == FocusedPane::Narrative,
        );

        render_log_pane(
            frame,
            right_rows[1],
            self.runner.log(),
            self.focused_pane == FocusedPane::Log,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                cursor: self.runner.cursor(),
                total_steps: self.runner.len(),
                mode: self.runner.mode(),
                speed: self.runner.speed(),
                is_playing: self.runner.is_playing(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.pause();
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let stepped = (0..n)
                    .take_while(|_| self.runner.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.pause();
                self.step_backward();
            }
            KeyCode::Right => {
                self.pause();
                self.step_forward();
            }
            KeyCode::Up => {
                if self.focused_pane == FocusedPane::Visual {
                    self.visual_scroll = self.visual_scroll.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if self.focused_pane == FocusedPane::Visual {
                    self.visual_scroll = self.visual_scroll.saturating_add(1);
                }
            }
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.status_message = if self.runner.toggle_play() {
                        "Playing...".to_string()
                    } else if self.runner.mode() == Mode::StepByStep {
                        "Step mode: press → to advance".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Char('m') => {
                let mode = match self.runner.mode() {
                    Mode::StepByStep => Mode::Continuous,
                    Mode::Continuous | Mode::Paused => Mode::StepByStep,
                };
                self.runner.set_mode(mode);
                self.status_message = format!("Mode: {}", mode);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = SPEED_STEPS
                    .into_iter()
                    .find(|&s| s > self.runner.speed())
                    .unwrap_or(SPEED_STEPS[SPEED_STEPS.len() - 1]);
                self.runner.set_speed(speed);
                self.status_message = format!("Speed {}x", speed);
            }
            KeyCode::Char('-') => {
                let speed = SPEED_STEPS
                    .into_iter()
                    .rev()
                    .find(|&s| s < self.runner.speed())
                    .unwrap_or(SPEED_STEPS[0]);
                self.runner.set_speed(speed);
                self.status_message = format!("Speed {}x", speed);
            }
            KeyCode::Enter => {
                self.pause();
                self.status_message = match self.runner.jump_to_end() {
                    Ok(_) => "Jumped to end".to_string(),
                    Err(e) => self.report("Cannot jump", e),
                };
            }
            KeyCode::Backspace => {
                self.pause();
                self.status_message = match self.runner.rewind() {
                    Ok(_) => "Jumped to start".to_string(),
                    Err(e) => self.report("Cannot jump", e),
                };
            }
            KeyCode::Char('r') => {
                self.runner.reset();
                self.visual_scroll = 0;
                self.status_message = "Reset".to_string();
            }
            _ => {}
        }
    }

    fn pause(&mut self) {
        if self.runner.is_playing() {
            self.runner.toggle_play();
        }
    }

    fn step_forward(&mut self) {
        self.status_message = match self.runner.step_forward() {
            Ok(_) => "Stepped forward".to_string(),
            Err(e) => self.report("Cannot step forward", e),
        };
    }

    fn step_backward(&mut self) {
        self.status_message = match self.runner.step_backward() {
            Ok(_) => "Stepped backward".to_string(),
            Err(e) => self.report("Cannot step backward", e),
        };
    }

    /// Log a refused navigation and return the status line for it.
    fn report(&mut self, action: &str, err: PlaybackError) -> String {
        let message = format!("{}: {}", action, err);
        self.runner.note(message.clone(), LogLevel::Error);
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackConfig;
    use crate::sorting::bubble_sort_steps;

    fn app() -> App<crate::sorting::SortSnapshot> {
        let runner = Runner::new(bubble_sort_steps(&[3, 1, 2]), PlaybackConfig::default());
        App::new(runner, "Bubble Sort")
    }

    #[test]
    fn test_arrow_keys_move_cursor() {
        let mut app = app();
        app.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.runner.cursor(), None);
        assert!(app.status_message.starts_with("Cannot step backward"));

        app.handle_key_event(KeyEvent::from(KeyCode::Char('3')));
        assert_eq!(app.runner.cursor(), Some(2));

        app.handle_key_event(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.runner.cursor(), Some(1));
    }

    #[test]
    fn test_refused_navigation_is_logged() {
        let mut app = app();
        app.handle_key_event(KeyEvent::from(KeyCode::Left));

        let entry = app.runner.log().last().unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.message, app.status_message);

        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        app.handle_key_event(KeyEvent::from(KeyCode::Right));
        let entry = app.runner.log().last().unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.message.starts_with("Cannot step forward"));
    }

    #[test]
    fn test_speed_keys_clamp() {
        let mut app = app();
        for _ in 0..10 {
            app.handle_key_event(KeyEvent::from(KeyCode::Char('+')));
        }
        assert_eq!(app.runner.speed(), 8.0);
        for _ in 0..10 {
            app.handle_key_event(KeyEvent::from(KeyCode::Char('-')));
        }
        assert_eq!(app.runner.speed(), 0.25);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app();
        app.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.focused_pane, FocusedPane::Narrative);
        app.handle_key_event(KeyEvent::from(KeyCode::BackTab));
        assert_eq!(app.focused_pane, FocusedPane::Visual);
    }
}
