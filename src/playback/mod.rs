//! Trace playback
//!
//! A [`Runner`] owns one finished [`Trace`] and a cursor into it. Manual
//! navigation (`step_forward`, `step_backward`, `go_to`, `rewind`,
//! `jump_to_end`) is plain indexing and can be repeated freely. Continuous
//! playback is cooperative: the owner calls [`Runner::tick`] from its event
//! loop and the runner applies at most one step per elapsed interval.
//!
//! Applying a step publishes it to every subscriber and records it in the
//! [`ActivityLog`].

use crate::trace::{Step, StepKind, Trace};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 8.0;

/// Entries kept in the activity log
pub const LOG_CAPACITY: usize = 5;

/// Navigation requests that fall outside the trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("already at the first step")]
    AtStart,

    #[error("already at the last step")]
    AtEnd,

    #[error("step {index} is out of range (trace has {len} steps)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Continuous,
    StepByStep,
    Paused,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Continuous => "continuous",
            Mode::StepByStep => "step-by-step",
            Mode::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Timing for continuous playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub base_interval: Duration,
    pub speed: f64,
    pub min_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            base_interval: Duration::from_millis(1000),
            speed: 1.0,
            min_interval: Duration::from_millis(50),
        }
    }
}

impl PlaybackConfig {
    /// Delay between ticks: `max(min_interval, base_interval / speed)`
    pub fn interval(&self) -> Duration {
        let scaled = self.base_interval.as_secs_f64() / clamp_speed(self.speed);
        Duration::from_secs_f64(scaled).max(self.min_interval)
    }
}

fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        1.0
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
    pub timestamp: Instant,
}

/// The most recent [`LOG_CAPACITY`] events, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, message: impl Into<String>, level: LogLevel) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            message: message.into(),
            level,
            timestamp: Instant::now(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

type Subscriber<K> = Box<dyn FnMut(usize, &Step<K>)>;

/// Cursor, mode and timer over one trace.
pub struct Runner<K> {
    trace: Trace<K>,
    cursor: Option<usize>,
    mode: Mode,
    playing: bool,
    config: PlaybackConfig,
    last_tick: Option<Instant>,
    log: ActivityLog,
    subscribers: Vec<Subscriber<K>>,
}

impl<K: StepKind> Runner<K> {
    pub fn new(trace: Trace<K>, config: PlaybackConfig) -> Self {
        let mut config = config;
        config.speed = clamp_speed(config.speed);
        Runner {
            trace,
            cursor: None,
            mode: Mode::Continuous,
            playing: false,
            config,
            last_tick: None,
            log: ActivityLog::default(),
            subscribers: Vec::new(),
        }
    }

    pub fn trace(&self) -> &Trace<K> {
        &self.trace
    }

    /// Index of the last applied step; `None` before the first one
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Step<K>> {
        self.cursor.and_then(|i| self.trace.get(i))
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 >= self.trace.len())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Record an event that did not come from a step.
    pub fn note(&mut self, message: impl Into<String>, level: LogLevel) {
        self.log.push(message, level);
    }

    /// Register a callback invoked with every applied step.
    pub fn subscribe(&mut self, subscriber: impl FnMut(usize, &Step<K>) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn apply(&mut self, index: usize) -> Result<usize, PlaybackError> {
        let step = self.trace.get(index).ok_or(PlaybackError::OutOfRange {
            index,
            len: self.trace.len(),
        })?;

        for subscriber in &mut self.subscribers {
            subscriber(index, step);
        }

        let level = if step.state.is_milestone() {
            LogLevel::Success
        } else {
            LogLevel::Info
        };
        self.log
            .push(format!("{} - {}", step.message, step.description), level);
        self.cursor = Some(index);
        Ok(index)
    }

    pub fn step_forward(&mut self) -> Result<usize, PlaybackError> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.trace.len() {
            return Err(PlaybackError::AtEnd);
        }
        self.apply(next)
    }

    pub fn step_backward(&mut self) -> Result<usize, PlaybackError> {
        match self.cursor {
            Some(c) if c > 0 => self.apply(c - 1),
            _ => Err(PlaybackError::AtStart),
        }
    }

    /// Jump straight to `index`.
    pub fn go_to(&mut self, index: usize) -> Result<usize, PlaybackError> {
        self.apply(index)
    }

    pub fn rewind(&mut self) -> Result<usize, PlaybackError> {
        self.apply(0)
    }

    pub fn jump_to_end(&mut self) -> Result<usize, PlaybackError> {
        match self.trace.len() {
            0 => Err(PlaybackError::AtEnd),
            len => self.apply(len - 1),
        }
    }

    /// Forget the cursor and stop playback. The trace is kept.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.mode = Mode::Continuous;
        self.playing = false;
        self.last_tick = None;
        self.log.push("Visualization reset", LogLevel::Info);
        tracing::info!("playback reset");
    }

    /// Play/pause button. Returns whether playback is now running.
    ///
    /// A running continuous playback pauses and keeps its cursor. A paused
    /// playback resumes after the cursor. In step-by-step mode nothing
    /// auto-plays.
    pub fn toggle_play(&mut self) -> bool {
        match (self.playing, self.mode) {
            (true, _) => {
                self.playing = false;
                self.mode = Mode::Paused;
                self.log.push("Animation paused", LogLevel::Warning);
                tracing::info!(cursor = ?self.cursor, "playback paused");
            }
            (false, Mode::Paused) => {
                self.start();
                self.log.push("Animation resumed", LogLevel::Info);
                tracing::info!(cursor = ?self.cursor, "playback resumed");
            }
            (false, Mode::Continuous) => {
                self.start();
                self.log.push("Animation started", LogLevel::Info);
                tracing::info!(steps = self.trace.len(), "playback started");
            }
            (false, Mode::StepByStep) => {
                self.log
                    .push("Step mode: use Next to advance", LogLevel::Info);
            }
        }
        self.playing
    }

    fn start(&mut self) {
        self.mode = Mode::Continuous;
        self.playing = true;
        // first tick fires immediately
        self.last_tick = None;
    }

    /// Switch between continuous and step-by-step. Either switch stops
    /// playback; `Paused` behaves like pressing pause.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.playing = false;
        self.mode = mode;
        let message = match mode {
            Mode::Continuous => "Mode: Continuous",
            Mode::StepByStep => "Mode: Step-by-step",
            Mode::Paused => "Animation paused",
        };
        self.log.push(message, LogLevel::Info);
        tracing::info!(%mode, "playback mode changed");
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.config.speed = clamp_speed(multiplier);
        self.log.push(
            format!("Playback speed set to {}x", self.config.speed),
            LogLevel::Info,
        );
        tracing::info!(speed = self.config.speed, "playback speed changed");
    }

    /// Advance continuous playback if its interval has elapsed.
    ///
    /// Returns the index of the step applied by this tick. Running past the
    /// last step stops playback.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        if !self.playing {
            return None;
        }
        if let Some(last) = self.last_tick {
            if now.saturating_duration_since(last) < self.interval() {
                return None;
            }
        }

        match self.step_forward() {
            Ok(index) => {
                self.last_tick = Some(now);
                Some(index)
            }
            Err(_) => {
                self.playing = false;
                self.mode = Mode::Continuous;
                self.last_tick = None;
                self.log
                    .push("Algorithm execution completed!", LogLevel::Success);
                tracing::info!(steps = self.trace.len(), "playback finished");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_last_five() {
        let mut log = ActivityLog::default();
        for i in 0..8 {
            log.push(format!("entry {}", i), LogLevel::Info);
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        let first = log.entries().next().map(|e| e.message.clone());
        assert_eq!(first.as_deref(), Some("entry 3"));
        assert_eq!(log.last().map(|e| e.message.as_str()), Some("entry 7"));
    }

    #[test]
    fn test_interval_scaling() {
        let mut config = PlaybackConfig::default();
        assert_eq!(config.interval(), Duration::from_millis(1000));

        config.speed = 2.0;
        assert_eq!(config.interval(), Duration::from_millis(500));

        config.speed = 8.0;
        config.base_interval = Duration::from_millis(200);
        assert_eq!(config.interval(), Duration::from_millis(50));

        config.speed = 100.0;
        assert_eq!(config.interval(), Duration::from_millis(50));
    }
}
