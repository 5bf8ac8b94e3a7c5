//! Terminal player built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: player state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane
//!   (visualization, narrative, activity log, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with a [`Runner`] and call
//! [`App::run`] to start the event loop. The player only reads the trace; all
//! navigation goes through the runner.
//!
//! [`Runner`]: crate::playback::Runner
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
pub use panes::StepView;
