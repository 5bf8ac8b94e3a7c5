//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`visual`]: the algorithm state of the current step, drawn per family
//!   through [`StepView`]
//! - [`narrative`]: message, highlight and description of the current step
//! - [`log`]: the runner's recent activity
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each module exports one `render_*` function taking the frame, its area
//! and borrowed state. None of them hold state between frames except the
//! scroll offset the caller passes in.

pub mod log;
pub mod narrative;
pub mod status;
pub mod visual;

pub use log::render_log_pane;
pub use narrative::render_narrative_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use visual::{render_visual_pane, StepView};
