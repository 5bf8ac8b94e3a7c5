//! # Introduction
//!
//! stepviz turns runs of classic algorithms into deterministic step traces.
//! Each generator takes an input, runs the algorithm once, and returns a
//! [`trace::Trace`]: an immutable list of steps, each holding a full copy of
//! the algorithm state plus narrative text. A [`playback::Runner`] then
//! walks the trace forward, backward or on a timer, and the terminal player
//! in [`ui`] draws it with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! RunConfig → catalog::generate → Trace → Runner → TUI / JSON / text
//! ```
//!
//! 1. [`catalog`]: algorithm identifiers, defaults, range checks and
//!    dispatch to a generator.
//! 2. Generators, one module per family:
//!    - [`sorting`]: bubble, selection, insertion, merge, quick
//!    - [`searching`]: linear, binary
//!    - [`hashing`]: chaining and linear probing over [`hashfn`], plus
//!      lookups in a finished table
//!    - [`recursion`]: factorial, memoised fibonacci, Tower of Hanoi
//! 3. [`trace`]: the step envelope and the read-only trace container.
//! 4. [`playback`]: cursor, modes, speed, subscribers and the activity log.
//! 5. [`ui`]: ratatui-based player; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use stepviz::sorting::bubble_sort_steps;
//!
//! let trace = bubble_sort_steps(&[5, 3, 8, 1]);
//! let last = trace.last().unwrap();
//! assert_eq!(last.tag(), "complete");
//! assert_eq!(last.state.array, vec![1, 3, 5, 8]);
//! ```

pub mod catalog;
pub mod error;
pub mod hashfn;
pub mod hashing;
pub mod playback;
pub mod recursion;
pub mod searching;
pub mod sorting;
pub mod trace;
pub mod ui;

pub use error::{Result, VizError};
