//! Graphics-context contract for timing diagram backends.
//!
//! The layout engine never talks to a concrete output format. It issues
//! primitive calls (lines, polygons, Bézier curves, text, state changes)
//! against the [`GraphicsContext`] trait, and every backend turns those calls
//! into its own artifact.
//!
//! # Overview
//!
//! - [`GraphicsContext`] - The capability set every backend implements
//! - [`with_saved_state`] - Runs a closure between `push()` and `pop()`, popping on every path
//! - [`StateStack`] - Shared push/pop bookkeeping for backends
//! - [`Recorder`] - A backend that records [`DrawCommand`]s
//! - [`TextMetrics`] - Label column measurement
mod context;
mod recorder;
mod state;
mod text;

pub use context::{BackendError, GraphicsContext, with_saved_state};
pub use recorder::{DrawCommand, Recorder};
pub use state::{GraphicsState, StateStack};
pub use text::{TextMetrics, approximate_label_width};
