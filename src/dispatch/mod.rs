//! Async orchestration between the UI thread and the backend.
//!
//! The UI sends [`Command`]s and drains [`Outcome`]s each frame; the
//! [`Dispatcher`] runs on the tokio runtime and owns the recorder.

pub mod messages;
pub mod runner;

pub use messages::{Command, Outcome};
pub use runner::{Dispatcher, PROGRESS_INTERVAL};
