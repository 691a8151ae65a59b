//! Batch processing engine: command building, progress parsing and the worker

pub mod command;
pub mod progress;
pub mod runner;

pub use command::EncodeCommandBuilder;
pub use progress::{ProgressParser, ProgressTracker};
pub use runner::{BatchHandle, BatchRunner, CancelToken};
