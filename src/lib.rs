//! ClipLy Batch Video Processor Library
//!
//! Re-encodes batches of video files through an external ffmpeg, trying hardware
//! encoding first and falling back to software encoding per file.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{Batch, BatchEvent, BatchState, Job, ProgressEvent, TrimRange};
pub use engine::{BatchHandle, BatchRunner, CancelToken};
pub use error::{ClipLyError, ClipLyResult};
