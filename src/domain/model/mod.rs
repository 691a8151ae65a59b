// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ClipLyError, ClipLyResult};


/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> ClipLyResult<Self> {
        let trimmed = time_str.trim();
        let invalid = || ClipLyError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(invalid());
            }
            return Ok(Self::from_seconds(seconds));
        }

        // Try parsing as HH:MM:SS.ms or MM:SS.ms
        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [m, s] => (0, m.parse::<u32>().map_err(|_| invalid())?, *s),
            [h, m, s] => {
                let hours = h.parse::<u32>().map_err(|_| invalid())?;
                let minutes = m.parse::<u32>().map_err(|_| invalid())?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                (hours, minutes, *s)
            }
            _ => return Err(invalid()),
        };

        let seconds = seconds_part.parse::<f64>().map_err(|_| invalid())?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(invalid());
        }

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
        ))
    }

    /// Format as M:SS, the way trim positions are shown to users
    pub fn format_short(&self) -> String {
        let total = self.seconds as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let hours = (self.seconds / 3600.0) as u32;
        let minutes = ((self.seconds % 3600.0) / 60.0) as u32;
        let seconds = (self.seconds % 60.0) as u32;
        let milliseconds = ((self.seconds % 1.0) * 1000.0) as u32;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Portion of a source file to keep, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimRange {
    start: f64,
    end: f64,
}

impl TrimRange {
    /// Create a trim range, rejecting `start >= end` and negative or non-finite bounds
    pub fn new(start: f64, end: f64) -> Result<Self, String> {
        if !start.is_finite() || !end.is_finite() {
            return Err("trim bounds must be finite".to_string());
        }
        if start < 0.0 {
            return Err(format!("start ({}) cannot be negative", start));
        }
        if start >= end {
            return Err(format!(
                "start ({}) must be less than end ({})",
                start, end
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse `START..END` where each bound is any [`TimeSpec`] format
    pub fn parse(spec: &str) -> ClipLyResult<Self> {
        let (start, end) = spec
            .split_once("..")
            .ok_or_else(|| ClipLyError::InvalidTimeFormat {
                time: spec.to_string(),
            })?;
        let start = TimeSpec::parse(start)?;
        let end = TimeSpec::parse(end)?;
        Self::new(start.seconds, end.seconds).map_err(|message| ClipLyError::InvalidTrimRange {
            path: PathBuf::new(),
            message,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the retained portion
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check the range against a probed media duration
    pub fn validate_against(&self, duration_seconds: f64) -> Result<(), String> {
        if self.end > duration_seconds {
            return Err(format!(
                "end ({}) exceeds media duration ({})",
                TimeSpec::from_seconds(self.end),
                TimeSpec::from_seconds(duration_seconds)
            ));
        }
        Ok(())
    }
}

/// One file to process
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub input: PathBuf,
    pub compress: bool,
    pub trim: Option<TrimRange>,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            input: input.into(),
            compress,
            trim: None,
        }
    }

    pub fn with_trim(mut self, trim: TrimRange) -> Self {
        self.trim = Some(trim);
        self
    }
}

/// Ordered set of jobs sharing one compress flag
///
/// A path is only ever present once; later additions of the same path are ignored.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    jobs: Vec<Job>,
    compress: bool,
}

impl Batch {
    pub fn new(compress: bool) -> Self {
        Self {
            jobs: Vec::new(),
            compress,
        }
    }

    /// Append a file, returning false if the path is already queued
    pub fn add(&mut self, input: impl Into<PathBuf>) -> bool {
        let input = input.into();
        if self.contains(&input) {
            return false;
        }
        self.jobs.push(Job::new(input, self.compress));
        true
    }

    /// Attach a trim range to a queued file, returning false if it isn't queued
    pub fn set_trim(&mut self, input: &Path, trim: TrimRange) -> bool {
        match self.jobs.iter_mut().find(|job| job.input == input) {
            Some(job) => {
                job.trim = Some(trim);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, input: &Path) -> bool {
        self.jobs.iter().any(|job| job.input == input)
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }
}

/// Result of probing a media file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub duration_seconds: f64,
}

/// Completion percentage of the file currently being processed
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ProgressEvent {
    pub fraction: f64,
}

impl ProgressEvent {
    pub const START: Self = Self { fraction: 0.0 };
    pub const DONE: Self = Self { fraction: 100.0 };

    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 100.0),
        }
    }
}

/// Encoding strategy for a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    /// Hardware decode and NVENC encode
    Gpu,
    /// Software x264 encode
    Cpu,
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeMode::Gpu => write!(f, "GPU"),
            EncodeMode::Cpu => write!(f, "CPU"),
        }
    }
}

/// Fully built encoder invocation, minus the program path
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeInvocation {
    pub mode: EncodeMode,
    pub args: Vec<String>,
    pub output: PathBuf,
}

/// Notification sent from the batch worker to its observer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    FileStarted {
        index: usize,
        total: usize,
        input: PathBuf,
    },
    Progress(ProgressEvent),
    FallingBack {
        input: PathBuf,
        reason: String,
    },
    Completed,
    Failed {
        message: String,
    },
    Cancelled,
}

impl BatchEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchEvent::Completed | BatchEvent::Failed { .. } | BatchEvent::Cancelled
        )
    }
}

/// Lifecycle of one batch run
#[derive(Debug, Clone, PartialEq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Failed(String),
    Cancelled,
}

impl BatchState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BatchState::Completed | BatchState::Failed(_) | BatchState::Cancelled
        )
    }
}
