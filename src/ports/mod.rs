// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::*;
use crate::error::ClipLyResult;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Determine the total duration of a media file
    ///
    /// Fails with `ToolNotFound` when the probing tool cannot be located and with
    /// `ProbeFailure` on a non-zero exit or an unusable duration. Never falls back
    /// to a guessed value.
    async fn probe_duration(&self, file_path: &Path) -> ClipLyResult<ProbeResult>;
}

/// How an encoder process ended
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// Exit code, `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Last lines the process wrote to stderr
    pub stderr_tail: String,
}

impl ProcessOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr_tail: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr_tail: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr_tail: stderr_tail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// One-line description of a failed run
    pub fn describe(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        if self.stderr_tail.is_empty() {
            status
        } else {
            format!("{}: {}", status, self.stderr_tail)
        }
    }
}

/// Port for running the encoding tool
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run one invocation to completion, handing every stdout line to `on_line`
    ///
    /// An `Err` means the process could not be started at all (including
    /// `ToolNotFound`); a process that ran and failed is reported through
    /// [`ProcessOutcome`].
    async fn execute(
        &self,
        invocation: &EncodeInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> ClipLyResult<ProcessOutcome>;
}
