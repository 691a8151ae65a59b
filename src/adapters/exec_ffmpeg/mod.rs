//! FFmpeg execution adapter
//!
//! Spawns the encoder, streams its `-progress pipe:1` output line by line and keeps
//! the tail of stderr for failure reports.

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace};

use crate::adapters::locator::ExecutableLocator;
use crate::domain::model::*;
use crate::error::{ClipLyError, ClipLyResult};
use crate::ports::*;

/// Number of stderr lines kept for error messages
const STDERR_TAIL_LINES: usize = 8;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    locator: Arc<ExecutableLocator>,
    tool_name: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(locator: Arc<ExecutableLocator>, tool_name: impl Into<String>) -> Self {
        Self {
            locator,
            tool_name: tool_name.into(),
        }
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn execute(
        &self,
        invocation: &EncodeInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> ClipLyResult<ProcessOutcome> {
        let program = self
            .locator
            .locate(&self.tool_name)
            .ok_or_else(|| ClipLyError::ToolNotFound {
                tool: self.tool_name.clone(),
            })?;

        debug!(
            mode = %invocation.mode,
            "Running {} {}",
            program.display(),
            invocation.args.join(" ")
        );

        let mut child = Command::new(&program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
                let mut reader = BufReader::new(stderr);
                let mut buf = Vec::new();
                // Drain to EOF so ffmpeg never blocks on a full pipe
                while let Ok(Some(line)) = next_line_lossy(&mut reader, &mut buf).await {
                    trace!(target: "ffmpeg_log", "{}", line);
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                tail.into_iter().collect::<Vec<_>>().join("\n")
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            while let Some(line) = next_line_lossy(&mut reader, &mut buf).await? {
                on_line(&line);
            }
        }

        let status = child.wait().await?;
        let stderr_tail = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        debug!(mode = %invocation.mode, "Encoder exited with {}", status);

        Ok(ProcessOutcome {
            exit_code: status.code(),
            stderr_tail: stderr_tail.trim().to_string(),
        })
    }
}

/// Next line with invalid UTF-8 replaced, or `None` at EOF
async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf.as_slice());
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
