//! FFprobe adapter for media duration probing
//!
//! Runs `ffprobe -v error -show_entries format=duration -of json <file>` and reads
//! `format.duration` from the JSON it prints.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::adapters::locator::ExecutableLocator;
use crate::domain::model::*;
use crate::error::{ClipLyError, ClipLyResult};
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<serde_json::Value>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    locator: Arc<ExecutableLocator>,
    tool_name: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(locator: Arc<ExecutableLocator>, tool_name: impl Into<String>) -> Self {
        Self {
            locator,
            tool_name: tool_name.into(),
        }
    }

    /// Extract a positive duration from ffprobe's JSON output
    pub fn parse_duration(file_path: &Path, json: &str) -> ClipLyResult<f64> {
        let output: FfprobeOutput = serde_json::from_str(json)
            .map_err(|e| ClipLyError::probe(file_path, format!("malformed ffprobe output: {}", e)))?;

        let value = output
            .format
            .and_then(|format| format.duration)
            .ok_or_else(|| ClipLyError::probe(file_path, "ffprobe reported no duration"))?;

        let duration = match &value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ClipLyError::probe(file_path, format!("unreadable duration: {}", value)))?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(ClipLyError::probe(
                file_path,
                format!("duration must be positive, got {}", duration),
            ));
        }

        Ok(duration)
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> ClipLyResult<ProbeResult> {
        let program = self
            .locator
            .locate(&self.tool_name)
            .ok_or_else(|| ClipLyError::ToolNotFound {
                tool: self.tool_name.clone(),
            })?;

        debug!("Probing {} with {}", file_path.display(), program.display());

        let output = Command::new(&program)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ClipLyError::probe(file_path, format!("failed to run {}: {}", program.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipLyError::probe(
                file_path,
                format!("{} failed ({}): {}", self.tool_name, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration_seconds = Self::parse_duration(file_path, &stdout)?;
        debug!("{} lasts {:.3}s", file_path.display(), duration_seconds);

        Ok(ProbeResult { duration_seconds })
    }
}
