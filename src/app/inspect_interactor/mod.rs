// Inspect interactor - Duration probing and tool resolution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::adapters::ExecutableLocator;
use crate::domain::model::*;
use crate::domain::rules::OutputNaming;
use crate::error::ClipLyResult;
use crate::ports::*;

/// What probing a single file reports
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub input: PathBuf,
    pub duration_seconds: f64,
    pub duration: String,
    pub output: PathBuf,
}

/// Where one external tool resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolLocation {
    pub name: String,
    pub path: Option<PathBuf>,
}

/// Interactor for inspection use cases
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    locator: Arc<ExecutableLocator>,
    tools: Vec<String>,
}

impl InspectInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        locator: Arc<ExecutableLocator>,
        tools: Vec<String>,
    ) -> Self {
        Self {
            probe_port,
            locator,
            tools,
        }
    }

    /// Probe a file's duration and report where its output would go
    pub async fn probe(&self, input: &Path) -> ClipLyResult<ProbeReport> {
        info!("Probing {}", input.display());
        let result = self.probe_port.probe_duration(input).await?;

        Ok(ProbeReport {
            input: input.to_path_buf(),
            duration_seconds: result.duration_seconds,
            duration: TimeSpec::from_seconds(result.duration_seconds).format_hms(),
            output: OutputNaming::output_path(input),
        })
    }

    /// Resolve every configured tool
    pub fn locate_tools(&self) -> Vec<ToolLocation> {
        self.tools
            .iter()
            .map(|name| ToolLocation {
                name: name.clone(),
                path: self.locator.locate(name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProbe(f64);

    #[async_trait]
    impl ProbePort for FixedProbe {
        async fn probe_duration(&self, _file_path: &Path) -> ClipLyResult<ProbeResult> {
            Ok(ProbeResult {
                duration_seconds: self.0,
            })
        }
    }

    #[tokio::test]
    async fn test_probe_report() {
        let interactor = InspectInteractor::new(
            Arc::new(FixedProbe(3725.5)),
            Arc::new(ExecutableLocator::default()),
            vec![],
        );

        let report = interactor.probe(Path::new("/videos/talk.mov")).await.unwrap();
        assert_eq!(report.duration_seconds, 3725.5);
        assert_eq!(report.output, PathBuf::from("/videos/talk_processed.mp4"));
        assert_eq!(report.duration, "1:02:05.500");
    }

    #[test]
    fn test_unresolved_tools_are_listed() {
        let interactor = InspectInteractor::new(
            Arc::new(FixedProbe(1.0)),
            Arc::new(ExecutableLocator::default()),
            vec!["ffmpeg".to_string()],
        );

        assert_eq!(
            interactor.locate_tools(),
            vec![ToolLocation {
                name: "ffmpeg".to_string(),
                path: None
            }]
        );
    }
}
