// Process interactor - Orchestrates the batch processing use case

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::domain::model::*;
use crate::domain::rules::SubmissionRules;
use crate::engine::BatchRunner;
use crate::error::{ClipLyError, ClipLyResult};
use crate::output::BatchObserver;
use crate::utils::discovery::expand_selection;

/// User selection for one batch run
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    /// Files and directories, in selection order
    pub paths: Vec<PathBuf>,
    pub compress: bool,
    /// Trim ranges keyed by the path they apply to
    pub trims: Vec<(PathBuf, TrimRange)>,
    /// Walk directories recursively instead of one level deep
    pub recursive: bool,
}

/// How a batch run ended
#[derive(Debug, Clone)]
pub struct ProcessResponse {
    pub state: BatchState,
    pub total: usize,
    pub elapsed: Duration,
}

/// Interactor for batch processing
pub struct ProcessInteractor {
    runner: BatchRunner,
}

impl ProcessInteractor {
    pub fn new(runner: BatchRunner) -> Self {
        Self { runner }
    }

    /// Turn a request into a batch with trims attached
    ///
    /// Fails if nothing supported was selected or a trim names a file outside the
    /// batch.
    pub fn assemble(&self, request: &ProcessRequest) -> ClipLyResult<Batch> {
        let selected = expand_selection(&request.paths, request.recursive);
        let mut batch = SubmissionRules::assemble(selected, request.compress);

        if batch.is_empty() {
            return Err(ClipLyError::config(
                "No supported video files selected (accepted: .mp4, .avi, .mov)",
            ));
        }

        for (path, trim) in &request.trims {
            if !batch.set_trim(path, *trim) {
                return Err(ClipLyError::InvalidTrimRange {
                    path: path.clone(),
                    message: "file is not part of the batch".to_string(),
                });
            }
        }

        Ok(batch)
    }

    /// Run the batch to its end, feeding every event to `observer`
    ///
    /// Ctrl+C cancels the batch. The interrupted file's partial output is removed
    /// and no further files are started.
    pub async fn execute(
        &self,
        request: &ProcessRequest,
        observer: &mut dyn BatchObserver,
    ) -> ClipLyResult<ProcessResponse> {
        let batch = self.assemble(request)?;
        let total = batch.len();
        let started = Instant::now();
        info!(
            "Starting batch of {} file(s), compress={}",
            total,
            batch.compress()
        );

        let handle = self.runner.spawn(batch);
        let token = handle.cancel_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; cancelling batch");
                token.cancel();
            }
        });

        let state = handle.run_to_end(|event| observer.on_event(event)).await;
        interrupt.abort();

        Ok(ProcessResponse {
            state,
            total,
            elapsed: started.elapsed(),
        })
    }
}
