//! Sequential batch worker
//!
//! Probes and encodes each job in order on a single background task. Every job is
//! tried with an ordered list of strategies (GPU first, then CPU); the batch stops at
//! the first job that exhausts them. Observers receive [`BatchEvent`]s over a channel.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::model::*;
use crate::engine::command::EncodeCommandBuilder;
use crate::engine::progress::ProgressTracker;
use crate::error::{ClipLyError, ClipLyResult};
use crate::ports::*;

/// Strategy order used unless overridden
pub const DEFAULT_STRATEGIES: [EncodeMode; 2] = [EncodeMode::Gpu, EncodeMode::Cpu];

/// Cooperative cancellation flag shared with the worker
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Observer side of a running batch
pub struct BatchHandle {
    events: UnboundedReceiver<BatchEvent>,
    cancel: CancelToken,
    worker: JoinHandle<BatchState>,
}

impl BatchHandle {
    /// Next event, or `None` once the worker is done and the channel drained
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Token that stops the batch, interrupting the current encode
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Hand every event to `observer` and return the final state
    pub async fn run_to_end<F>(mut self, mut observer: F) -> BatchState
    where
        F: FnMut(&BatchEvent),
    {
        while let Some(event) = self.events.recv().await {
            observer(&event);
        }
        match self.worker.await {
            Ok(state) => state,
            Err(e) => BatchState::Failed(format!("batch worker stopped unexpectedly: {}", e)),
        }
    }
}

/// Batch job runner
#[derive(Clone)]
pub struct BatchRunner {
    probe: Arc<dyn ProbePort>,
    executor: Arc<dyn ExecutePort>,
    strategies: Vec<EncodeMode>,
}

impl BatchRunner {
    pub fn new(probe: Arc<dyn ProbePort>, executor: Arc<dyn ExecutePort>) -> Self {
        Self {
            probe,
            executor,
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Replace the ordered list of encode strategies
    pub fn with_strategies(mut self, strategies: Vec<EncodeMode>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Move the batch onto a background task
    pub fn spawn(&self, batch: Batch) -> BatchHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancelToken::new();
        let runner = self.clone();
        let token = cancel.clone();

        let worker = tokio::spawn(async move { runner.run(batch, &tx, &token).await });

        BatchHandle {
            events: rx,
            cancel,
            worker,
        }
    }

    /// Process the whole batch on the current task
    pub async fn run(
        &self,
        batch: Batch,
        events: &UnboundedSender<BatchEvent>,
        cancel: &CancelToken,
    ) -> BatchState {
        let jobs = batch.into_jobs();
        let total = jobs.len();
        let mut state = BatchState::Idle;
        transition(&mut state, BatchState::Running);
        info!("Processing {} file(s)", total);

        for (index, job) in jobs.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Batch cancelled before {}", job.input.display());
                emit(events, BatchEvent::Cancelled);
                transition(&mut state, BatchState::Cancelled);
                return state;
            }

            emit(
                events,
                BatchEvent::FileStarted {
                    index,
                    total,
                    input: job.input.clone(),
                },
            );

            match self.process_job(&job, events, cancel).await {
                Ok(JobOutcome::Cancelled) => {
                    emit(events, BatchEvent::Cancelled);
                    transition(&mut state, BatchState::Cancelled);
                    return state;
                }
                Ok(JobOutcome::Encoded) => {
                    emit(events, BatchEvent::Progress(ProgressEvent::DONE));
                    if index + 1 < total {
                        emit(events, BatchEvent::Progress(ProgressEvent::START));
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("{}", message);
                    emit(
                        events,
                        BatchEvent::Failed {
                            message: message.clone(),
                        },
                    );
                    transition(&mut state, BatchState::Failed(message));
                    return state;
                }
            }
        }

        emit(events, BatchEvent::Completed);
        transition(&mut state, BatchState::Completed);
        state
    }

    async fn process_job(
        &self,
        job: &Job,
        events: &UnboundedSender<BatchEvent>,
        cancel: &CancelToken,
    ) -> ClipLyResult<JobOutcome> {
        info!("Processing {}", job.input.display());

        let probe = self.probe.probe_duration(&job.input).await?;
        if let Some(trim) = &job.trim {
            trim.validate_against(probe.duration_seconds)
                .map_err(|message| ClipLyError::InvalidTrimRange {
                    path: job.input.clone(),
                    message,
                })?;
        }

        let mut tracker = ProgressTracker::new(probe.duration_seconds);
        let mut failures = Vec::new();

        for (attempt, &mode) in self.strategies.iter().enumerate() {
            let invocation = EncodeCommandBuilder::build(job, mode);
            debug!("{} attempt writes {}", mode, invocation.output.display());

            let result = self
                .executor
                .execute(&invocation, &mut |line: &str| {
                    if let Some(progress) = tracker.observe(line) {
                        emit(events, BatchEvent::Progress(progress));
                    }
                })
                .await;

            let reason = match result {
                Ok(outcome) if outcome.is_success() => {
                    info!("{} encode finished: {}", mode, invocation.output.display());
                    return Ok(JobOutcome::Encoded);
                }
                Ok(outcome) => outcome.describe(),
                Err(e @ ClipLyError::ToolNotFound { .. }) => return Err(e),
                Err(e) => e.to_string(),
            };

            // An interrupt also kills the encoder; that is not a reason to fall back
            if cancel.is_cancelled() {
                info!("{} encode of {} interrupted", mode, job.input.display());
                discard_partial_output(&invocation.output).await;
                return Ok(JobOutcome::Cancelled);
            }

            failures.push(format!("{} encode failed ({})", mode, reason));

            if let Some(next) = self.strategies.get(attempt + 1) {
                warn!(
                    "{} encoding failed for {}. Falling back to {} encoding.",
                    mode,
                    job.input.display(),
                    next
                );
                emit(
                    events,
                    BatchEvent::FallingBack {
                        input: job.input.clone(),
                        reason,
                    },
                );
            }
        }

        if failures.is_empty() {
            failures.push("no encode strategies configured".to_string());
        }

        Err(ClipLyError::EncodeFailure {
            path: job.input.clone(),
            message: failures.join("; "),
        })
    }
}

/// How a single job ended when it did not fail
enum JobOutcome {
    Encoded,
    Cancelled,
}

async fn discard_partial_output(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove partial output {}: {}", output.display(), e),
    }
}

fn emit(events: &UnboundedSender<BatchEvent>, event: BatchEvent) {
    if events.send(event).is_err() {
        debug!("Batch observer went away; event dropped");
    }
}

fn transition(state: &mut BatchState, next: BatchState) {
    debug!("Batch state {:?} -> {:?}", state, next);
    *state = next;
}
