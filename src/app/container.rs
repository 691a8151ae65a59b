use std::sync::Arc;

use crate::adapters::{AppConfig, ExecutableLocator, FFmpegAdapter, FFprobeAdapter};
use crate::app::{inspect_interactor::InspectInteractor, process_interactor::ProcessInteractor};
use crate::engine::BatchRunner;
use crate::ports::{ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn process_interactor(&self) -> Arc<ProcessInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

/// Wires the ffmpeg/ffprobe adapters into the interactors
pub struct DefaultAppContainer {
    process_interactor: Arc<ProcessInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Self {
        let locator = Arc::new(ExecutableLocator::from_env(config.bundled_dir.clone()));
        Self::with_locator(config, locator)
    }

    pub fn with_locator(config: &AppConfig, locator: Arc<ExecutableLocator>) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(Arc::clone(&locator), config.ffprobe.clone()));
        let execute_port = Arc::new(FFmpegAdapter::new(Arc::clone(&locator), config.ffmpeg.clone()));

        let runner = BatchRunner::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            execute_port as Arc<dyn ExecutePort>,
        );
        let process_interactor = Arc::new(ProcessInteractor::new(runner));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            locator,
            vec![config.ffmpeg.clone(), config.ffprobe.clone()],
        ));

        Self {
            process_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn process_interactor(&self) -> Arc<ProcessInteractor> {
        Arc::clone(&self.process_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
