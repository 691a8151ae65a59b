// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;
pub mod process_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectInteractor, ProbeReport, ToolLocation};
pub use process_interactor::{ProcessInteractor, ProcessRequest, ProcessResponse};
