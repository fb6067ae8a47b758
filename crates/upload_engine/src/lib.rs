//! Upload engine: single-writer store and timer-driven simulation.
mod engine;
mod error;
mod preview;
mod settings;
mod simulate;
mod types;

pub use engine::UploadHandle;
pub use error::EngineError;
pub use preview::PreviewRegistry;
pub use settings::{SettingsError, SimulationSettings};
pub use simulate::{
    run_processing, run_upload, ChannelProgressSink, ProgressSink, FAILURE_MESSAGE,
};
pub use types::{EngineEvent, IncomingFile, StatusChange};
