use thiserror::Error;

use crate::SettingsError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("upload service has stopped")]
    ServiceStopped,
    #[error("invalid simulation settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}
