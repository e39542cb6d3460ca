use thiserror::Error;

use crate::bridge::BridgeError;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ReproError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl ReproError {
    /// Whether recovery mode may skip past this error to the next attempt
    pub fn is_attempt_local(&self) -> bool {
        matches!(self, ReproError::Bridge(_))
    }
}
