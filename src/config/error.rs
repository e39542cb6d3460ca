use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Package name must not be empty")]
    EmptyPackage,
    #[error("Invalid package name: {0}")]
    InvalidPackage(String),
    #[error("Expected crash message must not be empty")]
    EmptyMessage,
    #[error("Scan duration must be greater than zero")]
    ZeroDuration,
    #[error("Invalid scan duration {0}: expected a positive number of seconds")]
    InvalidDuration(f64),
    #[error("At least one run is required")]
    ZeroRuns,
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
