//! Path utilities for crash-repro data directories

use std::path::PathBuf;

/// Get the base data directory (~/.crash-repro)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".crash-repro"))
        .unwrap_or_else(|| PathBuf::from(".crash-repro"))
}

/// Get the config file path (~/.crash-repro/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Get the logs directory (~/.crash-repro/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.crash-repro/logs/crash-repro.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("crash-repro.log")
}
