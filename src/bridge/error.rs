use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("adb binary not found: {0}")]
    BinaryNotFound(String),
    #[error("Failed to spawn `adb {0}`")]
    ProcessSpawnFailed(String),
    #[error("Failed to capture logcat stdout")]
    StdoutCaptureFailed,
    #[error("Device bridge call failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
