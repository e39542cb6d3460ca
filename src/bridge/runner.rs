use async_trait::async_trait;

use crate::bridge::error::BridgeError;
use crate::bridge::session::LogSession;

/// Where a bridge command's stdout/stderr go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pass through to our own stdout/stderr
    Inherit,
    /// Send to the null device
    Discard,
}

impl OutputMode {
    pub fn from_silent(silent: bool) -> Self {
        if silent {
            OutputMode::Discard
        } else {
            OutputMode::Inherit
        }
    }
}

/// A live, line-oriented view of the device log
#[async_trait]
pub trait LogStream: Send {
    /// Wait for the next raw line, terminator included.
    ///
    /// Returns `Ok(None)` once the underlying process has closed its output.
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError>;

    /// Signal the producer to stop. Must not wait for it to exit.
    fn terminate(&mut self);
}

/// Capabilities the reproducer needs from a device bridge
#[async_trait]
pub trait DeviceBridge: Send + Sync {
    /// Start the app's default launcher activity and wait for the command to finish
    async fn launch(&self, package: &str, output: OutputMode) -> Result<(), BridgeError>;

    /// Start tailing the device log near its current end
    async fn tail_logs(&self) -> Result<LogSession, BridgeError>;

    /// Stop every process belonging to the package
    async fn force_stop(&self, package: &str, output: OutputMode) -> Result<(), BridgeError>;
}
