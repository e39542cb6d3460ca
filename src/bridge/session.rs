use crate::bridge::error::BridgeError;
use crate::bridge::runner::LogStream;

/// Scoped handle to a running log tail.
///
/// The underlying stream is terminated exactly once: by [`LogSession::close`]
/// or, on any other exit path, when the session is dropped.
pub struct LogSession {
    stream: Box<dyn LogStream>,
    terminated: bool,
}

impl LogSession {
    pub fn new(stream: impl LogStream + 'static) -> Self {
        Self {
            stream: Box::new(stream),
            terminated: false,
        }
    }

    /// Next raw line from the device log, `None` after the stream ends
    pub async fn next_line(&mut self) -> Result<Option<String>, BridgeError> {
        self.stream.next_line().await
    }

    /// Terminate the log tail now
    pub fn close(mut self) {
        self.terminate_once();
    }

    fn terminate_once(&mut self) {
        if !self.terminated {
            self.terminated = true;
            tracing::debug!("Terminating log session");
            self.stream.terminate();
        }
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.terminate_once();
    }
}

impl std::fmt::Debug for LogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSession")
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
