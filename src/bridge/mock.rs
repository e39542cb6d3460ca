//! Mock device bridge for deterministic testing
//!
//! Implements `DeviceBridge` without spawning `adb`. Each call to
//! `tail_logs` replays the next scripted log, and every interaction is
//! captured so tests can assert on launch/stop ordering and on how many
//! log sessions were terminated.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use crash_repro::bridge::mock::{MockBridge, MockLogScript};
//!
//! let bridge = MockBridge::new()
//!     .with_script(MockLogScript::new(["booting...", "ready"]))
//!     .with_script(
//!         MockLogScript::new(["No panel creator found for key=42"])
//!             .with_delay(Duration::from_millis(100)),
//!     );
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::bridge::error::BridgeError;
use crate::bridge::runner::{DeviceBridge, LogStream, OutputMode};
use crate::bridge::session::LogSession;

/// A bridge interaction captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Launch { package: String, output: OutputMode },
    TailLogs,
    ForceStop { package: String, output: OutputMode },
}

/// Log lines produced by one log session
#[derive(Debug, Clone, Default)]
pub struct MockLogScript {
    lines: Vec<String>,
    line_delay: Duration,
    /// Close the stream after the last line instead of going quiet
    end_with_eof: bool,
    /// Fail the read after the last line, like a dropped adb connection
    end_with_error: bool,
}

impl MockLogScript {
    /// Lines are emitted with a trailing `\n`, as logcat would
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|l| {
                    let mut line = l.into();
                    line.push('\n');
                    line
                })
                .collect(),
            ..Self::default()
        }
    }

    /// A device that prints nothing at all
    pub fn silent() -> Self {
        Self::default()
    }

    /// Wait this long before each line
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.line_delay = delay;
        self
    }

    pub fn ending_with_eof(mut self) -> Self {
        self.end_with_eof = true;
        self
    }

    pub fn ending_with_error(mut self) -> Self {
        self.end_with_error = true;
        self
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<BridgeCall>,
    scripts: VecDeque<MockLogScript>,
    terminations: usize,
    lines_read: usize,
    launches: usize,
    fail_launch_on: Vec<usize>,
}

/// Mock device bridge for testing
#[derive(Clone, Default)]
pub struct MockBridge {
    state: Arc<Mutex<MockState>>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the log for the next session. Sessions past the end of the
    /// queue are silent.
    pub fn with_script(self, script: MockLogScript) -> Self {
        self.state.lock().scripts.push_back(script);
        self
    }

    /// Make the n-th launch (1-based) fail
    pub fn failing_launch_on(self, attempt: usize) -> Self {
        self.state.lock().fail_launch_on.push(attempt);
        self
    }

    /// Get captured calls for assertions
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state.lock().calls.clone()
    }

    pub fn launch_count(&self) -> usize {
        self.state.lock().launches
    }

    /// How many log sessions have been terminated
    pub fn terminations(&self) -> usize {
        self.state.lock().terminations
    }

    /// Total lines handed out across all sessions
    pub fn lines_read(&self) -> usize {
        self.state.lock().lines_read
    }
}

#[async_trait]
impl DeviceBridge for MockBridge {
    async fn launch(&self, package: &str, output: OutputMode) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        state.launches += 1;
        state.calls.push(BridgeCall::Launch {
            package: package.to_string(),
            output,
        });

        if state.fail_launch_on.contains(&state.launches) {
            return Err(BridgeError::CommandFailed(format!(
                "mock launch {} failed",
                state.launches
            )));
        }
        Ok(())
    }

    async fn tail_logs(&self) -> Result<LogSession, BridgeError> {
        let script = {
            let mut state = self.state.lock();
            state.calls.push(BridgeCall::TailLogs);
            state.scripts.pop_front().unwrap_or_default()
        };

        Ok(LogSession::new(MockLogStream {
            lines: script.lines.into(),
            line_delay: script.line_delay,
            end_with_eof: script.end_with_eof,
            end_with_error: script.end_with_error,
            state: self.state.clone(),
        }))
    }

    async fn force_stop(&self, package: &str, output: OutputMode) -> Result<(), BridgeError> {
        self.state.lock().calls.push(BridgeCall::ForceStop {
            package: package.to_string(),
            output,
        });
        Ok(())
    }
}

struct MockLogStream {
    lines: VecDeque<String>,
    line_delay: Duration,
    end_with_eof: bool,
    end_with_error: bool,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl LogStream for MockLogStream {
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError> {
        if self.lines.is_empty() {
            if self.end_with_error {
                return Err(BridgeError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "mock log stream broke",
                )));
            }
            if self.end_with_eof {
                return Ok(None);
            }
            // Quiet device: block like a logcat pipe with nothing to say
            std::future::pending::<()>().await;
        }

        if self.line_delay > Duration::ZERO {
            tokio::time::sleep(self.line_delay).await;
        }

        let line = self.lines.pop_front();
        if line.is_some() {
            self.state.lock().lines_read += 1;
        }
        Ok(line)
    }

    fn terminate(&mut self) {
        self.state.lock().terminations += 1;
    }
}
