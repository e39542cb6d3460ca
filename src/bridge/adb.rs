use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

use crate::bridge::error::BridgeError;
use crate::bridge::runner::{DeviceBridge, LogStream, OutputMode};
use crate::bridge::session::LogSession;

/// Intent category used to start an app without knowing its entry activity
pub const LAUNCHER_CATEGORY: &str = "android.intent.category.LAUNCHER";

/// Device bridge backed by the `adb` command-line tool
#[derive(Debug, Clone)]
pub struct AdbBridge {
    binary_path: PathBuf,
    serial: Option<String>,
    include_backlog: bool,
}

impl AdbBridge {
    pub fn new() -> Self {
        Self {
            binary_path: Self::find_binary().unwrap_or_else(|| PathBuf::from("adb")),
            serial: None,
            include_backlog: false,
        }
    }

    fn find_binary() -> Option<PathBuf> {
        which::which("adb").ok()
    }

    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = path.into();
        self
    }

    /// Address a single device with `adb -s <serial>`
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Replay the existing logcat buffer before following new entries
    pub fn with_backlog(mut self, include_backlog: bool) -> Self {
        self.include_backlog = include_backlog;
        self
    }

    fn device_args(&self) -> Vec<String> {
        match &self.serial {
            Some(serial) => vec!["-s".into(), serial.clone()],
            None => Vec::new(),
        }
    }

    pub(crate) fn launch_args(&self, package: &str) -> Vec<String> {
        let mut args = self.device_args();
        args.extend(
            ["shell", "monkey", "-p", package, "-c", LAUNCHER_CATEGORY, "1"]
                .into_iter()
                .map(String::from),
        );
        args
    }

    pub(crate) fn force_stop_args(&self, package: &str) -> Vec<String> {
        let mut args = self.device_args();
        args.extend(
            ["shell", "am", "force-stop", package]
                .into_iter()
                .map(String::from),
        );
        args
    }

    pub(crate) fn logcat_args(&self) -> Vec<String> {
        let mut args = self.device_args();
        args.push("logcat".into());
        if !self.include_backlog {
            // Replays only the newest buffered entry, not the whole ring buffer.
            // A timestamp bound would need the device clock, and host/device
            // skew can hide fresh lines.
            args.extend(["-T".to_string(), "1".to_string()]);
        }
        args
    }

    fn spawn_error(&self, args: &[String], err: std::io::Error) -> BridgeError {
        if err.kind() == std::io::ErrorKind::NotFound {
            BridgeError::BinaryNotFound(self.binary_path.display().to_string())
        } else {
            tracing::error!(args = ?args, error = %err, "Failed to spawn adb");
            BridgeError::Io(err)
        }
    }

    /// Run a short-lived adb command to completion
    async fn run(&self, args: Vec<String>, output: OutputMode) -> Result<(), BridgeError> {
        tracing::debug!(binary = %self.binary_path.display(), args = ?args, "Running adb");

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&args);
        cmd.stdin(Stdio::null());
        match output {
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit());
                cmd.stderr(Stdio::inherit());
            }
            OutputMode::Discard => {
                cmd.stdout(Stdio::null());
                cmd.stderr(Stdio::null());
            }
        }

        let status = cmd
            .status()
            .await
            .map_err(|e| self.spawn_error(&args, e))?;

        // adb reports many device-side failures through output only; the exit
        // status is informational here.
        if !status.success() {
            tracing::warn!(args = ?args, status = %status, "adb exited with non-zero status");
        }

        Ok(())
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceBridge for AdbBridge {
    async fn launch(&self, package: &str, output: OutputMode) -> Result<(), BridgeError> {
        self.run(self.launch_args(package), output).await
    }

    async fn tail_logs(&self) -> Result<LogSession, BridgeError> {
        let args = self.logcat_args();
        tracing::debug!(binary = %self.binary_path.display(), args = ?args, "Starting logcat");

        let mut child = Command::new(&self.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(&args, e))?;

        if child.id().is_none() {
            return Err(BridgeError::ProcessSpawnFailed(args.join(" ")));
        }
        let stdout = child
            .stdout
            .take()
            .ok_or(BridgeError::StdoutCaptureFailed)?;

        Ok(LogSession::new(AdbLogStream::new(child, stdout)))
    }

    async fn force_stop(&self, package: &str, output: OutputMode) -> Result<(), BridgeError> {
        self.run(self.force_stop_args(package), output).await
    }
}

/// `adb logcat` child process and a reader over its stdout
pub struct AdbLogStream {
    child: Option<Child>,
    reader: BufReader<ChildStdout>,
    /// Holds a partial line if a read was cancelled mid-way
    buf: Vec<u8>,
}

impl AdbLogStream {
    fn new(child: Child, stdout: ChildStdout) -> Self {
        Self {
            child: Some(child),
            reader: BufReader::new(stdout),
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl LogStream for AdbLogStream {
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }

        // logcat relays whatever apps print, which is not always valid UTF-8
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        tracing::trace!("logcat line: {}", line.trim_end());
        Ok(Some(line))
    }

    fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        #[cfg(unix)]
        {
            if let Some(pid) = child.id() {
                unsafe {
                    libc::kill(pid as i32, libc::SIGTERM);
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = child.start_kill();
        }

        // Reap in the background; without a runtime, kill_on_drop takes over.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = child.wait().await;
            });
        }
    }
}
