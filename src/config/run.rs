use std::time::Duration;

use crate::config::error::ConfigError;

/// Package the reproducer targets when nothing else is configured
pub const DEFAULT_PACKAGE: &str = "com.meta.levinriegner.mediaview.qa";
/// Seconds spent scanning the log after each launch
pub const DEFAULT_DURATION_SECS: u64 = 4;
/// Log fragment that identifies the crash
pub const DEFAULT_CRASH_MESSAGE: &str = "No panel creator found for key";
/// Attempts per campaign
pub const DEFAULT_MAX_RUNS: u32 = 100;

/// Parameters for a single launch → scan → stop attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    pub package_name: String,
    /// Time budget for scanning the log after launch
    pub duration: Duration,
    /// Case-sensitive substring that marks a reproduced crash
    pub expected_crash_message: String,
    /// Hide adb command output and the echoed log lines
    pub silent: bool,
}

impl RunConfiguration {
    pub fn new(
        package_name: impl Into<String>,
        duration: Duration,
        expected_crash_message: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let package_name = package_name.into();
        let expected_crash_message = expected_crash_message.into();

        validate_package_name(&package_name)?;
        if duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if expected_crash_message.is_empty() {
            return Err(ConfigError::EmptyMessage);
        }

        Ok(Self {
            package_name,
            duration,
            expected_crash_message,
            silent: true,
        })
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Scan budget from a (possibly fractional) number of seconds
pub fn duration_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(ConfigError::InvalidDuration(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDuration(secs))
}

/// Android application ids are dot-separated segments of `[A-Za-z0-9_]`.
///
/// The id ends up in a device-side shell command line, so nothing else is let through.
fn validate_package_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyPackage);
    }

    let valid = name.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPackage(name.to_string()))
    }
}
