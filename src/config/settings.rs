use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::config::error::ConfigError;
use crate::config::run::{
    duration_from_secs, RunConfiguration, DEFAULT_CRASH_MESSAGE, DEFAULT_DURATION_SECS, DEFAULT_MAX_RUNS,
    DEFAULT_PACKAGE,
};
use crate::repro::FailurePolicy;
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Resolved campaign settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub package: String,
    pub duration: Duration,
    pub message: String,
    pub runs: u32,
    pub silent: bool,
    /// Recovery mode: log failed attempts and keep going
    pub recover: bool,
    pub adb: AdbSettings,
}

/// How to reach the device
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdbSettings {
    /// Explicit adb binary; `None` means look it up on PATH
    pub path: Option<PathBuf>,
    pub serial: Option<String>,
    #[serde(default)]
    pub include_backlog: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            duration: Duration::from_secs(DEFAULT_DURATION_SECS),
            message: DEFAULT_CRASH_MESSAGE.to_string(),
            runs: DEFAULT_MAX_RUNS,
            silent: true,
            recover: false,
            adb: AdbSettings::default(),
        }
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSettings {
    pub package: Option<String>,
    pub duration_secs: Option<f64>,
    pub message: Option<String>,
    pub runs: Option<u32>,
    pub silent: Option<bool>,
    pub recover: Option<bool>,
    pub adb: Option<AdbSettings>,
}

impl Settings {
    /// Load `~/.crash-repro/config.toml`, writing the bundled example on first run
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        if config_file.exists() {
            Self::load(&config_file)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file, merged over the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let toml_settings =
            toml::from_str::<TomlSettings>(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Loaded config file");

        let mut settings = Self::default();
        settings.merge(toml_settings)?;
        Ok(settings)
    }

    fn merge(&mut self, toml: TomlSettings) -> Result<(), ConfigError> {
        if let Some(package) = toml.package {
            self.package = package;
        }
        if let Some(secs) = toml.duration_secs {
            self.duration = duration_from_secs(secs)?;
        }
        if let Some(message) = toml.message {
            self.message = message;
        }
        if let Some(runs) = toml.runs {
            self.runs = runs;
        }
        if let Some(silent) = toml.silent {
            self.silent = silent;
        }
        if let Some(recover) = toml.recover {
            self.recover = recover;
        }
        if let Some(adb) = toml.adb {
            self.adb = adb;
        }
        Ok(())
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Validated per-attempt configuration
    pub fn run_configuration(&self) -> Result<RunConfiguration, ConfigError> {
        Ok(
            RunConfiguration::new(&self.package, self.duration, &self.message)?
                .with_silent(self.silent),
        )
    }

    /// Campaign size, rejecting an empty campaign
    pub fn max_runs(&self) -> Result<u32, ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        Ok(self.runs)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.recover {
            FailurePolicy::SkipAttempt
        } else {
            FailurePolicy::Abort
        }
    }
}
