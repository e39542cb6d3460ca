mod error;
mod run;
mod settings;

pub use error::ConfigError;
pub use run::{
    duration_from_secs, RunConfiguration, DEFAULT_CRASH_MESSAGE, DEFAULT_DURATION_SECS, DEFAULT_MAX_RUNS,
    DEFAULT_PACKAGE,
};
pub use settings::{AdbSettings, Settings, EXAMPLE_CONFIG};
