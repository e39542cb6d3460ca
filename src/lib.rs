pub mod bridge;
pub mod config;
pub mod repro;
pub mod util;

pub use bridge::{AdbBridge, BridgeError, DeviceBridge, LogSession, LogStream, OutputMode};
pub use config::{ConfigError, RunConfiguration, Settings};
pub use repro::{CampaignResult, CrashReproducer, FailurePolicy, ReproError, RunResult};
