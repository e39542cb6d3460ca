pub mod adb;
pub mod error;
pub mod mock;
pub mod runner;
pub mod session;

pub use adb::AdbBridge;
pub use error::BridgeError;
pub use runner::{DeviceBridge, LogStream, OutputMode};
pub use session::LogSession;
