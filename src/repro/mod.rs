//! Crash reproduction loop
//!
//! A campaign is a bounded series of attempts. Each attempt launches the app,
//! tails the device log for a fixed budget looking for the crash signature,
//! then force-stops the app.

mod error;
mod outcome;
mod reproducer;

pub use error::ReproError;
pub use outcome::{AttemptState, CampaignResult, FailurePolicy, RunResult};
pub use reproducer::CrashReproducer;
