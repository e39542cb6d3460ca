use std::fmt;

/// Outcome of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub crash_found: bool,
}

/// Outcome of a whole campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignResult {
    /// Attempts started, including the matching one
    pub attempts_used: u32,
    pub crash_found: bool,
    /// Attempts skipped in recovery mode; always 0 otherwise
    pub failed_attempts: u32,
}

impl CampaignResult {
    /// Final report line
    pub fn summary(&self) -> &'static str {
        if self.crash_found {
            "Crash found!"
        } else {
            "No crash found!"
        }
    }
}

/// What to do when an attempt fails with a bridge error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the campaign and surface the error
    #[default]
    Abort,
    /// Recovery mode: report the failure and move on to the next attempt
    SkipAttempt,
}

/// Lifecycle of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotStarted,
    Launched,
    Scanning,
    MatchFound,
    TimedOut,
    Stopped,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttemptState::NotStarted => "not-started",
            AttemptState::Launched => "launched",
            AttemptState::Scanning => "scanning",
            AttemptState::MatchFound => "match-found",
            AttemptState::TimedOut => "timed-out",
            AttemptState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
