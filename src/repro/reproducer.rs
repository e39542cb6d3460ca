use std::io::Write;

use tokio::time::{timeout_at, Instant};

use crate::bridge::{DeviceBridge, LogSession, OutputMode};
use crate::config::{ConfigError, RunConfiguration};
use crate::repro::error::ReproError;
use crate::repro::outcome::{AttemptState, CampaignResult, FailurePolicy, RunResult};

/// Relaunches an app through a [`DeviceBridge`] and watches its log for a crash.
///
/// Progress, echoed log lines and the final verdict go to `out`; diagnostics
/// go to `tracing`.
pub struct CrashReproducer<B, W> {
    bridge: B,
    out: W,
    policy: FailurePolicy,
}

impl<B, W> CrashReproducer<B, W>
where
    B: DeviceBridge,
    W: Write,
{
    pub fn new(bridge: B, out: W) -> Self {
        Self {
            bridge,
            out,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// One attempt: launch, scan the log until match or deadline, stop the app
    pub async fn run_once(&mut self, config: &RunConfiguration) -> Result<RunResult, ReproError> {
        let output = OutputMode::from_silent(config.silent);
        let mut state = AttemptState::NotStarted;

        self.bridge.launch(&config.package_name, output).await?;
        transition(&mut state, AttemptState::Launched);

        // Once launched, the app is stopped even if tailing or scanning failed.
        let scan = match self.bridge.tail_logs().await {
            Ok(mut session) => {
                transition(&mut state, AttemptState::Scanning);
                let scan = self.scan(&mut session, config).await;
                session.close();
                scan
            }
            Err(e) => Err(e.into()),
        };
        let stopped = self.bridge.force_stop(&config.package_name, output).await;

        let crash_found = scan?;
        transition(
            &mut state,
            if crash_found {
                AttemptState::MatchFound
            } else {
                AttemptState::TimedOut
            },
        );

        stopped?;
        transition(&mut state, AttemptState::Stopped);

        Ok(RunResult { crash_found })
    }

    async fn scan(
        &mut self,
        session: &mut LogSession,
        config: &RunConfiguration,
    ) -> Result<bool, ReproError> {
        let deadline = Instant::now() + config.duration;

        loop {
            let line = match timeout_at(deadline, session.next_line()).await {
                Ok(line) => line?,
                Err(_) => return Ok(false),
            };

            let Some(line) = line else {
                tracing::warn!("Log stream closed before the scan budget ran out");
                return Ok(false);
            };

            if !config.silent {
                self.out.write_all(line.as_bytes())?;
            }

            if line.contains(&config.expected_crash_message) {
                writeln!(self.out, "Crash message found!")?;
                self.out.flush()?;
                return Ok(true);
            }
        }
    }

    /// Up to `max_runs` attempts, stopping at the first reproduced crash
    pub async fn run_campaign(
        &mut self,
        config: &RunConfiguration,
        max_runs: u32,
    ) -> Result<CampaignResult, ReproError> {
        if max_runs == 0 {
            return Err(ConfigError::ZeroRuns.into());
        }

        let mut failed_attempts = 0;
        let mut outcome = None;

        for attempt in 1..=max_runs {
            writeln!(self.out, "Run {attempt}/{max_runs}...")?;
            self.out.flush()?;

            match self.run_once(config).await {
                Ok(run) if run.crash_found => {
                    tracing::info!(attempt, "Crash reproduced");
                    outcome = Some(CampaignResult {
                        attempts_used: attempt,
                        crash_found: true,
                        failed_attempts,
                    });
                    break;
                }
                Ok(_) => tracing::debug!(attempt, "No crash this run"),
                Err(e) if self.policy == FailurePolicy::SkipAttempt && e.is_attempt_local() => {
                    tracing::warn!(attempt, error = %e, "Attempt failed, continuing");
                    writeln!(self.out, "Run {attempt}/{max_runs} failed: {e}")?;
                    failed_attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let result = outcome.unwrap_or(CampaignResult {
            attempts_used: max_runs,
            crash_found: false,
            failed_attempts,
        });

        writeln!(self.out, "{}", result.summary())?;
        self.out.flush()?;
        Ok(result)
    }
}

fn transition(state: &mut AttemptState, next: AttemptState) {
    tracing::debug!(from = %state, to = %next, "Attempt state");
    *state = next;
}
