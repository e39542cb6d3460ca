use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crash_repro::config::{duration_from_secs, ConfigError};
use crash_repro::{util, AdbBridge, CrashReproducer, Settings};

/// Relaunch an Android app until a crash signature shows up in logcat
#[derive(Parser, Debug)]
#[command(name = "crash-repro", version)]
#[command(about = "Relaunch an Android app until a crash signature shows up in logcat", long_about = None)]
struct Cli {
    /// Application id to launch and force-stop
    #[arg(short, long)]
    package: Option<String>,

    /// Seconds to scan logcat after each launch (fractions allowed)
    #[arg(short, long, value_name = "SECS")]
    duration: Option<f64>,

    /// Case-sensitive fragment of the crash log line
    #[arg(short, long)]
    message: Option<String>,

    /// Maximum number of attempts
    #[arg(short = 'n', long)]
    runs: Option<u32>,

    /// Show adb output and echo every logcat line
    #[arg(short, long)]
    verbose: bool,

    /// Hide adb output and logcat lines, even if the config file shows them
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Recovery mode: report a failed attempt and continue with the next one
    #[arg(long)]
    recover: bool,

    /// Path to the adb binary
    #[arg(long, value_name = "PATH")]
    adb: Option<PathBuf>,

    /// Device serial to target
    #[arg(short, long)]
    serial: Option<String>,

    /// Replay the existing logcat buffer before following new entries
    #[arg(long)]
    include_backlog: bool,

    /// Config file (default: ~/.crash-repro/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(self, settings: &mut Settings) -> Result<(), ConfigError> {
        if let Some(package) = self.package {
            settings.package = package;
        }
        if let Some(secs) = self.duration {
            settings.duration = duration_from_secs(secs)?;
        }
        if let Some(message) = self.message {
            settings.message = message;
        }
        if let Some(runs) = self.runs {
            settings.runs = runs;
        }
        if self.verbose {
            settings.silent = false;
        }
        if self.quiet {
            settings.silent = true;
        }
        if self.recover {
            settings.recover = true;
        }
        if let Some(path) = self.adb {
            settings.adb.path = Some(path);
        }
        if let Some(serial) = self.serial {
            settings.adb.serial = Some(serial);
        }
        if self.include_backlog {
            settings.adb.include_backlog = true;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to file (~/.crash-repro/logs/crash-repro.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };
    cli.apply(&mut settings)?;

    let config = settings.run_configuration()?;
    let max_runs = settings.max_runs()?;

    let mut bridge = AdbBridge::new().with_backlog(settings.adb.include_backlog);
    if let Some(path) = settings.adb.path.clone() {
        bridge = bridge.with_binary(path);
    }
    if let Some(serial) = settings.adb.serial.clone() {
        bridge = bridge.with_serial(serial);
    }

    tracing::info!(
        package = %config.package_name,
        duration_secs = config.duration.as_secs_f64(),
        max_runs,
        "Starting crash reproduction campaign"
    );

    let mut reproducer = CrashReproducer::new(bridge, std::io::stdout())
        .with_failure_policy(settings.failure_policy());
    let result = reproducer.run_campaign(&config, max_runs).await?;

    tracing::info!(
        attempts = result.attempts_used,
        crash_found = result.crash_found,
        failed = result.failed_attempts,
        "Campaign finished"
    );

    Ok(())
}
