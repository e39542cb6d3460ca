//! Integration tests for the campaign flow
//!
//! Tests the flow: MockBridge -> CrashReproducer -> CampaignResult + report,
//! exercising only the public API.

use std::time::Duration;

use crash_repro::bridge::mock::{BridgeCall, MockBridge, MockLogScript};
use crash_repro::{
    CampaignResult, CrashReproducer, FailurePolicy, OutputMode, ReproError, RunConfiguration,
    Settings,
};

const TARGET: &str = "No panel creator found for key";

fn run_config(secs: u64) -> RunConfiguration {
    RunConfiguration::new("com.meta.levinriegner.mediaview.qa", Duration::from_secs(secs), TARGET)
        .expect("valid configuration")
}

/// Three quiet attempts print three progress lines and the negative verdict
#[tokio::test(start_paused = true)]
async fn test_three_runs_without_crash() {
    let bridge = MockBridge::new()
        .with_script(MockLogScript::new(["booting...", "ready"]))
        .with_script(MockLogScript::silent())
        .with_script(MockLogScript::new(["ActivityManager: Start proc"]));
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new());

    let result = reproducer.run_campaign(&run_config(4), 3).await.unwrap();

    assert_eq!(
        result,
        CampaignResult {
            attempts_used: 3,
            crash_found: false,
            failed_attempts: 0
        }
    );
    assert_eq!(bridge.terminations(), 3);

    let output = String::from_utf8(reproducer.into_output()).unwrap();
    assert_eq!(output, "Run 1/3...\nRun 2/3...\nRun 3/3...\nNo crash found!\n");
}

/// The documented scenario: the third line of the second attempt matches
#[tokio::test(start_paused = true)]
async fn test_crash_on_second_attempt() {
    let bridge = MockBridge::new()
        .with_script(MockLogScript::new(["booting...", "ready"]))
        .with_script(
            MockLogScript::new(["booting...", "ready", "No panel creator found for key=42"])
                .with_delay(Duration::from_millis(100)),
        );
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new());

    let result = reproducer.run_campaign(&run_config(4), 100).await.unwrap();

    assert_eq!(result.attempts_used, 2);
    assert!(result.crash_found);
    assert_eq!(bridge.launch_count(), 2);
    assert_eq!(bridge.terminations(), 2);

    let output = String::from_utf8(reproducer.into_output()).unwrap();
    assert_eq!(
        output,
        "Run 1/100...\nRun 2/100...\nCrash message found!\nCrash found!\n"
    );
}

/// Every attempt launches, tails, then force-stops, and never overlaps the next
#[tokio::test(start_paused = true)]
async fn test_attempts_are_strictly_sequential() {
    let bridge = MockBridge::new();
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new());

    reproducer.run_campaign(&run_config(1), 4).await.unwrap();

    let calls = bridge.calls();
    assert_eq!(calls.len(), 12);
    for attempt in calls.chunks(3) {
        assert!(matches!(
            attempt[0],
            BridgeCall::Launch {
                output: OutputMode::Discard,
                ..
            }
        ));
        assert_eq!(attempt[1], BridgeCall::TailLogs);
        assert!(matches!(attempt[2], BridgeCall::ForceStop { .. }));
    }
}

/// Without recovery mode the first bridge failure ends the campaign
#[tokio::test(start_paused = true)]
async fn test_fail_fast_discards_progress() {
    let bridge = MockBridge::new().failing_launch_on(3);
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new());

    let result = reproducer.run_campaign(&run_config(1), 10).await;

    assert!(matches!(result, Err(ReproError::Bridge(_))));
    assert_eq!(bridge.launch_count(), 3);
}

/// Recovery mode reports the broken attempt and keeps counting
#[tokio::test(start_paused = true)]
async fn test_recovery_mode_counts_failures() {
    let bridge = MockBridge::new().failing_launch_on(1).failing_launch_on(2);
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new())
        .with_failure_policy(FailurePolicy::SkipAttempt);

    let result = reproducer.run_campaign(&run_config(1), 3).await.unwrap();

    assert_eq!(
        result,
        CampaignResult {
            attempts_used: 3,
            crash_found: false,
            failed_attempts: 2
        }
    );
    // Only the third attempt got far enough to open a log session
    assert_eq!(bridge.terminations(), 1);

    let output = String::from_utf8(reproducer.into_output()).unwrap();
    let failures = output
        .lines()
        .filter(|l| l.starts_with("Run ") && l.contains(" failed: "))
        .count();
    assert_eq!(failures, 2);
    assert!(output.ends_with("No crash found!\n"));
}

/// Settings defaults drive a campaign end to end
#[tokio::test(start_paused = true)]
async fn test_default_settings_campaign() {
    let settings = Settings {
        runs: 2,
        ..Settings::default()
    };
    let config = settings.run_configuration().unwrap();
    let bridge = MockBridge::new().with_script(MockLogScript::new([
        "E/PanelRegistry: No panel creator found for key=com.meta.levinriegner.mediaview.Gallery",
    ]));
    let mut reproducer = CrashReproducer::new(bridge.clone(), Vec::new())
        .with_failure_policy(settings.failure_policy());

    let result = reproducer
        .run_campaign(&config, settings.max_runs().unwrap())
        .await
        .unwrap();

    assert!(result.crash_found);
    assert_eq!(result.attempts_used, 1);
    assert_eq!(
        bridge.calls()[0],
        BridgeCall::Launch {
            package: "com.meta.levinriegner.mediaview.qa".to_string(),
            output: OutputMode::Discard
        }
    );
}
