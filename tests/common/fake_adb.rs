//! Fake adb fixture
//!
//! Writes a small shell script that stands in for `adb`. Every invocation
//! appends its arguments to a calls file; `logcat` prints the scripted lines
//! and then stays alive like a real log tail until it is signalled.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary `adb` replacement
pub struct FakeAdb {
    /// TempDir handle (keeps the script alive until dropped)
    _dir: TempDir,
    /// Path to the executable script
    pub path: PathBuf,
    /// One line per invocation, holding the arguments
    pub calls_file: PathBuf,
}

impl FakeAdb {
    /// Fake whose logcat prints `lines` and then goes quiet
    pub fn new(lines: &[&str]) -> Self {
        Self::build(lines, 0)
    }

    /// Fake whose non-logcat commands exit with `code`
    #[allow(dead_code)] // Used by the integration tests only
    pub fn with_exit_code(lines: &[&str], code: i32) -> Self {
        Self::build(lines, code)
    }

    fn build(lines: &[&str], exit_code: i32) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("adb");
        let calls_file = dir.path().join("calls.log");

        let quoted: Vec<String> = lines
            .iter()
            .map(|l| format!("'{}'", l.replace('\'', r"'\''")))
            .collect();
        let logcat_output = if quoted.is_empty() {
            String::new()
        } else {
            format!("printf '%s\\n' {}", quoted.join(" "))
        };

        let script = format!(
            r#"#!/bin/sh
echo "$*" >> '{calls}'
case "$*" in
  *logcat*)
    {logcat_output}
    exec sleep 30
    ;;
esac
exit {exit_code}
"#,
            calls = calls_file.display(),
        );

        fs::write(&path, script).expect("Failed to write fake adb");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake adb executable");

        Self {
            _dir: dir,
            path,
            calls_file,
        }
    }

    /// Recorded invocations, oldest first
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.calls_file)
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }
}
