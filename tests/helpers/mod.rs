#![allow(dead_code)]

use assert_cmd::Command;
use tempfile::TempDir;

/// Create an isolated HOME for one test. The CLI keeps its database at
/// `~/.newslens/analytics.db`, so a fresh HOME means a fresh store.
pub fn temp_home() -> TempDir {
    TempDir::new().unwrap()
}

/// Build a CLI command with HOME overridden to the temp directory.
#[allow(deprecated)]
pub fn cli(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("newslens").unwrap();
    cmd.env("HOME", tmp.path());
    cmd
}

/// Record a search event with optional source and topic.
pub fn track_search(tmp: &TempDir, source: Option<&str>, topic: Option<&str>) {
    let mut cmd = cli(tmp);
    cmd.args(["track", "search"]);
    if let Some(source) = source {
        cmd.args(["--source", source]);
    }
    if let Some(topic) = topic {
        cmd.args(["--topic", topic]);
    }
    cmd.assert().success();
}

/// Run a subcommand and parse its stdout as JSON.
pub fn json_output(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = cli(tmp)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout should be valid JSON")
}
