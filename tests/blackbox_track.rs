/// Tracking intake through the CLI: events land in the store, the
/// enable/disable gate is a silent no-op, malformed input is rejected.
mod helpers;

use helpers::{cli, json_output, temp_home, track_search};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn tracked_events_show_up_in_stats() {
    let tmp = temp_home();

    track_search(&tmp, Some("newsapi"), None);
    track_search(&tmp, Some("guardian"), None);
    cli(&tmp).args(["track", "summary"]).assert().success();

    let stats = json_output(&tmp, &["stats", "--days", "30", "--format", "json"]);
    assert_eq!(stats["total_activities"], json!(3));
    assert_eq!(
        stats["activities_by_action"],
        json!([["search", 2], ["summary", 1]])
    );
    assert_eq!(
        stats["activities_by_source"],
        json!([["guardian", 1], ["newsapi", 1]])
    );
}

#[test]
fn action_specific_fields_are_recorded() {
    let tmp = temp_home();

    cli(&tmp)
        .args([
            "track", "search", "--topic", "technology", "--source", "reuters", "--country", "us",
            "--language", "en", "--results", "12",
        ])
        .assert()
        .success();

    let stats = json_output(&tmp, &["stats", "--format", "json"]);
    assert_eq!(stats["activities_by_topic"], json!([["technology", 1]]));
    assert_eq!(stats["activities_by_source"], json!([["reuters", 1]]));
}

#[test]
fn unknown_action_is_rejected() {
    let tmp = temp_home();

    cli(&tmp)
        .args(["track", "doomscroll"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action"));

    let stats = json_output(&tmp, &["stats", "--format", "json"]);
    assert_eq!(stats["total_activities"], json!(0));
}

#[test]
fn disabled_tracking_is_a_silent_noop() {
    let tmp = temp_home();

    cli(&tmp).args(["privacy", "disable"]).assert().success();
    cli(&tmp)
        .args(["track", "search", "--source", "cnn"])
        .assert()
        .success();

    let stats = json_output(&tmp, &["stats", "--format", "json"]);
    assert_eq!(stats["total_activities"], json!(0));
}

#[test]
fn non_positive_period_is_rejected() {
    let tmp = temp_home();

    cli(&tmp)
        .args(["stats", "--days=-3", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid days"));

    cli(&tmp)
        .args(["stats", "--days", "0"])
        .assert()
        .failure();
}

#[test]
fn stats_on_empty_history_is_well_formed_json() {
    let tmp = temp_home();

    let stats = json_output(&tmp, &["stats", "--format", "json"]);
    assert_eq!(stats["total_activities"], json!(0));
    assert_eq!(stats["activities_by_action"], json!([]));
    assert_eq!(stats["daily_activity"], json!([]));
    assert!(stats["start_date"].is_string());
    assert!(stats["end_date"].is_string());
}
