/// The full consumption report: always renderable, stable key names, health
/// score bounded regardless of how sparse the history is.
mod helpers;

use helpers::{cli, json_output, temp_home, track_search};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn empty_history_still_produces_a_bounded_health_score() {
    let tmp = temp_home();

    let report = json_output(&tmp, &["report", "--format", "json"]);
    let health = &report["health_score"];

    let score = health["overall_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    let interpretation = health["interpretation"].as_str().unwrap();
    assert!(
        ["excellent", "good", "fair", "needs_improvement"].contains(&interpretation),
        "unexpected interpretation: {}",
        interpretation
    );
    assert_eq!(
        report["consumption_patterns"]["activity_consistency"]["interpretation"],
        json!("insufficient_data")
    );
}

#[test]
fn report_has_stable_top_level_shape() {
    let tmp = temp_home();
    track_search(&tmp, Some("cnn"), Some("technology"));

    let report = json_output(&tmp, &["report", "--days", "30", "--format", "json"]);
    for key in [
        "report_generated",
        "period_days",
        "key_metrics",
        "consumption_patterns",
        "source_analysis",
        "trends",
        "blind_spots",
        "insights",
        "recommendations",
        "health_score",
    ] {
        assert!(report.get(key).is_some(), "missing report key: {}", key);
    }
    assert_eq!(report["period_days"], json!(30));
}

#[test]
fn report_reflects_tracked_history() {
    let tmp = temp_home();
    track_search(&tmp, Some("cnn"), Some("technology"));
    track_search(&tmp, Some("cnn"), Some("science"));
    track_search(&tmp, Some("reuters"), None);

    let report = json_output(&tmp, &["report", "--format", "json"]);
    assert_eq!(report["key_metrics"]["total_activities"], json!(3));
    assert_eq!(report["key_metrics"]["most_used_source"], json!("cnn"));
    assert_eq!(report["key_metrics"]["unique_topics"], json!(2));
    assert_eq!(report["source_analysis"]["total_sources"], json!(2));

    // Three events on one day: trend data is insufficient, never an error.
    assert_eq!(
        report["trends"]["activity_trend"]["direction"],
        json!("insufficient_data")
    );
}

#[test]
fn one_sided_history_reports_an_echo_chamber() {
    let tmp = temp_home();
    for source in ["cnn", "msnbc", "huffpost", "guardian"] {
        track_search(&tmp, Some(source), None);
    }

    let report = json_output(&tmp, &["report", "--format", "json"]);
    let echo = &report["source_analysis"]["echo_chamber_status"];
    assert_eq!(echo["is_echo_chamber"], json!(true));
    assert_eq!(echo["echo_chamber_type"], json!("left-leaning"));

    let blind_spots = &report["blind_spots"];
    let gaps = blind_spots["perspective_gaps"].as_array().unwrap();
    assert!(gaps.contains(&json!("right-leaning perspectives")));
}

#[test]
fn balanced_history_reports_no_echo_chamber() {
    let tmp = temp_home();
    for source in ["cnn", "reuters", "wsj", "bbc"] {
        track_search(&tmp, Some(source), None);
    }

    let report = json_output(&tmp, &["report", "--format", "json"]);
    let echo = &report["source_analysis"]["echo_chamber_status"];
    assert_eq!(echo["is_echo_chamber"], json!(false));
    assert_eq!(echo["echo_chamber_type"], json!("balanced"));
}

#[test]
fn text_report_renders_human_readable_sections() {
    let tmp = temp_home();
    track_search(&tmp, Some("reuters"), Some("science"));

    cli(&tmp)
        .args(["report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Health score"))
        .stdout(predicate::str::contains("Priority actions"));
}
