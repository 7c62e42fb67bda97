/// Recommendation surface: starter pack for new users, corrective
/// suggestions for skewed histories, topic expansion and deepening.
mod helpers;

use helpers::{cli, json_output, temp_home, track_search};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn new_users_get_the_starter_pack() {
    let tmp = temp_home();

    let recs = json_output(&tmp, &["recommend", "--kind", "sources", "--format", "json"]);
    let sources = recs["recommendations"].as_array().unwrap();
    assert_eq!(sources.len(), 5);
    assert_eq!(sources[0]["source"], json!("reuters"));
    assert_eq!(recs["current_diversity_score"], json!(0.0));
    assert_eq!(recs["echo_chamber_risk"], json!(false));
    assert_eq!(recs["improvement_potential"], json!(1.0));
}

#[test]
fn skewed_history_recommends_unused_balancing_sources() {
    let tmp = temp_home();
    for source in ["guardian", "msnbc", "huffpost", "vox"] {
        track_search(&tmp, Some(source), None);
    }

    let recs = json_output(&tmp, &["recommend", "--kind", "sources", "--format", "json"]);
    assert_eq!(recs["echo_chamber_risk"], json!(true));

    let recommended: Vec<&str> = recs["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["source"].as_str().unwrap())
        .collect();
    for used in ["guardian", "msnbc", "huffpost", "vox"] {
        assert!(
            !recommended.contains(&used),
            "recommended a source already in use: {}",
            used
        );
    }
    assert!(!recommended.is_empty());
}

#[test]
fn limit_caps_source_recommendations() {
    let tmp = temp_home();
    track_search(&tmp, Some("foxnews"), None);

    let recs = json_output(&tmp, &[
        "recommend", "--kind", "sources", "--limit", "2", "--format", "json",
    ]);
    assert!(recs["recommendations"].as_array().unwrap().len() <= 2);
}

#[test]
fn unexplored_topics_are_recommended_first() {
    let tmp = temp_home();
    track_search(&tmp, Some("reuters"), Some("technology"));

    let recs = json_output(&tmp, &["recommend", "--kind", "topics", "--format", "json"]);
    assert_eq!(recs["explored_topics"], json!(["technology"]));
    assert_eq!(recs["topic_coverage"], json!("1/7 topics explored"));

    let topics = recs["recommendations"].as_array().unwrap();
    assert_eq!(topics.len(), 5);
    for topic in topics {
        assert_eq!(topic["category"], json!("topic-expansion"));
        assert_ne!(topic["topic"], json!("technology"));
    }
}

#[test]
fn comprehensive_combines_sources_topics_and_habits() {
    let tmp = temp_home();
    track_search(&tmp, Some("cnn"), Some("general"));

    let recs = json_output(&tmp, &["recommend", "--format", "json"]);
    let score = recs["overall_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(recs["source_recommendations"].is_object());
    assert!(recs["topic_recommendations"].is_object());
    assert!(recs["habit_recommendations"].is_array());
    assert!(!recs["priority_actions"].as_array().unwrap().is_empty());
}

#[test]
fn invalid_kind_is_rejected() {
    let tmp = temp_home();

    cli(&tmp)
        .args(["recommend", "--kind", "podcasts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid kind"));
}
