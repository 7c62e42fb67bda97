use std::collections::HashSet;

use crate::db::ConsumptionStats;
use crate::types::{BiasSummary, BlindSpots};

/// The topic universe offered by the news backends.
pub const ALL_TOPICS: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

const INTERNATIONAL_SOURCES: [&str; 3] = ["bbc", "guardian", "reuters"];
const DOMESTIC_SOURCES: [&str; 5] = ["cnn", "foxnews", "nytimes", "wsj", "usatoday"];

/// Topics, perspectives, and coverage categories the user has not
/// meaningfully engaged with.
pub fn detect_blind_spots(stats: &ConsumptionStats, bias: &BiasSummary) -> BlindSpots {
    let covered: HashSet<&str> = stats
        .activities_by_topic
        .iter()
        .map(|(topic, _)| topic.as_str())
        .collect();

    let missing_topics: Vec<String> = ALL_TOPICS
        .iter()
        .filter(|topic| !covered.contains(**topic))
        .map(|topic| topic.to_string())
        .collect();

    // Topics holding under 10% of all topic activity.
    let total_topic_activity: i64 = stats.activities_by_topic.iter().map(|(_, c)| c).sum();
    let mut underexplored_topics: Vec<(String, i64)> = stats
        .activities_by_topic
        .iter()
        .filter(|(_, count)| {
            total_topic_activity > 0 && (*count as f64 / total_topic_activity as f64) < 0.1
        })
        .cloned()
        .collect();
    underexplored_topics.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let balance = bias.diversity.political_balance;
    let total_sources = balance.total();
    let mut perspective_gaps = Vec::new();
    if total_sources > 0 {
        let total = total_sources as f64;
        if (balance.left as f64 / total) < 0.15 {
            perspective_gaps.push("left-leaning perspectives".to_string());
        }
        if (balance.center as f64 / total) < 0.15 {
            perspective_gaps.push("centrist perspectives".to_string());
        }
        if (balance.right as f64 / total) < 0.15 {
            perspective_gaps.push("right-leaning perspectives".to_string());
        }
    }

    let user_sources: HashSet<&str> = stats
        .activities_by_source
        .iter()
        .map(|(source, _)| source.as_str())
        .collect();
    let international = INTERNATIONAL_SOURCES
        .iter()
        .filter(|s| user_sources.contains(**s))
        .count();
    let domestic = DOMESTIC_SOURCES
        .iter()
        .filter(|s| user_sources.contains(**s))
        .count();

    let coverage_gap = if international == 0 && domestic > 0 {
        Some("international".to_string())
    } else if domestic == 0 && international > 0 {
        Some("domestic".to_string())
    } else {
        None
    };

    let improvement_areas = improvement_areas(
        &missing_topics,
        &underexplored_topics,
        &perspective_gaps,
        coverage_gap.as_deref(),
    );

    BlindSpots {
        missing_topics,
        underexplored_topics,
        perspective_gaps,
        coverage_gap,
        diversity_score: bias.diversity.diversity_score,
        improvement_areas,
    }
}

/// Prioritized text hints derived from the detected gaps.
fn improvement_areas(
    missing_topics: &[String],
    underexplored_topics: &[(String, i64)],
    perspective_gaps: &[String],
    coverage_gap: Option<&str>,
) -> Vec<String> {
    let mut areas = Vec::new();

    if missing_topics.len() > 3 {
        areas.push(
            "Expand topic coverage - you're missing several important news categories".to_string(),
        );
    } else if !missing_topics.is_empty() {
        let named: Vec<&str> = missing_topics
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        areas.push(format!("Consider exploring: {}", named.join(", ")));
    }

    if underexplored_topics.len() > 2 {
        areas.push("Deepen coverage in topics you've barely explored".to_string());
    }

    if perspective_gaps.len() > 1 {
        areas.push("Diversify political perspectives in your news sources".to_string());
    } else if let Some(gap) = perspective_gaps.first() {
        areas.push(format!("Add more {} to your news diet", gap));
    }

    if let Some(gap) = coverage_gap {
        areas.push(format!(
            "Include more {} news sources for broader perspective",
            gap
        ));
    }

    if areas.is_empty() {
        areas.push("Your news consumption appears well-balanced!".to_string());
    }

    areas
}
