use crate::db::ConsumptionStats;
use crate::types::{
    ActivityConsistency, BiasSummary, ConcentrationLevel, HealthFactors, HealthInterpretation,
    HealthScore, Insight, TrendAnalysis, TrendDirection,
};

use super::{mean, round3, sample_std_dev};

const WEIGHT_ACTIVITY: f64 = 0.20;
const WEIGHT_DIVERSITY: f64 = 0.30;
const WEIGHT_TOPICS: f64 = 0.20;
const WEIGHT_ECHO: f64 = 0.15;
const WEIGHT_CREDIBILITY: f64 = 0.15;

/// Average activities per day with activity. Days without any event are
/// not part of the series, so this is a mean over active days.
fn active_daily_average(stats: &ConsumptionStats) -> f64 {
    let days = stats.daily_activity.len().max(1);
    stats.total_activities as f64 / days as f64
}

/// Weighted composite of activity level, diversity, topic coverage,
/// echo-chamber avoidance, and credibility. Total for any input: an empty
/// history still scores, it just scores low.
pub fn consumption_health_score(stats: &ConsumptionStats, bias: &BiasSummary) -> HealthScore {
    let daily_avg = active_daily_average(stats);

    // Optimal band is 0.5-3 activities per active day; scale linearly
    // outside it, floored at 0.1 on the heavy side.
    let activity_level = if (0.5..=3.0).contains(&daily_avg) {
        1.0
    } else if daily_avg < 0.5 {
        daily_avg / 0.5
    } else {
        (3.0 / daily_avg).max(0.1)
    };

    let source_diversity = bias.diversity.diversity_score;
    let topic_coverage = (stats.activities_by_topic.len() as f64 / 7.0).min(1.0);
    let echo_chamber = if bias.echo_chamber.is_echo_chamber {
        0.0
    } else {
        1.0
    };
    let credibility = if bias.sources_analyzed == 0 {
        // Neutral prior when nothing has been classified.
        0.5
    } else {
        bias.diversity.average_credibility
    };

    let factors = HealthFactors {
        activity_level: round3(activity_level),
        source_diversity: round3(source_diversity),
        topic_coverage: round3(topic_coverage),
        echo_chamber,
        credibility: round3(credibility),
    };

    let overall = activity_level * WEIGHT_ACTIVITY
        + source_diversity * WEIGHT_DIVERSITY
        + topic_coverage * WEIGHT_TOPICS
        + echo_chamber * WEIGHT_ECHO
        + credibility * WEIGHT_CREDIBILITY;

    let (interpretation, message) = if overall >= 0.8 {
        (
            HealthInterpretation::Excellent,
            "Your news consumption habits are very healthy and well-balanced!",
        )
    } else if overall >= 0.6 {
        (
            HealthInterpretation::Good,
            "Good news consumption habits with some room for improvement.",
        )
    } else if overall >= 0.4 {
        (
            HealthInterpretation::Fair,
            "Your news habits could benefit from more balance and diversity.",
        )
    } else {
        (
            HealthInterpretation::NeedsImprovement,
            "Consider improving your news consumption for better information balance.",
        )
    };

    HealthScore {
        overall_score: round3(overall),
        interpretation,
        message: message.to_string(),
        factor_scores: factors,
        improvement_priority: improvement_priority(&[
            ("activity_level", activity_level, WEIGHT_ACTIVITY),
            ("source_diversity", source_diversity, WEIGHT_DIVERSITY),
            ("topic_coverage", topic_coverage, WEIGHT_TOPICS),
            ("echo_chamber", echo_chamber, WEIGHT_ECHO),
            ("credibility", credibility, WEIGHT_CREDIBILITY),
        ]),
    }
}

/// The single factor where weighted shortfall is largest; first wins ties.
fn improvement_priority(factors: &[(&str, f64, f64)]) -> String {
    let mut best = factors[0];
    for factor in &factors[1..] {
        if factor.2 * (1.0 - factor.1) > best.2 * (1.0 - best.1) {
            best = *factor;
        }
    }
    best.0.to_string()
}

/// Rule-based textual insights over fixed thresholds.
pub fn generate_key_insights(
    stats: &ConsumptionStats,
    bias: &BiasSummary,
    trends: &TrendAnalysis,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let daily_avg = active_daily_average(stats);

    if daily_avg < 0.5 {
        insights.push(Insight {
            category: "engagement".to_string(),
            insight: "Low news engagement detected".to_string(),
            detail: format!(
                "You average {:.1} news activities per day. Consider increasing to stay informed.",
                daily_avg
            ),
        });
    } else if daily_avg > 3.0 {
        insights.push(Insight {
            category: "engagement".to_string(),
            insight: "High news engagement".to_string(),
            detail: format!(
                "You're very active with {:.1} activities per day. Ensure you're not overwhelming yourself.",
                daily_avg
            ),
        });
    }

    let diversity_score = bias.diversity.diversity_score;
    if diversity_score < 0.3 {
        insights.push(Insight {
            category: "diversity".to_string(),
            insight: "Limited source diversity".to_string(),
            detail: format!(
                "Your diversity score is {:.2}. Adding varied perspectives would improve balance.",
                diversity_score
            ),
        });
    } else if diversity_score > 0.7 {
        insights.push(Insight {
            category: "diversity".to_string(),
            insight: "Excellent source diversity".to_string(),
            detail: format!(
                "Your diversity score of {:.2} shows great balance across perspectives.",
                diversity_score
            ),
        });
    }

    if bias.echo_chamber.is_echo_chamber {
        insights.push(Insight {
            category: "bias".to_string(),
            insight: format!(
                "Echo chamber detected: {}",
                bias.echo_chamber.echo_chamber_type
            ),
            detail: "Consider diversifying your sources to get broader perspectives on current events."
                .to_string(),
        });
    }

    match trends.activity_trend.direction {
        TrendDirection::Decreasing => {
            insights.push(Insight {
                category: "trends".to_string(),
                insight: "Declining news engagement".to_string(),
                detail: format!(
                    "Your activity decreased by {:.1}% recently. Consider re-engaging with current events.",
                    trends.activity_trend.change_percentage.abs()
                ),
            });
        }
        TrendDirection::Increasing => {
            insights.push(Insight {
                category: "trends".to_string(),
                insight: "Growing news engagement".to_string(),
                detail: format!(
                    "Your activity increased by {:.1}% recently. Great job staying informed!",
                    trends.activity_trend.change_percentage
                ),
            });
        }
        TrendDirection::Stable | TrendDirection::InsufficientData => {}
    }

    if trends.source_concentration.interpretation == ConcentrationLevel::High {
        insights.push(Insight {
            category: "habits".to_string(),
            insight: "High source concentration".to_string(),
            detail: "You rely heavily on just a few sources. Diversifying could provide richer perspectives."
                .to_string(),
        });
    }

    insights
}

/// Top 3 days by activity count, most active first.
pub fn peak_activity_days(daily_activity: &[(String, i64)]) -> Vec<String> {
    let mut days: Vec<&(String, i64)> = daily_activity.iter().filter(|(_, c)| *c > 0).collect();
    days.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    days.into_iter().take(3).map(|(d, _)| d.clone()).collect()
}

/// Consistency of daily activity: 1 − coefficient of variation, clamped at
/// zero. Requires at least 3 active days to say anything.
pub fn activity_consistency(daily_activity: &[(String, i64)]) -> ActivityConsistency {
    let counts: Vec<f64> = daily_activity.iter().map(|(_, c)| *c as f64).collect();
    let days_with_activity = counts.iter().filter(|c| **c > 0.0).count();

    if counts.len() < 3 {
        return ActivityConsistency {
            score: 0.0,
            interpretation: "insufficient_data".to_string(),
            days_with_activity,
            total_days: counts.len(),
        };
    }

    let m = mean(&counts);
    if m == 0.0 {
        return ActivityConsistency {
            score: 0.0,
            interpretation: "no_activity".to_string(),
            days_with_activity,
            total_days: counts.len(),
        };
    }

    let cv = sample_std_dev(&counts) / m;
    let score = round3((1.0 - cv).max(0.0));
    let interpretation = if score > 0.7 {
        "high"
    } else if score > 0.4 {
        "medium"
    } else {
        "low"
    };

    ActivityConsistency {
        score,
        interpretation: interpretation.to_string(),
        days_with_activity,
        total_days: counts.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::bias::BiasClassifier;
    use crate::db::SqliteStore;

    fn empty_stats() -> ConsumptionStats {
        ConsumptionStats {
            period_days: 30,
            total_activities: 0,
            activities_by_action: Vec::new(),
            activities_by_source: Vec::new(),
            activities_by_topic: Vec::new(),
            daily_activity: Vec::new(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }

    fn summary_for(stats: &ConsumptionStats) -> BiasSummary {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = BiasClassifier::new(&store).unwrap();
        classifier.bias_summary(stats).unwrap()
    }

    #[test]
    fn empty_history_still_scores_in_range() {
        let stats = empty_stats();
        let health = consumption_health_score(&stats, &summary_for(&stats));
        assert!(health.overall_score >= 0.0 && health.overall_score <= 1.0);
        assert_eq!(
            health.interpretation,
            HealthInterpretation::NeedsImprovement
        );
    }

    #[test]
    fn activity_in_optimal_band_scores_full() {
        let mut stats = empty_stats();
        stats.total_activities = 10;
        stats.daily_activity = (1..=5)
            .map(|d| (format!("2026-07-{:02}", d), 2))
            .collect();
        let health = consumption_health_score(&stats, &summary_for(&stats));
        assert_eq!(health.factor_scores.activity_level, 1.0);
    }

    #[test]
    fn heavy_activity_is_floored_not_zeroed() {
        let mut stats = empty_stats();
        stats.total_activities = 200;
        stats.daily_activity = vec![("2026-07-01".to_string(), 200)];
        let health = consumption_health_score(&stats, &summary_for(&stats));
        assert!(health.factor_scores.activity_level >= 0.1);
    }

    #[test]
    fn priority_picks_biggest_weighted_shortfall() {
        // All factors perfect except diversity, the heaviest weight.
        let priority = improvement_priority(&[
            ("activity_level", 1.0, 0.20),
            ("source_diversity", 0.0, 0.30),
            ("topic_coverage", 1.0, 0.20),
            ("echo_chamber", 1.0, 0.15),
            ("credibility", 1.0, 0.15),
        ]);
        assert_eq!(priority, "source_diversity");
    }

    #[test]
    fn consistency_needs_three_days() {
        let consistency =
            activity_consistency(&[("2026-07-01".to_string(), 2), ("2026-07-02".to_string(), 2)]);
        assert_eq!(consistency.interpretation, "insufficient_data");
        assert_eq!(consistency.score, 0.0);
    }

    #[test]
    fn uniform_days_are_highly_consistent() {
        let daily: Vec<(String, i64)> = (1..=5)
            .map(|d| (format!("2026-07-{:02}", d), 3))
            .collect();
        let consistency = activity_consistency(&daily);
        assert_eq!(consistency.score, 1.0);
        assert_eq!(consistency.interpretation, "high");
    }

    #[test]
    fn peak_days_are_top_three_nonzero() {
        let daily = vec![
            ("2026-07-01".to_string(), 1),
            ("2026-07-02".to_string(), 5),
            ("2026-07-03".to_string(), 3),
            ("2026-07-04".to_string(), 4),
        ];
        assert_eq!(
            peak_activity_days(&daily),
            vec!["2026-07-02", "2026-07-04", "2026-07-03"]
        );
    }
}
