use crate::db::ConsumptionStats;
use crate::types::{
    ActivityTrend, Concentration, ConcentrationLevel, TrendAnalysis, TrendDirection,
};

use super::{mean, round1, round3};

/// Period-over-period activity trend plus concentration indices for
/// sources and topics.
///
/// The trend compares the mean of the most recent 7 active days against
/// the preceding 7; days without activity are not part of the series.
pub fn analyze_trends(stats: &ConsumptionStats) -> TrendAnalysis {
    let daily = &stats.daily_activity;

    let activity_trend = if daily.len() >= 7 {
        let counts: Vec<f64> = daily.iter().map(|(_, c)| *c as f64).collect();
        let recent_avg = mean(&counts[counts.len() - 7..]);
        let previous_avg = if counts.len() >= 14 {
            mean(&counts[counts.len() - 14..counts.len() - 7])
        } else {
            recent_avg
        };

        let direction = if recent_avg > previous_avg * 1.1 {
            TrendDirection::Increasing
        } else if recent_avg < previous_avg * 0.9 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        ActivityTrend {
            direction,
            change_percentage: round1((recent_avg - previous_avg) / previous_avg.max(1.0) * 100.0),
        }
    } else {
        ActivityTrend {
            direction: TrendDirection::InsufficientData,
            change_percentage: 0.0,
        }
    };

    TrendAnalysis {
        activity_trend,
        source_concentration: concentration(&stats.activities_by_source),
        topic_concentration: concentration(&stats.activities_by_topic),
        action_preferences: stats.activities_by_action.clone(),
    }
}

/// Herfindahl-Hirschman index over a count distribution: Σ (countᵢ/total)².
/// 0.0 for an empty or all-zero distribution.
pub fn concentration_index(counts: &[(String, i64)]) -> f64 {
    let total: i64 = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return 0.0;
    }
    let hhi: f64 = counts
        .iter()
        .map(|(_, c)| {
            let share = *c as f64 / total as f64;
            share * share
        })
        .sum();
    round3(hhi)
}

fn concentration(counts: &[(String, i64)]) -> Concentration {
    let index = concentration_index(counts);
    let interpretation = if index > 0.7 {
        ConcentrationLevel::High
    } else if index > 0.4 {
        ConcentrationLevel::Medium
    } else {
        ConcentrationLevel::Low
    };
    Concentration {
        index,
        interpretation,
    }
}
