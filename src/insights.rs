use chrono::{SecondsFormat, Utc};

use crate::analyzers::bias::BiasClassifier;
use crate::analyzers::{
    activity_consistency, analyze_trends, consumption_health_score, detect_blind_spots,
    generate_key_insights, peak_activity_days,
};
use crate::db::{AnalyticsRepository, ConsumptionStats};
use crate::error::Result;
use crate::recommender::Recommender;
use crate::types::{ConsumptionPatterns, ConsumptionReport, KeyMetrics, SourceOverview};

/// Composes stats, bias summary, trends, blind spots, insights,
/// recommendations, and the health score into one report object.
pub struct InsightsEngine<'a, R: AnalyticsRepository> {
    repo: &'a R,
    classifier: &'a BiasClassifier<'a, R>,
    recommender: &'a Recommender<'a, R>,
}

impl<'a, R: AnalyticsRepository> InsightsEngine<'a, R> {
    pub fn new(
        repo: &'a R,
        classifier: &'a BiasClassifier<'a, R>,
        recommender: &'a Recommender<'a, R>,
    ) -> Self {
        InsightsEngine {
            repo,
            classifier,
            recommender,
        }
    }

    pub fn consumption_report(&self, days: i64) -> Result<ConsumptionReport> {
        let stats = self.repo.query_stats(days)?;
        let bias = self.classifier.bias_summary(&stats)?;
        let trends = analyze_trends(&stats);
        let blind_spots = detect_blind_spots(&stats, &bias);
        let insights = generate_key_insights(&stats, &bias, &trends);
        let health_score = consumption_health_score(&stats, &bias);
        let recommendations = self.recommender.comprehensive_recommendations(days)?;

        Ok(ConsumptionReport {
            report_generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            period_days: days,
            key_metrics: key_metrics(&stats, days),
            consumption_patterns: ConsumptionPatterns {
                daily_activity: stats.daily_activity.clone(),
                peak_activity_days: peak_activity_days(&stats.daily_activity),
                activity_consistency: activity_consistency(&stats.daily_activity),
            },
            source_analysis: SourceOverview {
                total_sources: stats.activities_by_source.len(),
                diversity_score: bias.diversity.diversity_score,
                political_balance: bias.diversity.political_balance,
                echo_chamber_status: bias.echo_chamber.clone(),
            },
            trends,
            blind_spots,
            insights,
            recommendations,
            health_score,
        })
    }
}

fn key_metrics(stats: &ConsumptionStats, days: i64) -> KeyMetrics {
    let top_key = |counts: &[(String, i64)]| {
        counts
            .first()
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| "none".to_string())
    };

    let total = stats.total_activities as f64;
    let daily_average = (total / days.max(1) as f64 * 100.0).round() / 100.0;

    KeyMetrics {
        total_activities: stats.total_activities,
        daily_average,
        unique_sources: stats.activities_by_source.len(),
        unique_topics: stats.activities_by_topic.len(),
        most_used_action: top_key(&stats.activities_by_action),
        most_used_source: top_key(&stats.activities_by_source),
        most_searched_topic: top_key(&stats.activities_by_topic),
        // 2 activities per day reads as full engagement.
        engagement_score: (total / (days.max(1) as f64 * 2.0)).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Action, NewEvent, SqliteStore, TrackingRepository};
    use crate::types::HealthInterpretation;

    fn engine_report(store: &SqliteStore, days: i64) -> ConsumptionReport {
        let classifier = BiasClassifier::new(store).unwrap();
        let recommender = Recommender::new(store, &classifier);
        let engine = InsightsEngine::new(store, &classifier, &recommender);
        engine.consumption_report(days).unwrap()
    }

    #[test]
    fn report_on_empty_history_is_well_formed() {
        let store = SqliteStore::open_in_memory().unwrap();
        let report = engine_report(&store, 30);

        assert_eq!(report.key_metrics.total_activities, 0);
        assert_eq!(report.key_metrics.most_used_action, "none");
        assert!(report.health_score.overall_score >= 0.0);
        assert!(report.health_score.overall_score <= 1.0);
        assert!(matches!(
            report.health_score.interpretation,
            HealthInterpretation::Excellent
                | HealthInterpretation::Good
                | HealthInterpretation::Fair
                | HealthInterpretation::NeedsImprovement
        ));
        assert_eq!(
            report
                .consumption_patterns
                .activity_consistency
                .interpretation,
            "insufficient_data"
        );
        assert!(report.consumption_patterns.peak_activity_days.is_empty());
    }

    #[test]
    fn report_reflects_tracked_activity() {
        let store = SqliteStore::open_in_memory().unwrap();
        for source in ["cnn", "cnn", "reuters"] {
            let event = NewEvent {
                source: Some(source.to_string()),
                topic: Some("technology".to_string()),
                ..NewEvent::new(Action::Search)
            };
            store.record(&event).unwrap();
        }

        let report = engine_report(&store, 30);
        assert_eq!(report.key_metrics.total_activities, 3);
        assert_eq!(report.key_metrics.most_used_action, "search");
        assert_eq!(report.key_metrics.most_used_source, "cnn");
        assert_eq!(report.source_analysis.total_sources, 2);
        assert_eq!(report.key_metrics.unique_topics, 1);
        assert_eq!(report.consumption_patterns.peak_activity_days.len(), 1);
    }
}
