use std::time::Instant;

use crate::db::{Action, NewEvent, TrackingRepository};
use crate::error::Result;

/// Tracking intake: one method per user action, each a silent no-op while
/// tracking is disabled. Storage faults still propagate; disabled tracking
/// is not an error.
pub struct Tracker<'a, R: TrackingRepository> {
    repo: &'a R,
    session_start: Option<Instant>,
}

impl<'a, R: TrackingRepository> Tracker<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Tracker {
            repo,
            session_start: None,
        }
    }

    pub fn is_enabled(&self) -> Result<bool> {
        self.repo.tracking_enabled()
    }

    pub fn enable(&self) -> Result<()> {
        self.repo.set_tracking_enabled(true)
    }

    pub fn disable(&self) -> Result<()> {
        self.repo.set_tracking_enabled(false)
    }

    /// Start measuring reading time; folded into the next tracked event.
    pub fn start_session(&mut self) {
        self.session_start = Some(Instant::now());
    }

    /// Seconds since `start_session`, or 0 when no session was started.
    pub fn end_session(&mut self) -> i64 {
        match self.session_start.take() {
            Some(start) => start.elapsed().as_secs() as i64,
            None => 0,
        }
    }

    fn record_if_enabled(&self, event: NewEvent) -> Result<()> {
        if !self.repo.tracking_enabled()? {
            return Ok(());
        }
        self.repo.record(&event)?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn track_search(
        &mut self,
        topic: Option<String>,
        source: Option<String>,
        keywords: Option<String>,
        country: Option<String>,
        language: Option<String>,
        result_count: i64,
    ) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            topic,
            source,
            keywords,
            country,
            language,
            duration,
            result_count,
            ..NewEvent::new(Action::Search)
        })
    }

    pub fn track_view(
        &mut self,
        topic: Option<String>,
        source: Option<String>,
        keywords: Option<String>,
    ) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            topic,
            source,
            keywords,
            duration,
            ..NewEvent::new(Action::View)
        })
    }

    pub fn track_summary(&self, source_type: &str, duration: i64) -> Result<()> {
        self.record_if_enabled(NewEvent {
            keywords: Some(format!("source_type:{}", source_type)),
            duration,
            ..NewEvent::new(Action::Summary)
        })
    }

    pub fn track_sources_list(
        &mut self,
        source: Option<String>,
        topic: Option<String>,
        country: Option<String>,
        result_count: i64,
    ) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            topic,
            source,
            country,
            duration,
            result_count,
            ..NewEvent::new(Action::Sources)
        })
    }

    pub fn track_config_view(&mut self) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            duration,
            ..NewEvent::new(Action::Config)
        })
    }

    pub fn track_topics_list(&mut self) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            duration,
            ..NewEvent::new(Action::ListTopics)
        })
    }

    pub fn track_analytics_view(&mut self, period: i64, report_type: &str) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            keywords: Some(format!("period:{},type:{}", period, report_type)),
            duration,
            ..NewEvent::new(Action::Analytics)
        })
    }

    pub fn track_export(&mut self, format_type: &str, period: i64) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            keywords: Some(format!("format:{},period:{}", format_type, period)),
            duration,
            ..NewEvent::new(Action::Export)
        })
    }

    pub fn track_recommendations_view(&mut self, recommendation_type: &str) -> Result<()> {
        let duration = self.end_session();
        self.record_if_enabled(NewEvent {
            keywords: Some(format!("type:{}", recommendation_type)),
            duration,
            ..NewEvent::new(Action::Recommend)
        })
    }

    /// Preference passthrough, gated like every other intake.
    pub fn update_user_preference(
        &self,
        preference_type: &str,
        preference_value: &str,
        weight: f64,
    ) -> Result<()> {
        if !self.repo.tracking_enabled()? {
            return Ok(());
        }
        self.repo
            .set_preference(preference_type, preference_value, weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AnalyticsRepository, SqliteStore};

    #[test]
    fn disabled_tracking_drops_events_silently() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut tracker = Tracker::new(&store);

        tracker.disable().unwrap();
        tracker
            .track_search(Some("technology".into()), Some("cnn".into()), None, None, None, 5)
            .unwrap();
        tracker.track_topics_list().unwrap();

        assert_eq!(store.query_stats(30).unwrap().total_activities, 0);

        tracker.enable().unwrap();
        tracker.track_topics_list().unwrap();
        assert_eq!(store.query_stats(30).unwrap().total_activities, 1);
    }

    #[test]
    fn keyword_encoding_for_structured_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut tracker = Tracker::new(&store);

        tracker.track_summary("url", 12).unwrap();
        tracker.track_analytics_view(30, "full").unwrap();
        tracker.track_export("csv", 7).unwrap();

        let dump = store.export_all().unwrap();
        let keywords: Vec<Option<String>> = dump
            .consumption_log
            .iter()
            .map(|e| e.keywords.clone())
            .collect();
        assert!(keywords.contains(&Some("source_type:url".to_string())));
        assert!(keywords.contains(&Some("period:30,type:full".to_string())));
        assert!(keywords.contains(&Some("format:csv,period:7".to_string())));
    }

    #[test]
    fn session_duration_folds_into_next_event() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut tracker = Tracker::new(&store);

        tracker.start_session();
        tracker.track_view(None, Some("bbc".into()), None).unwrap();

        let dump = store.export_all().unwrap();
        assert_eq!(dump.consumption_log.len(), 1);
        assert!(dump.consumption_log[0].duration >= 0);

        // Session consumed: a second event reads zero.
        tracker.track_view(None, Some("bbc".into()), None).unwrap();
        let dump = store.export_all().unwrap();
        assert_eq!(dump.consumption_log[1].duration, 0);
    }
}
