use anyhow::Result;
use clap::Args;

use newslens::db::{Action, SqliteStore};
use newslens::tracker::Tracker;

#[derive(Args)]
pub struct TrackArgs {
    /// Action to record: search, view, summary, sources, config,
    /// list-topics, analytics, export, or recommend
    pub action: String,

    /// News category, e.g. technology or health
    #[arg(long)]
    pub topic: Option<String>,

    /// Source identifier, e.g. reuters or the-guardian
    #[arg(long)]
    pub source: Option<String>,

    /// Free-text search keywords
    #[arg(long)]
    pub keywords: Option<String>,

    /// 2-letter country code
    #[arg(long)]
    pub country: Option<String>,

    /// 2-letter language code
    #[arg(long)]
    pub language: Option<String>,

    /// Seconds spent (summary action)
    #[arg(long, default_value_t = 0)]
    pub duration: i64,

    /// Number of results returned
    #[arg(long, default_value_t = 0)]
    pub results: i64,

    /// Summary input kind (summary action)
    #[arg(long, default_value = "url")]
    pub source_type: String,

    /// Report period in days (analytics and export actions)
    #[arg(long, default_value_t = 30)]
    pub period: i64,

    /// Report type (analytics action)
    #[arg(long, default_value = "basic")]
    pub report_type: String,

    /// Export format (export action)
    #[arg(long, default_value = "json")]
    pub export_format: String,

    /// Recommendation kind (recommend action)
    #[arg(long, default_value = "sources")]
    pub rec_type: String,
}

pub fn run(store: &SqliteStore, args: TrackArgs) -> Result<()> {
    let action: Action = args.action.parse()?;
    let mut tracker = Tracker::new(store);

    if !tracker.is_enabled()? {
        eprintln!("Tracking is disabled; nothing recorded.");
        return Ok(());
    }

    match action {
        Action::Search => tracker.track_search(
            args.topic,
            args.source,
            args.keywords,
            args.country,
            args.language,
            args.results,
        )?,
        Action::View => tracker.track_view(args.topic, args.source, args.keywords)?,
        Action::Summary => tracker.track_summary(&args.source_type, args.duration)?,
        Action::Sources => {
            tracker.track_sources_list(args.source, args.topic, args.country, args.results)?
        }
        Action::Config => tracker.track_config_view()?,
        Action::ListTopics => tracker.track_topics_list()?,
        Action::Analytics => tracker.track_analytics_view(args.period, &args.report_type)?,
        Action::Export => tracker.track_export(&args.export_format, args.period)?,
        Action::Recommend => tracker.track_recommendations_view(&args.rec_type)?,
    }

    eprintln!("Recorded {} activity", action);
    Ok(())
}
