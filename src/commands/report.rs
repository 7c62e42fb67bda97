use anyhow::Result;
use clap::Args;

use newslens::analyzers::bias::BiasClassifier;
use newslens::db::{AnalyticsRepository, SqliteStore};
use newslens::insights::InsightsEngine;
use newslens::recommender::Recommender;
use newslens::tracker::Tracker;

use super::{parse_format, OutputFormat};

#[derive(Args)]
pub struct ReportArgs {
    /// Reporting window in days
    #[arg(long, default_value_t = 30)]
    pub days: i64,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run_stats(store: &SqliteStore, args: ReportArgs) -> Result<()> {
    let format = parse_format(&args.format)?;
    let stats = store.query_stats(args.days)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Consumption stats, last {} days", stats.period_days);
            println!("  total activities: {}", stats.total_activities);
            print_counts("by action", &stats.activities_by_action);
            print_counts("by source", &stats.activities_by_source);
            print_counts("by topic", &stats.activities_by_topic);
            if !stats.daily_activity.is_empty() {
                println!("  daily:");
                for (date, count) in &stats.daily_activity {
                    println!("    {}  {}", date, count);
                }
            }
        }
    }

    // Recorded after the query so the window reflects what the user saw.
    Tracker::new(store).track_analytics_view(args.days, "basic")?;
    Ok(())
}

pub fn run_report(store: &SqliteStore, args: ReportArgs) -> Result<()> {
    let format = parse_format(&args.format)?;

    let classifier = BiasClassifier::new(store)?;
    let recommender = Recommender::new(store, &classifier);
    let engine = InsightsEngine::new(store, &classifier, &recommender);
    let report = engine.consumption_report(args.days)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => render_report_text(&report),
    }

    Tracker::new(store).track_analytics_view(args.days, "full")?;
    Ok(())
}

fn print_counts(label: &str, counts: &[(String, i64)]) {
    if counts.is_empty() {
        return;
    }
    let rendered: Vec<String> = counts
        .iter()
        .map(|(key, count)| format!("{}={}", key, count))
        .collect();
    println!("  {}: {}", label, rendered.join(", "));
}

fn render_report_text(report: &newslens::types::ConsumptionReport) {
    println!("News consumption report, last {} days", report.period_days);
    println!();

    let health = &report.health_score;
    println!(
        "Health score: {:.3} ({:?})",
        health.overall_score, health.interpretation
    );
    println!("  {}", health.message);
    println!("  highest-leverage fix: {}", health.improvement_priority);
    println!();

    let metrics = &report.key_metrics;
    println!("Activity");
    println!(
        "  {} activities ({:.2}/day), {} sources, {} topics",
        metrics.total_activities, metrics.daily_average, metrics.unique_sources,
        metrics.unique_topics
    );
    println!(
        "  most used: action={}, source={}, topic={}",
        metrics.most_used_action, metrics.most_used_source, metrics.most_searched_topic
    );
    println!();

    let sources = &report.source_analysis;
    println!("Sources");
    println!(
        "  diversity {:.3}; balance left={} center={} right={}",
        sources.diversity_score,
        sources.political_balance.left,
        sources.political_balance.center,
        sources.political_balance.right
    );
    let echo = &sources.echo_chamber_status;
    if echo.is_echo_chamber {
        println!("  echo chamber: {}", echo.echo_chamber_type);
    }
    println!();

    println!("Trends");
    println!(
        "  activity {:?} ({:+.1}%); source concentration {:?}; topic concentration {:?}",
        report.trends.activity_trend.direction,
        report.trends.activity_trend.change_percentage,
        report.trends.source_concentration.interpretation,
        report.trends.topic_concentration.interpretation
    );
    println!();

    if !report.blind_spots.improvement_areas.is_empty() {
        println!("Blind spots");
        for area in &report.blind_spots.improvement_areas {
            println!("  - {}", area);
        }
        println!();
    }

    if !report.insights.is_empty() {
        println!("Insights");
        for insight in &report.insights {
            println!("  [{}] {}: {}", insight.category, insight.insight, insight.detail);
        }
        println!();
    }

    println!("Priority actions");
    for action in &report.recommendations.priority_actions {
        println!("  - {}", action);
    }
}
