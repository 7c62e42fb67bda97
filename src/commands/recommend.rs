use anyhow::Result;
use clap::Args;

use newslens::analyzers::bias::BiasClassifier;
use newslens::db::SqliteStore;
use newslens::recommender::Recommender;
use newslens::tracker::Tracker;

use super::{parse_format, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecommendKind {
    Sources,
    Topics,
    All,
}

impl std::str::FromStr for RecommendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sources" => Ok(RecommendKind::Sources),
            "topics" => Ok(RecommendKind::Topics),
            "all" => Ok(RecommendKind::All),
            _ => Err(format!(
                "invalid kind '{}': expected sources, topics, or all",
                s
            )),
        }
    }
}

#[derive(Args)]
pub struct RecommendArgs {
    /// What to recommend: sources, topics, or all
    #[arg(long, default_value = "all")]
    pub kind: String,

    /// History window in days
    #[arg(long, default_value_t = 30)]
    pub days: i64,

    /// Maximum number of recommendations
    #[arg(long, default_value_t = 5)]
    pub limit: usize,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

pub fn run(store: &SqliteStore, args: RecommendArgs) -> Result<()> {
    let kind: RecommendKind = args
        .kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let format = parse_format(&args.format)?;

    let classifier = BiasClassifier::new(store)?;
    let recommender = Recommender::new(store, &classifier);

    match kind {
        RecommendKind::Sources => {
            let recs = recommender.source_recommendations(args.days, args.limit)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recs)?),
                OutputFormat::Text => {
                    println!("{}", recs.rationale);
                    for rec in &recs.recommendations {
                        println!("  {} — {} (bias {:+.1})", rec.source, rec.reason, rec.bias);
                    }
                }
            }
        }
        RecommendKind::Topics => {
            let recs = recommender.topic_recommendations(args.days, args.limit)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recs)?),
                OutputFormat::Text => {
                    println!("{} — {}", recs.topic_coverage, recs.rationale);
                    for rec in &recs.recommendations {
                        println!("  {} — {}", rec.topic, rec.reason);
                    }
                }
            }
        }
        RecommendKind::All => {
            let recs = recommender.comprehensive_recommendations(args.days)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recs)?),
                OutputFormat::Text => {
                    println!("Overall balance score: {:.3}", recs.overall_score);
                    println!();
                    println!("Priority actions");
                    for action in &recs.priority_actions {
                        println!("  - {}", action);
                    }
                    println!();
                    println!("Sources: {}", recs.source_recommendations.rationale);
                    for rec in &recs.source_recommendations.recommendations {
                        println!("  {} — {}", rec.source, rec.reason);
                    }
                    println!();
                    println!("Topics: {}", recs.topic_recommendations.rationale);
                    for rec in &recs.topic_recommendations.recommendations {
                        println!("  {} — {}", rec.topic, rec.reason);
                    }
                    for habit in &recs.habit_recommendations {
                        println!();
                        println!("Habit: {} ({})", habit.suggestion, habit.rationale);
                    }
                }
            }
        }
    }

    Tracker::new(store).track_recommendations_view(&args.kind)?;
    Ok(())
}
