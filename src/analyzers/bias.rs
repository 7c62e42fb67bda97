use tracing::debug;

use crate::db::{AnalyticsRepository, ConsumptionStats};
use crate::error::Result;
use crate::types::{
    BiasDistribution, BiasSummary, DiversityAnalysis, EchoChamberAnalysis, EchoChamberType,
    PoliticalBalance, PoliticalDistribution, SourceScore,
};

use super::{mean, round3, sample_std_dev};

/// Diversity floor below which a source mix counts as an echo chamber.
pub const DEFAULT_DIVERSITY_FLOOR: f64 = 0.25;

/// Reference classifications for well-known sources, seeded into the store
/// at classifier construction. Bias in [-1, 1], credibility in [0, 1].
const KNOWN_SOURCES: &[(&str, f64, f64)] = &[
    // Left-leaning
    ("guardian", -0.6, 0.8),
    ("theguardian.com", -0.6, 0.8),
    ("cnn", -0.4, 0.7),
    ("cnn.com", -0.4, 0.7),
    ("msnbc", -0.7, 0.6),
    ("washingtonpost", -0.5, 0.8),
    ("nytimes", -0.4, 0.9),
    ("huffpost", -0.8, 0.6),
    ("vox", -0.7, 0.7),
    // Right-leaning
    ("foxnews", 0.7, 0.6),
    ("fox", 0.7, 0.6),
    ("breitbart", 0.9, 0.4),
    ("dailywire", 0.8, 0.5),
    ("nypost", 0.5, 0.6),
    ("wsj", 0.3, 0.9),
    ("wallstreetjournal", 0.3, 0.9),
    // Center
    ("reuters", 0.0, 0.9),
    ("ap", 0.0, 0.9),
    ("apnews", 0.0, 0.9),
    ("associated-press", 0.0, 0.9),
    ("bbc", -0.1, 0.8),
    ("bbc.com", -0.1, 0.8),
    ("npr", -0.2, 0.8),
    ("pbs", -0.1, 0.8),
    ("usa-today", 0.1, 0.7),
    ("usatoday", 0.1, 0.7),
    ("bloomberg", 0.0, 0.9),
    ("newsapi", 0.0, 0.8), // aggregator
];

const DOMAIN_SUFFIXES: &[&str] = &[".com", ".org", ".net", ".co.uk", ".au"];

/// Variant spellings collapsed to canonical keys.
const ALIASES: &[(&str, &str)] = &[
    ("the-guardian", "guardian"),
    ("theguardian", "guardian"),
    ("the-washington-post", "washingtonpost"),
    ("the-wall-street-journal", "wsj"),
    ("wall-street-journal", "wsj"),
    ("new-york-times", "nytimes"),
    ("the-new-york-times", "nytimes"),
    ("associated-press", "ap"),
    ("huffington-post", "huffpost"),
    ("usa-today", "usatoday"),
];

/// Normalize a source identifier to its canonical lookup key.
///
/// Lowercases and trims, strips domain suffixes, then collapses known
/// variant spellings. Idempotent: normalizing an already-normalized key
/// returns it unchanged.
pub fn normalize_source(source: &str) -> String {
    let mut clean = source.trim().to_lowercase();

    'strip: loop {
        for suffix in DOMAIN_SUFFIXES {
            if let Some(stripped) = clean.strip_suffix(suffix) {
                clean = stripped.to_string();
                continue 'strip;
            }
        }
        break;
    }

    for (variant, canonical) in ALIASES {
        if clean == *variant {
            return (*canonical).to_string();
        }
    }
    clean
}

/// Maps source identifiers to (bias, credibility) and derives set-level
/// diversity and echo-chamber classifications.
pub struct BiasClassifier<'a, R: AnalyticsRepository> {
    repo: &'a R,
}

impl<'a, R: AnalyticsRepository> BiasClassifier<'a, R> {
    /// Construct a classifier, seeding the built-in reference table into the
    /// store. Seeding is an idempotent upsert of static values.
    pub fn new(repo: &'a R) -> Result<Self> {
        for (source, bias, credibility) in KNOWN_SOURCES {
            repo.upsert_source_analysis(source, *bias, *credibility)?;
        }
        Ok(BiasClassifier { repo })
    }

    /// Resolve bias/credibility for a source. Total: unknown sources fall
    /// back to neutral (bias 0.0, credibility 0.5) rather than erroring,
    /// and the fallback is never persisted.
    pub fn get_source_bias(&self, source: &str) -> Result<SourceScore> {
        let key = normalize_source(source);

        if let Some(row) = self.repo.get_source_analysis(&key)? {
            return Ok(SourceScore {
                bias: row.political_bias,
                credibility: row.credibility_score,
            });
        }

        if let Some(score) = self.external_lookup(&key) {
            self.repo
                .upsert_source_analysis(&key, score.bias, score.credibility)?;
            return Ok(score);
        }

        debug!(source = %key, "unclassified source, using neutral scores");
        Ok(SourceScore::NEUTRAL)
    }

    /// Extension point for an external classification provider (AllSides,
    /// Ad Fontes, NewsGuard and similar). None is configured in this build.
    fn external_lookup(&self, _source: &str) -> Option<SourceScore> {
        None
    }

    /// Political diversity of a source list. Duplicates count; an empty
    /// list yields a zeroed result, not an error.
    pub fn analyze_source_diversity(&self, sources: &[String]) -> Result<DiversityAnalysis> {
        if sources.is_empty() {
            return Ok(DiversityAnalysis::empty());
        }

        let mut biases = Vec::with_capacity(sources.len());
        let mut credibilities = Vec::with_capacity(sources.len());
        let mut balance = PoliticalBalance::default();

        for source in sources {
            let score = self.get_source_bias(source)?;
            biases.push(score.bias);
            credibilities.push(score.credibility);

            if score.bias < -0.3 {
                balance.left += 1;
            } else if score.bias > 0.3 {
                balance.right += 1;
            } else {
                balance.center += 1;
            }
        }

        let std_dev = sample_std_dev(&biases);
        let min = biases.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = biases.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Ok(DiversityAnalysis {
            diversity_score: round3(std_dev.clamp(0.0, 1.0)),
            political_balance: balance,
            average_credibility: round3(mean(&credibilities)),
            average_bias: round3(mean(&biases)),
            source_count: sources.len(),
            bias_distribution: Some(BiasDistribution {
                min: round3(min),
                max: round3(max),
                std_dev: round3(std_dev),
            }),
        })
    }

    /// Decide whether a source mix constitutes an echo chamber: dominated
    /// (>70%) by one political wing, or diversity below `threshold`.
    pub fn detect_echo_chamber(
        &self,
        sources: &[String],
        threshold: f64,
    ) -> Result<EchoChamberAnalysis> {
        let diversity = self.analyze_source_diversity(sources)?;
        let balance = diversity.political_balance;
        let total = balance.total();

        let mut is_echo_chamber = false;
        let mut echo_chamber_type = EchoChamberType::Balanced;
        let mut distribution = PoliticalDistribution::default();

        if total > 0 {
            let left_ratio = balance.left as f64 / total as f64;
            let right_ratio = balance.right as f64 / total as f64;
            let center_ratio = balance.center as f64 / total as f64;

            if left_ratio > 0.7 {
                is_echo_chamber = true;
                echo_chamber_type = EchoChamberType::LeftLeaning;
            } else if right_ratio > 0.7 {
                is_echo_chamber = true;
                echo_chamber_type = EchoChamberType::RightLeaning;
            } else if center_ratio > 0.9 {
                echo_chamber_type = EchoChamberType::CenterFocused;
            }

            if diversity.diversity_score < threshold {
                is_echo_chamber = true;
            }

            distribution = PoliticalDistribution {
                left_ratio: round3(left_ratio),
                center_ratio: round3(center_ratio),
                right_ratio: round3(right_ratio),
            };
        }

        Ok(EchoChamberAnalysis {
            is_echo_chamber,
            echo_chamber_type,
            diversity_score: diversity.diversity_score,
            political_distribution: distribution,
            recommendations: balance_recommendations(&balance),
        })
    }

    /// Diversity + echo-chamber analysis over the distinct sources in a
    /// stats window.
    pub fn bias_summary(&self, stats: &ConsumptionStats) -> Result<BiasSummary> {
        let sources: Vec<String> = stats
            .activities_by_source
            .iter()
            .map(|(source, _)| source.clone())
            .collect();

        let diversity = self.analyze_source_diversity(&sources)?;
        let echo_chamber = self.detect_echo_chamber(&sources, DEFAULT_DIVERSITY_FLOOR)?;

        let overall_bias_score = diversity.average_bias;
        let credibility_score = if sources.is_empty() {
            // Neutral prior: nothing has been classified yet.
            0.5
        } else {
            diversity.average_credibility
        };

        Ok(BiasSummary {
            period_days: stats.period_days,
            sources_analyzed: sources.len(),
            sources_used: sources,
            diversity,
            echo_chamber,
            overall_bias_score,
            credibility_score,
        })
    }
}

/// Text hints for correcting an unbalanced source mix.
fn balance_recommendations(balance: &PoliticalBalance) -> Vec<String> {
    let total = balance.total();
    if total == 0 {
        return vec!["Start reading news from diverse sources".to_string()];
    }

    let mut recommendations = Vec::new();
    let left_ratio = balance.left as f64 / total as f64;
    let right_ratio = balance.right as f64 / total as f64;
    let center_ratio = balance.center as f64 / total as f64;

    if left_ratio > 0.6 {
        recommendations.push("Consider reading more centrist and conservative sources".to_string());
        recommendations.push("Try: Reuters, AP News, Wall Street Journal".to_string());
    } else if right_ratio > 0.6 {
        recommendations.push("Consider reading more centrist and liberal sources".to_string());
        recommendations.push("Try: Reuters, AP News, NPR, BBC".to_string());
    } else if center_ratio > 0.8 {
        recommendations.push(
            "Consider reading diverse perspectives from different political viewpoints".to_string(),
        );
        recommendations.push(
            "Try mixing sources like Guardian (left), WSJ (right), and Reuters (center)"
                .to_string(),
        );
    }

    if balance.left == balance.center && balance.center == balance.right && total < 3 {
        recommendations
            .push("Try reading from at least 3-5 different sources for better coverage".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;

    fn classifier(store: &SqliteStore) -> BiasClassifier<'_, SqliteStore> {
        BiasClassifier::new(store).unwrap()
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "CNN",
            "theguardian.com",
            "  The-Guardian  ",
            "usa-today.com",
            "bbc.co.uk",
            "example.net.au",
            "associated-press",
            "",
            "unknown-source",
        ];
        for input in inputs {
            let once = normalize_source(input);
            assert_eq!(normalize_source(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn normalization_collapses_variants() {
        assert_eq!(normalize_source("theguardian.com"), "guardian");
        assert_eq!(normalize_source("The-New-York-Times"), "nytimes");
        assert_eq!(normalize_source("wall-street-journal"), "wsj");
        assert_eq!(normalize_source("bbc.co.uk"), "bbc");
        assert_eq!(normalize_source("usa-today"), "usatoday");
    }

    #[test]
    fn known_source_scores() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let cnn = classifier.get_source_bias("cnn").unwrap();
        assert_eq!(cnn.bias, -0.4);
        assert_eq!(cnn.credibility, 0.7);

        // Variant spellings resolve to the same classification.
        let guardian = classifier.get_source_bias("The-Guardian").unwrap();
        assert_eq!(guardian.bias, -0.6);
    }

    #[test]
    fn unknown_source_falls_back_to_neutral_without_caching() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let score = classifier.get_source_bias("unknown-source").unwrap();
        assert_eq!(score, SourceScore::NEUTRAL);

        use crate::db::AnalyticsRepository;
        assert!(store.get_source_analysis("unknown-source").unwrap().is_none());
    }

    #[test]
    fn diversity_of_two_neutral_wires_is_zero() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let analysis = classifier
            .analyze_source_diversity(&sources(&["reuters", "ap"]))
            .unwrap();
        assert_eq!(analysis.diversity_score, 0.0);
        assert_eq!(analysis.political_balance.left, 0);
        assert_eq!(analysis.political_balance.center, 2);
        assert_eq!(analysis.political_balance.right, 0);
    }

    #[test]
    fn balance_counts_sum_to_source_count() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let list = sources(&["cnn", "foxnews", "reuters", "guardian", "nobody-knows"]);
        let analysis = classifier.analyze_source_diversity(&list).unwrap();
        assert_eq!(analysis.political_balance.total(), list.len());
        assert!(analysis.diversity_score >= 0.0 && analysis.diversity_score <= 1.0);
    }

    #[test]
    fn empty_source_list_yields_zeroed_analysis() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let analysis = classifier.analyze_source_diversity(&[]).unwrap();
        assert_eq!(analysis.source_count, 0);
        assert_eq!(analysis.diversity_score, 0.0);
        assert_eq!(analysis.average_credibility, 0.0);
        assert!(analysis.bias_distribution.is_none());
    }

    #[test]
    fn one_sided_mix_is_an_echo_chamber() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let analysis = classifier
            .detect_echo_chamber(
                &sources(&["cnn", "msnbc", "huffpost", "guardian"]),
                DEFAULT_DIVERSITY_FLOOR,
            )
            .unwrap();
        assert!(analysis.is_echo_chamber);
        assert_eq!(analysis.echo_chamber_type, EchoChamberType::LeftLeaning);
    }

    #[test]
    fn balanced_mix_is_not_an_echo_chamber() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let analysis = classifier
            .detect_echo_chamber(
                &sources(&["cnn", "reuters", "wsj", "bbc"]),
                DEFAULT_DIVERSITY_FLOOR,
            )
            .unwrap();
        assert!(!analysis.is_echo_chamber);
        assert_eq!(analysis.echo_chamber_type, EchoChamberType::Balanced);
    }

    #[test]
    fn all_center_mix_is_center_focused() {
        let store = SqliteStore::open_in_memory().unwrap();
        let classifier = classifier(&store);

        let analysis = classifier
            .detect_echo_chamber(
                &sources(&["reuters", "ap", "bloomberg"]),
                DEFAULT_DIVERSITY_FLOOR,
            )
            .unwrap();
        // Zero spread across an all-center mix trips the diversity floor.
        assert!(analysis.is_echo_chamber);
        assert_eq!(analysis.echo_chamber_type, EchoChamberType::CenterFocused);
    }
}
