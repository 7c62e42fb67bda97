use std::collections::HashSet;

use crate::analyzers::bias::{BiasClassifier, DEFAULT_DIVERSITY_FLOOR};
use crate::analyzers::ALL_TOPICS;
use crate::db::{AnalyticsRepository, ConsumptionStats};
use crate::error::Result;
use crate::types::{
    ComprehensiveRecommendations, DiversityAnalysis, HabitRecommendation, SourceRecommendation,
    SourceRecommendations, TopicRecommendation, TopicRecommendations,
};

type Candidate = (&'static str, &'static str, f64, f64, &'static str);

/// Diverse, credible starting mix for users with no source history.
const STARTER_SOURCES: &[Candidate] = &[
    ("reuters", "Highly credible and politically neutral", 0.0, 0.9, "neutral"),
    ("ap", "Trusted wire service with minimal bias", 0.0, 0.9, "neutral"),
    ("bbc", "International perspective with high credibility", -0.1, 0.8, "international"),
    ("npr", "In-depth analysis with slight left lean", -0.2, 0.8, "analysis"),
    ("wsj", "Business focus with slight right lean", 0.3, 0.9, "business"),
];

const LEFT_BALANCE: &[Candidate] = &[
    ("guardian", "Quality left-leaning international coverage", -0.6, 0.8, "left-balance"),
    ("npr", "In-depth left-leaning analysis", -0.2, 0.8, "left-balance"),
];

const RIGHT_BALANCE: &[Candidate] = &[
    ("wsj", "High-quality right-leaning business news", 0.3, 0.9, "right-balance"),
    ("nypost", "Popular right-leaning perspective", 0.5, 0.6, "right-balance"),
];

const CENTER_BALANCE: &[Candidate] = &[
    ("reuters", "Neutral, fact-focused reporting", 0.0, 0.9, "center-balance"),
    ("ap", "Unbiased wire service", 0.0, 0.9, "center-balance"),
];

const HIGH_CREDIBILITY: &[Candidate] = &[
    ("reuters", "Exceptional credibility and fact-checking", 0.0, 0.9, "high-credibility"),
    ("ap", "Rigorous journalistic standards", 0.0, 0.9, "high-credibility"),
    ("wsj", "High-quality business journalism", 0.3, 0.9, "high-credibility"),
    ("nytimes", "Thorough investigative reporting", -0.4, 0.9, "high-credibility"),
    ("bbc", "International standards and fact-checking", -0.1, 0.8, "high-credibility"),
];

const TOPIC_EXPLANATIONS: &[(&str, &str)] = &[
    ("business", "Stay informed about economic trends and market developments"),
    ("entertainment", "Discover cultural trends and entertainment industry news"),
    ("general", "Get broad coverage of current events and breaking news"),
    ("health", "Learn about medical breakthroughs and health policy updates"),
    ("science", "Explore scientific discoveries and technological innovations"),
    ("sports", "Follow major sporting events and athlete stories"),
    ("technology", "Keep up with tech developments and digital transformation"),
];

fn to_recommendation(candidate: &Candidate) -> SourceRecommendation {
    SourceRecommendation {
        source: candidate.0.to_string(),
        reason: candidate.1.to_string(),
        bias: candidate.2,
        credibility: candidate.3,
        category: candidate.4.to_string(),
    }
}

/// Produces source/topic/habit recommendations that correct imbalances
/// detected by the classifier over the user's history.
pub struct Recommender<'a, R: AnalyticsRepository> {
    repo: &'a R,
    classifier: &'a BiasClassifier<'a, R>,
}

impl<'a, R: AnalyticsRepository> Recommender<'a, R> {
    pub fn new(repo: &'a R, classifier: &'a BiasClassifier<'a, R>) -> Self {
        Recommender { repo, classifier }
    }

    /// Sources to add for better diversity and credibility. Users without
    /// history get a fixed starter pack.
    pub fn source_recommendations(&self, days: i64, limit: usize) -> Result<SourceRecommendations> {
        let stats = self.repo.query_stats(days)?;
        let current: Vec<String> = stats
            .activities_by_source
            .iter()
            .map(|(source, _)| source.clone())
            .collect();

        if current.is_empty() {
            return Ok(starter_recommendations());
        }

        let diversity = self.classifier.analyze_source_diversity(&current)?;
        let echo_chamber = self
            .classifier
            .detect_echo_chamber(&current, DEFAULT_DIVERSITY_FLOOR)?;

        let mut candidates = balance_candidates(&diversity);
        if diversity.average_credibility < 0.8 {
            candidates.extend(HIGH_CREDIBILITY.iter().map(to_recommendation));
        }

        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut recommendations = Vec::new();
        for rec in candidates {
            if !seen.contains(rec.source.as_str()) && !current_set.contains(rec.source.as_str()) {
                seen.insert(rec.source.clone());
                recommendations.push(rec);
                if recommendations.len() >= limit {
                    break;
                }
            }
        }

        let improvement_potential =
            self.improvement_potential(&current, &recommendations, diversity.diversity_score)?;
        let rationale = recommendation_rationale(&diversity, &echo_chamber);

        Ok(SourceRecommendations {
            recommendations,
            current_diversity_score: diversity.diversity_score,
            echo_chamber_risk: echo_chamber.is_echo_chamber,
            improvement_potential,
            rationale,
        })
    }

    /// Diversity gained by adopting the recommendations, clamped to [0, 1].
    fn improvement_potential(
        &self,
        current: &[String],
        recommended: &[SourceRecommendation],
        current_score: f64,
    ) -> Result<f64> {
        if recommended.is_empty() {
            return Ok(0.0);
        }
        let mut potential: Vec<String> = current.to_vec();
        potential.extend(recommended.iter().map(|r| r.source.clone()));
        let potential_score = self
            .classifier
            .analyze_source_diversity(&potential)?
            .diversity_score;
        Ok((potential_score - current_score).clamp(0.0, 1.0))
    }

    /// Topics not yet explored; once everything has been touched, the
    /// least-used topics come back as deepening suggestions.
    pub fn topic_recommendations(&self, days: i64, limit: usize) -> Result<TopicRecommendations> {
        let stats = self.repo.query_stats(days)?;
        let explored: Vec<String> = stats
            .activities_by_topic
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect();
        let explored_set: HashSet<&str> = explored.iter().map(String::as_str).collect();

        let mut recommendations: Vec<TopicRecommendation> = ALL_TOPICS
            .iter()
            .filter(|topic| !explored_set.contains(**topic))
            .take(limit)
            .map(|topic| TopicRecommendation {
                topic: topic.to_string(),
                reason: topic_explanation(topic),
                category: "topic-expansion".to_string(),
            })
            .collect();

        if recommendations.is_empty() && !explored.is_empty() {
            let mut by_usage = stats.activities_by_topic.clone();
            by_usage.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            recommendations = by_usage
                .iter()
                .filter(|(_, count)| *count < 3)
                .take(limit)
                .map(|(topic, count)| TopicRecommendation {
                    topic: topic.clone(),
                    reason: format!(
                        "You've only searched this {} times - explore more depth",
                        count
                    ),
                    category: "topic-deepening".to_string(),
                })
                .collect();
        }

        let rationale = topic_rationale(explored.len());
        Ok(TopicRecommendations {
            topic_coverage: format!("{}/{} topics explored", explored.len(), ALL_TOPICS.len()),
            recommendations,
            explored_topics: explored,
            rationale,
        })
    }

    /// Sources + topics + habits, combined into one balance score and a
    /// prioritized action list.
    pub fn comprehensive_recommendations(
        &self,
        days: i64,
    ) -> Result<ComprehensiveRecommendations> {
        let source_recommendations = self.source_recommendations(days, 5)?;
        let topic_recommendations = self.topic_recommendations(days, 5)?;
        let stats = self.repo.query_stats(days)?;

        let habit_recommendations = habit_recommendations(&stats);

        let topic_coverage =
            topic_recommendations.explored_topics.len() as f64 / ALL_TOPICS.len() as f64;
        let echo_penalty = if source_recommendations.echo_chamber_risk {
            0.3
        } else {
            0.0
        };
        let overall_score = (source_recommendations.current_diversity_score * 0.5
            + topic_coverage * 0.3
            + (1.0 - echo_penalty) * 0.2)
            .clamp(0.0, 1.0);

        let mut priority_actions = Vec::new();
        if source_recommendations.echo_chamber_risk {
            priority_actions
                .push("Break out of echo chamber by reading recommended sources".to_string());
        }
        if source_recommendations.current_diversity_score < 0.4 {
            priority_actions
                .push("Improve source diversity by adding balanced perspectives".to_string());
        }
        if topic_coverage < 0.5 {
            priority_actions.push("Explore more news topics for well-rounded awareness".to_string());
        }
        if priority_actions.is_empty() {
            priority_actions
                .push("Continue maintaining balanced news consumption habits".to_string());
        }

        Ok(ComprehensiveRecommendations {
            source_recommendations,
            topic_recommendations,
            habit_recommendations,
            overall_score,
            priority_actions,
        })
    }
}

fn starter_recommendations() -> SourceRecommendations {
    SourceRecommendations {
        recommendations: STARTER_SOURCES.iter().map(to_recommendation).collect(),
        current_diversity_score: 0.0,
        echo_chamber_risk: false,
        improvement_potential: 1.0,
        rationale: "Starting with diverse, credible sources for balanced news consumption"
            .to_string(),
    }
}

/// Candidates for whichever political wings are under-represented.
fn balance_candidates(diversity: &DiversityAnalysis) -> Vec<SourceRecommendation> {
    let balance = diversity.political_balance;
    let total = balance.total();
    if total == 0 {
        return Vec::new();
    }

    let total = total as f64;
    let mut candidates = Vec::new();
    if (balance.left as f64 / total) < 0.2 {
        candidates.extend(LEFT_BALANCE.iter().map(to_recommendation));
    }
    if (balance.right as f64 / total) < 0.2 {
        candidates.extend(RIGHT_BALANCE.iter().map(to_recommendation));
    }
    if (balance.center as f64 / total) < 0.3 {
        candidates.extend(CENTER_BALANCE.iter().map(to_recommendation));
    }
    candidates
}

fn recommendation_rationale(
    diversity: &DiversityAnalysis,
    echo_chamber: &crate::types::EchoChamberAnalysis,
) -> String {
    let score = diversity.diversity_score;
    if score < 0.3 {
        format!(
            "Your current news sources show low diversity (score: {:.2}). \
             These recommendations will help you access different perspectives.",
            score
        )
    } else if echo_chamber.is_echo_chamber {
        format!(
            "You may be in a {} echo chamber. These sources will provide broader viewpoints.",
            echo_chamber.echo_chamber_type
        )
    } else if score < 0.6 {
        format!(
            "Your source diversity is moderate (score: {:.2}). \
             These recommendations will enhance your perspective range.",
            score
        )
    } else {
        "Your sources are well-balanced. These additional sources can further enrich your news consumption."
            .to_string()
    }
}

fn topic_explanation(topic: &str) -> String {
    TOPIC_EXPLANATIONS
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, explanation)| explanation.to_string())
        .unwrap_or_else(|| format!("Explore {} news", topic))
}

fn topic_rationale(explored: usize) -> String {
    let total = ALL_TOPICS.len();
    let ratio = explored as f64 / total as f64;
    if explored == 0 {
        "Start exploring different news topics for well-rounded awareness".to_string()
    } else if ratio < 0.5 {
        format!(
            "You've explored {} of {} topics. Broaden your interests for better coverage.",
            explored, total
        )
    } else if ratio < 0.8 {
        format!(
            "Good topic diversity! Consider exploring the remaining {} topics.",
            total - explored
        )
    } else {
        "Excellent topic coverage! Focus on deepening your understanding in areas of interest."
            .to_string()
    }
}

/// Habit hints from activity volume and command variety over the period.
fn habit_recommendations(stats: &ConsumptionStats) -> Vec<HabitRecommendation> {
    let mut recommendations = Vec::new();
    let daily_avg = stats.total_activities as f64 / stats.period_days.max(1) as f64;

    if daily_avg < 0.5 {
        recommendations.push(HabitRecommendation {
            habit: "increase_frequency".to_string(),
            suggestion: "Try reading news at least once every 2 days for better awareness"
                .to_string(),
            rationale: format!("You average {:.1} news interactions per day", daily_avg),
        });
    } else if daily_avg > 5.0 {
        recommendations.push(HabitRecommendation {
            habit: "moderate_consumption".to_string(),
            suggestion: "Consider setting specific times for news to avoid information overload"
                .to_string(),
            rationale: format!("You average {:.1} news interactions per day", daily_avg),
        });
    }

    let most_actions: Vec<&str> = stats
        .activities_by_action
        .iter()
        .take(3)
        .map(|(action, _)| action.as_str())
        .collect();

    if most_actions.contains(&"search") && !most_actions.contains(&"summary") {
        recommendations.push(HabitRecommendation {
            habit: "try_summarization".to_string(),
            suggestion: "Try the summary feature to quickly digest longer articles".to_string(),
            rationale: "You search frequently but haven't used article summarization".to_string(),
        });
    }

    if most_actions.len() < 2 {
        recommendations.push(HabitRecommendation {
            habit: "explore_features".to_string(),
            suggestion: "Explore different commands like 'sources' and 'summary' for richer experience"
                .to_string(),
            rationale: "You primarily use one type of command".to_string(),
        });
    }

    recommendations
}
