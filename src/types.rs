use serde::Serialize;

// --- Source classification ---

/// Bias/credibility pair for a single source.
///
/// `bias` is a signed lean in [-1, 1] (negative = left, positive = right);
/// `credibility` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SourceScore {
    pub bias: f64,
    pub credibility: f64,
}

impl SourceScore {
    pub const NEUTRAL: SourceScore = SourceScore {
        bias: 0.0,
        credibility: 0.5,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PoliticalBalance {
    pub left: usize,
    pub center: usize,
    pub right: usize,
}

impl PoliticalBalance {
    pub fn total(&self) -> usize {
        self.left + self.center + self.right
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BiasDistribution {
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiversityAnalysis {
    pub diversity_score: f64,
    pub political_balance: PoliticalBalance,
    pub average_credibility: f64,
    pub average_bias: f64,
    pub source_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_distribution: Option<BiasDistribution>,
}

impl DiversityAnalysis {
    /// Zeroed result for an empty source list.
    pub fn empty() -> Self {
        DiversityAnalysis {
            diversity_score: 0.0,
            political_balance: PoliticalBalance::default(),
            average_credibility: 0.0,
            average_bias: 0.0,
            source_count: 0,
            bias_distribution: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EchoChamberType {
    LeftLeaning,
    RightLeaning,
    CenterFocused,
    Balanced,
}

impl std::fmt::Display for EchoChamberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EchoChamberType::LeftLeaning => "left-leaning",
            EchoChamberType::RightLeaning => "right-leaning",
            EchoChamberType::CenterFocused => "center-focused",
            EchoChamberType::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PoliticalDistribution {
    pub left_ratio: f64,
    pub center_ratio: f64,
    pub right_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EchoChamberAnalysis {
    pub is_echo_chamber: bool,
    pub echo_chamber_type: EchoChamberType,
    pub diversity_score: f64,
    pub political_distribution: PoliticalDistribution,
    pub recommendations: Vec<String>,
}

/// Diversity + echo-chamber analysis over the sources seen in a period.
#[derive(Debug, Clone, Serialize)]
pub struct BiasSummary {
    pub period_days: i64,
    pub sources_analyzed: usize,
    pub sources_used: Vec<String>,
    #[serde(rename = "diversity_analysis")]
    pub diversity: DiversityAnalysis,
    #[serde(rename = "echo_chamber_analysis")]
    pub echo_chamber: EchoChamberAnalysis,
    pub overall_bias_score: f64,
    pub credibility_score: f64,
}

// --- Trends ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivityTrend {
    pub direction: TrendDirection,
    pub change_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Concentration {
    pub index: f64,
    pub interpretation: ConcentrationLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    pub activity_trend: ActivityTrend,
    pub source_concentration: Concentration,
    pub topic_concentration: Concentration,
    pub action_preferences: Vec<(String, i64)>,
}

// --- Blind spots ---

#[derive(Debug, Clone, Serialize)]
pub struct BlindSpots {
    pub missing_topics: Vec<String>,
    pub underexplored_topics: Vec<(String, i64)>,
    pub perspective_gaps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_gap: Option<String>,
    pub diversity_score: f64,
    pub improvement_areas: Vec<String>,
}

// --- Health score ---

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthFactors {
    pub activity_level: f64,
    pub source_diversity: f64,
    pub topic_coverage: f64,
    pub echo_chamber: f64,
    pub credibility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthInterpretation {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthScore {
    pub overall_score: f64,
    pub interpretation: HealthInterpretation,
    pub message: String,
    pub factor_scores: HealthFactors,
    pub improvement_priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub category: String,
    pub insight: String,
    pub detail: String,
}

// --- Report assembly ---

#[derive(Debug, Clone, Serialize)]
pub struct KeyMetrics {
    pub total_activities: i64,
    pub daily_average: f64,
    pub unique_sources: usize,
    pub unique_topics: usize,
    pub most_used_action: String,
    pub most_used_source: String,
    pub most_searched_topic: String,
    pub engagement_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityConsistency {
    pub score: f64,
    pub interpretation: String,
    pub days_with_activity: usize,
    pub total_days: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionPatterns {
    pub daily_activity: Vec<(String, i64)>,
    pub peak_activity_days: Vec<String>,
    pub activity_consistency: ActivityConsistency,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceOverview {
    pub total_sources: usize,
    pub diversity_score: f64,
    pub political_balance: PoliticalBalance,
    pub echo_chamber_status: EchoChamberAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionReport {
    pub report_generated: String,
    pub period_days: i64,
    pub key_metrics: KeyMetrics,
    pub consumption_patterns: ConsumptionPatterns,
    pub source_analysis: SourceOverview,
    pub trends: TrendAnalysis,
    pub blind_spots: BlindSpots,
    pub insights: Vec<Insight>,
    pub recommendations: ComprehensiveRecommendations,
    pub health_score: HealthScore,
}

// --- Recommendations ---

#[derive(Debug, Clone, Serialize)]
pub struct SourceRecommendation {
    pub source: String,
    pub reason: String,
    pub bias: f64,
    pub credibility: f64,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceRecommendations {
    pub recommendations: Vec<SourceRecommendation>,
    pub current_diversity_score: f64,
    pub echo_chamber_risk: bool,
    pub improvement_potential: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicRecommendation {
    pub topic: String,
    pub reason: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicRecommendations {
    pub recommendations: Vec<TopicRecommendation>,
    pub explored_topics: Vec<String>,
    pub topic_coverage: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitRecommendation {
    pub habit: String,
    pub suggestion: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveRecommendations {
    pub source_recommendations: SourceRecommendations,
    pub topic_recommendations: TopicRecommendations,
    pub habit_recommendations: Vec<HabitRecommendation>,
    pub overall_score: f64,
    pub priority_actions: Vec<String>,
}
