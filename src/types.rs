use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Number of recent answers retained per topic for the rapid-pivot window.
pub const RECENT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    pub fn harder(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            _ => Self::Easy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TierChange {
    Promoted,
    Demoted,
    #[default]
    Unchanged,
}

/// Ordered diagnostic phases; the engine only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticPhase {
    #[default]
    SeedMission,
    Calibrating,
    Complete,
}

impl DiagnosticPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedMission => "seed-mission",
            Self::Calibrating => "calibrating",
            Self::Complete => "complete",
        }
    }
}

/// How a topic's tier was established: earned from the user's own answers,
/// or propagated from a confidently mastered related topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Assessment {
    #[default]
    Direct,
    #[serde(rename_all = "camelCase")]
    Inferred {
        inferred_from: String,
    },
}

impl Assessment {
    pub fn is_inferred(&self) -> bool {
        matches!(self, Self::Inferred { .. })
    }
}

/// One observed answer, as kept in the per-topic recent window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnswer {
    pub is_correct: bool,
    pub time_to_answer: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtopicSkillProfile {
    pub topic_id: String,
    pub tier: Tier,
    pub total_attempted: u32,
    pub total_correct: u32,
    /// Running mean of per-answer latency, seconds.
    pub average_speed: f64,
    /// Heuristic trust in the current tier, clamped to [0, 100].
    pub confidence: i32,
    pub consecutive_correct: u32,
    pub consecutive_wrong: u32,
    pub last_answer_ts: i64,
    pub assessment: Assessment,
    /// Last `RECENT_WINDOW` observed answers, oldest first.
    #[serde(default)]
    pub recent: VecDeque<RecentAnswer>,
}

impl SubtopicSkillProfile {
    pub fn new(topic_id: impl Into<String>) -> Self {
        Self {
            topic_id: topic_id.into(),
            tier: Tier::Medium,
            total_attempted: 0,
            total_correct: 0,
            average_speed: 0.0,
            confidence: 50,
            consecutive_correct: 0,
            consecutive_wrong: 0,
            last_answer_ts: 0,
            assessment: Assessment::Direct,
            recent: VecDeque::with_capacity(RECENT_WINDOW),
        }
    }

    pub fn accuracy_ratio(&self) -> f64 {
        if self.total_attempted == 0 {
            return 0.0;
        }
        self.total_correct as f64 / self.total_attempted as f64
    }

    /// Directly assessed means at least one answer came from the user, not
    /// from inference propagation.
    pub fn is_directly_assessed(&self) -> bool {
        self.total_attempted > 0 && !self.assessment.is_inferred()
    }

    pub fn push_recent(&mut self, answer: RecentAnswer) {
        self.recent.push_back(answer);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.pop_front();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillProfile {
    pub topics: HashMap<String, SubtopicSkillProfile>,
    pub phase: DiagnosticPhase,
    pub seed_mission_completed: bool,
    pub total_questions_answered: u32,
    pub last_updated: i64,
}

impl Default for UserSkillProfile {
    fn default() -> Self {
        Self {
            topics: HashMap::new(),
            phase: DiagnosticPhase::SeedMission,
            seed_mission_completed: false,
            total_questions_answered: 0,
            last_updated: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl UserSkillProfile {
    pub fn calibration_complete(&self) -> bool {
        self.phase == DiagnosticPhase::Complete
    }

    pub fn directly_assessed_count(&self) -> usize {
        self.topics
            .values()
            .filter(|p| p.is_directly_assessed())
            .count()
    }
}

/// One answer event from the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub topic_id: String,
    pub is_correct: bool,
    /// Seconds; negative values are clamped to zero on ingestion.
    pub time_to_answer: f64,
    pub tier_at_answer: Tier,
    pub ts: i64,
}

impl Default for AnswerRecord {
    fn default() -> Self {
        Self {
            topic_id: String::new(),
            is_correct: true,
            time_to_answer: 20.0,
            tier_at_answer: Tier::Medium,
            ts: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// What one pipeline pass changed, for the caller to render or persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub profile: SubtopicSkillProfile,
    pub tier_change: TierChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tier: Option<Tier>,
    pub inferred_topics: Vec<String>,
    pub confidence_delta: i32,
    pub phase: DiagnosticPhase,
}
