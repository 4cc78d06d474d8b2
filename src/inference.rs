use crate::config::InferenceParams;
use crate::types::{Assessment, SubtopicSkillProfile, Tier};

/// A conservative starting estimate for a related, unassessed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredEstimate {
    pub topic_id: String,
    pub tier: Tier,
    pub confidence: i32,
}

/// Propagates a mastered topic's estimate onto related topics that have no
/// direct evidence yet. Direct evidence always wins and is never overwritten.
pub struct InferencePropagator {
    params: InferenceParams,
}

impl InferencePropagator {
    pub fn new(params: InferenceParams) -> Self {
        Self { params }
    }

    /// True when the source profile carries enough evidence to propagate from.
    pub fn is_mastered(&self, source: &SubtopicSkillProfile) -> bool {
        source.confidence >= self.params.min_confidence
            && source.total_attempted >= self.params.min_attempts
    }

    /// Computes the estimates to apply for the given related topics.
    /// `has_direct_evidence(topic)` must report whether the target already
    /// holds a directly-assessed profile; those targets are skipped.
    pub fn propagate<F>(
        &self,
        source: &SubtopicSkillProfile,
        related: &[String],
        has_direct_evidence: F,
    ) -> Vec<InferredEstimate>
    where
        F: Fn(&str) -> bool,
    {
        if !self.is_mastered(source) {
            return Vec::new();
        }

        related
            .iter()
            .filter(|topic| !has_direct_evidence(topic.as_str()))
            .map(|topic| {
                let (tier, confidence) = self.derive(source);
                InferredEstimate {
                    topic_id: topic.clone(),
                    tier,
                    confidence,
                }
            })
            .collect()
    }

    /// One notch below the source, with a confidence haircut that deepens
    /// the further the source is from verified Hard mastery.
    fn derive(&self, source: &SubtopicSkillProfile) -> (Tier, i32) {
        let p = &self.params;
        match source.tier {
            Tier::Hard => (
                Tier::Medium,
                (source.confidence - p.hard_source_discount).min(p.hard_source_cap),
            ),
            Tier::Medium if source.confidence >= p.medium_source_confidence => (
                Tier::Medium,
                (source.confidence - p.medium_source_discount).min(p.medium_source_cap),
            ),
            _ => (
                Tier::Easy,
                (source.confidence - p.easy_source_discount).min(p.easy_source_cap),
            ),
        }
    }
}

impl Default for InferencePropagator {
    fn default() -> Self {
        Self::new(InferenceParams::default())
    }
}

/// Builds the profile an estimate materializes as. Fresh counters: an
/// inferred profile has no direct evidence until the user answers.
pub fn materialize(estimate: &InferredEstimate, source_topic: &str) -> SubtopicSkillProfile {
    let mut profile = SubtopicSkillProfile::new(estimate.topic_id.clone());
    profile.tier = estimate.tier;
    profile.confidence = estimate.confidence.clamp(0, 100);
    profile.assessment = Assessment::Inferred {
        inferred_from: source_topic.to_string(),
    };
    profile
}
