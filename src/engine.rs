use std::sync::Arc;

use crate::calibration::CalibrationTracker;
use crate::confidence::ConfidenceScorer;
use crate::config::CalibrationConfig;
use crate::inference::{materialize, InferencePropagator};
use crate::pivot::{PivotDecision, RapidPivot};
use crate::relations::TopicRelations;
use crate::store::{ProfileStore, StoreError};
use crate::types::{
    AnswerRecord, AnswerResult, Assessment, RecentAnswer, SubtopicSkillProfile, Tier, TierChange,
    UserSkillProfile,
};

/// Stealth skill-calibration engine. Consumes answer events, keeps per-topic
/// proficiency tiers and confidence current, propagates mastery to related
/// topics, and tracks whether enough signal has accumulated to trust itself.
///
/// Synchronous and lock-free: one `process_answer` call runs the whole
/// pipeline to completion. Callers serialize calls per user.
pub struct CalibrationEngine {
    config: CalibrationConfig,
    relations: TopicRelations,
    pivot: RapidPivot,
    confidence: ConfidenceScorer,
    inference: InferencePropagator,
    calibration: CalibrationTracker,
    store: Option<Arc<dyn ProfileStore>>,
}

impl CalibrationEngine {
    pub fn new(config: CalibrationConfig, relations: TopicRelations) -> Self {
        Self {
            pivot: RapidPivot::new(config.pivot.clone()),
            confidence: ConfidenceScorer::new(config.confidence.clone()),
            inference: InferencePropagator::new(config.inference.clone()),
            calibration: CalibrationTracker::new(config.calibration.clone()),
            config,
            relations,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Runs the full ingestion pipeline for one answer event. Never fails
    /// for a well-formed record: unknown topics become fresh profiles and
    /// negative latencies clamp to zero.
    pub fn process_answer(
        &self,
        profile: &mut UserSkillProfile,
        record: &AnswerRecord,
    ) -> AnswerResult {
        let time_to_answer = record.time_to_answer.max(0.0);

        let topic = profile
            .topics
            .entry(record.topic_id.clone())
            .or_insert_with(|| SubtopicSkillProfile::new(record.topic_id.clone()));

        topic.total_attempted += 1;
        if record.is_correct {
            topic.total_correct += 1;
            topic.consecutive_correct += 1;
            topic.consecutive_wrong = 0;
        } else {
            topic.consecutive_wrong += 1;
            topic.consecutive_correct = 0;
        }
        let n = topic.total_attempted as f64;
        topic.average_speed = ((n - 1.0) * topic.average_speed + time_to_answer) / n;
        topic.last_answer_ts = record.ts;
        topic.push_recent(RecentAnswer {
            is_correct: record.is_correct,
            time_to_answer,
        });

        let prev_confidence = topic.confidence;
        topic.confidence = self.confidence.score(
            prev_confidence,
            record.is_correct,
            time_to_answer,
            record.tier_at_answer,
        );
        let confidence_delta = topic.confidence - prev_confidence;

        let tier_change = self.decide_tier(topic);
        match tier_change {
            TierChange::Promoted => topic.tier = topic.tier.harder(),
            TierChange::Demoted => topic.tier = topic.tier.easier(),
            TierChange::Unchanged => {}
        }

        if topic.assessment.is_inferred()
            && topic.total_attempted >= self.config.inference.direct_clear_attempts
        {
            topic.assessment = Assessment::Direct;
        }

        let snapshot = topic.clone();
        if tier_change != TierChange::Unchanged {
            tracing::info!(
                topic = %snapshot.topic_id,
                tier = snapshot.tier.as_str(),
                change = ?tier_change,
                confidence = snapshot.confidence,
                "tier transition"
            );
        }

        profile.total_questions_answered += 1;

        let inferred_topics = self.propagate_inference(profile, &snapshot);

        let prev_phase = profile.phase;
        profile.phase = self.calibration.evaluate(
            profile.phase,
            profile.seed_mission_completed,
            profile.total_questions_answered,
            profile.directly_assessed_count(),
        );
        if profile.phase != prev_phase {
            tracing::info!(
                from = prev_phase.as_str(),
                to = profile.phase.as_str(),
                answered = profile.total_questions_answered,
                "calibration phase advanced"
            );
        }

        tracing::debug!(
            topic = %snapshot.topic_id,
            correct = record.is_correct,
            latency = time_to_answer,
            confidence_delta,
            "answer processed"
        );

        AnswerResult {
            new_tier: match tier_change {
                TierChange::Unchanged => None,
                _ => Some(snapshot.tier),
            },
            profile: snapshot,
            tier_change,
            inferred_topics,
            confidence_delta,
            phase: profile.phase,
        }
    }

    /// Loads, processes, and saves through the configured store: one load
    /// before and one save after the unit of work, never interleaved.
    pub fn process_for_user(
        &self,
        user_id: &str,
        record: &AnswerRecord,
    ) -> Result<AnswerResult, StoreError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StoreError::Backend("no profile store configured".to_string()))?;

        let mut profile = store.load(user_id)?.unwrap_or_default();
        let result = self.process_answer(&mut profile, record);
        store.save(user_id, &profile)?;
        Ok(result)
    }

    /// Tier transition priority: auto-promote on high confidence, then the
    /// consecutive-wrong safety net, then the rapid-pivot window rule.
    /// First matching rule wins.
    fn decide_tier(&self, topic: &mut SubtopicSkillProfile) -> TierChange {
        if topic.confidence >= self.config.confidence.auto_promote_at && topic.tier != Tier::Hard {
            return TierChange::Promoted;
        }

        if topic.consecutive_wrong >= self.config.safety_net_wrong_streak
            && topic.tier != Tier::Easy
        {
            topic.consecutive_wrong = 0;
            return TierChange::Demoted;
        }

        if topic.total_attempted >= self.config.pivot.min_attempts {
            let window: Vec<RecentAnswer> = topic.recent.iter().copied().collect();
            return match self.pivot.evaluate(&window, topic.tier) {
                PivotDecision::Promote => TierChange::Promoted,
                PivotDecision::Demote => TierChange::Demoted,
                PivotDecision::Hold => TierChange::Unchanged,
            };
        }

        TierChange::Unchanged
    }

    fn propagate_inference(
        &self,
        profile: &mut UserSkillProfile,
        source: &SubtopicSkillProfile,
    ) -> Vec<String> {
        let related = self.relations.related(&source.topic_id);
        if related.is_empty() {
            return Vec::new();
        }

        let estimates = self.inference.propagate(source, related, |topic| {
            profile
                .topics
                .get(topic)
                .map(|p| p.is_directly_assessed())
                .unwrap_or(false)
        });

        let mut touched = Vec::with_capacity(estimates.len());
        for estimate in &estimates {
            let inferred = materialize(estimate, &source.topic_id);
            profile.topics.insert(estimate.topic_id.clone(), inferred);
            touched.push(estimate.topic_id.clone());
        }

        if !touched.is_empty() {
            tracing::info!(
                source = %source.topic_id,
                targets = ?touched,
                "inference propagated"
            );
        }
        touched
    }

    /// Starting tier for a topic: its own tier when known, else a
    /// conservative derivation from any mastered related topic, else Medium.
    pub fn recommended_difficulty(&self, profile: &UserSkillProfile, topic_id: &str) -> Tier {
        if let Some(topic) = profile.topics.get(topic_id) {
            return topic.tier;
        }

        for related in self.relations.related(topic_id) {
            if let Some(source) = profile.topics.get(related) {
                if self.inference.is_mastered(source) {
                    return match source.tier {
                        Tier::Hard => Tier::Medium,
                        _ => Tier::Easy,
                    };
                }
            }
        }

        Tier::Medium
    }

    /// Current tier per known topic, for reporting.
    pub fn skill_summary(
        &self,
        profile: &UserSkillProfile,
    ) -> std::collections::HashMap<String, Tier> {
        profile
            .topics
            .iter()
            .map(|(id, topic)| (id.clone(), topic.tier))
            .collect()
    }
}

impl Default for CalibrationEngine {
    fn default() -> Self {
        Self::new(CalibrationConfig::default(), TopicRelations::default())
    }
}
