//! Integration tests for the answer-ingestion pipeline: the four scenario
//! walkthroughs plus ordering, inference, and query behavior.

use std::sync::Arc;

use skill_calibration::store::{InMemoryProfileStore, ProfileStore};
use skill_calibration::types::{
    AnswerRecord, Assessment, DiagnosticPhase, SubtopicSkillProfile, Tier, TierChange,
    UserSkillProfile,
};
use skill_calibration::{CalibrationConfig, CalibrationEngine, TopicRelations};

const FIXED_TIMESTAMP: i64 = 1_700_000_000_000;

const ALGEBRA: &str = "Algebra: Linear Functions";
const COORD_GEO: &str = "Coordinate Geometry: Lines and Slopes";

fn engine() -> CalibrationEngine {
    CalibrationEngine::new(CalibrationConfig::default(), TopicRelations::default())
}

fn engine_with_relations() -> CalibrationEngine {
    let mut relations = TopicRelations::new();
    relations.insert(ALGEBRA, vec![COORD_GEO.to_string()]);
    CalibrationEngine::new(CalibrationConfig::default(), relations)
}

fn answer(topic: &str, is_correct: bool, time_to_answer: f64, tier: Tier) -> AnswerRecord {
    AnswerRecord {
        topic_id: topic.to_string(),
        is_correct,
        time_to_answer,
        tier_at_answer: tier,
        ts: FIXED_TIMESTAMP,
    }
}

#[test]
fn scenario_a_three_fast_correct_promote_medium_to_hard() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    let r1 = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 20.0, Tier::Medium));
    assert_eq!(r1.tier_change, TierChange::Unchanged);
    let r2 = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 22.0, Tier::Medium));
    assert_eq!(r2.tier_change, TierChange::Unchanged);

    let r3 = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 18.0, Tier::Medium));
    assert_eq!(r3.tier_change, TierChange::Promoted);
    assert_eq!(r3.new_tier, Some(Tier::Hard));
    assert_eq!(profile.topics[ALGEBRA].tier, Tier::Hard);
}

#[test]
fn scenario_b_safety_net_demotes_and_resets_wrong_streak() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    engine.process_answer(&mut profile, &answer(ALGEBRA, false, 40.0, Tier::Medium));
    engine.process_answer(&mut profile, &answer(ALGEBRA, false, 40.0, Tier::Medium));
    assert_eq!(profile.topics[ALGEBRA].consecutive_wrong, 2);

    let r3 = engine.process_answer(&mut profile, &answer(ALGEBRA, false, 40.0, Tier::Medium));
    assert_eq!(r3.tier_change, TierChange::Demoted);
    assert_eq!(r3.new_tier, Some(Tier::Easy));
    let topic = &profile.topics[ALGEBRA];
    assert_eq!(topic.tier, Tier::Easy);
    assert_eq!(topic.consecutive_wrong, 0);
}

#[test]
fn scenario_c_mastered_hard_topic_seeds_related_medium_profile() {
    let engine = engine_with_relations();
    let mut profile = UserSkillProfile::default();

    // A Hard topic sitting just under the mastery gate.
    let mut source = SubtopicSkillProfile::new(ALGEBRA);
    source.tier = Tier::Hard;
    source.confidence = 52;
    source.total_attempted = 3;
    source.total_correct = 3;
    profile.topics.insert(ALGEBRA.to_string(), source);

    // Fast correct at Hard: +20 confidence, reaching 72 with 4 attempts.
    let result = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 25.0, Tier::Hard));
    assert_eq!(profile.topics[ALGEBRA].confidence, 72);
    assert_eq!(result.inferred_topics, vec![COORD_GEO.to_string()]);

    let inferred = &profile.topics[COORD_GEO];
    assert_eq!(inferred.tier, Tier::Medium);
    assert!(inferred.confidence <= 52);
    assert_eq!(
        inferred.assessment,
        Assessment::Inferred {
            inferred_from: ALGEBRA.to_string()
        }
    );
    assert_eq!(inferred.total_attempted, 0);
}

#[test]
fn scenario_d_thirtieth_answer_on_tenth_topic_completes_calibration() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();
    profile.seed_mission_completed = true;
    profile.phase = DiagnosticPhase::Calibrating;
    profile.total_questions_answered = 29;
    for i in 0..9 {
        let mut topic = SubtopicSkillProfile::new(format!("topic-{i}"));
        topic.total_attempted = 3;
        topic.total_correct = 2;
        profile.topics.insert(topic.topic_id.clone(), topic);
    }

    let result = engine.process_answer(&mut profile, &answer("topic-9", true, 30.0, Tier::Medium));
    assert_eq!(profile.total_questions_answered, 30);
    assert_eq!(profile.directly_assessed_count(), 10);
    assert_eq!(result.phase, DiagnosticPhase::Complete);
    assert!(profile.calibration_complete());
}

#[test]
fn scenario_d_one_short_stays_calibrating() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();
    profile.seed_mission_completed = true;
    profile.phase = DiagnosticPhase::Calibrating;
    profile.total_questions_answered = 28;
    for i in 0..9 {
        let mut topic = SubtopicSkillProfile::new(format!("topic-{i}"));
        topic.total_attempted = 3;
        topic.total_correct = 2;
        profile.topics.insert(topic.topic_id.clone(), topic);
    }

    // 29th answer lands on an existing topic: still 9 direct topics short of 10.
    let result = engine.process_answer(&mut profile, &answer("topic-0", true, 30.0, Tier::Medium));
    assert_eq!(result.phase, DiagnosticPhase::Calibrating);
}

#[test]
fn unknown_topic_starts_at_medium_with_midline_confidence() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    let result = engine.process_answer(&mut profile, &answer("brand-new", false, 40.0, Tier::Medium));
    let topic = &profile.topics["brand-new"];
    assert_eq!(topic.total_attempted, 1);
    assert_eq!(topic.tier, Tier::Medium);
    // Fresh confidence 50, one mid-speed wrong answer: -12.
    assert_eq!(topic.confidence, 38);
    assert_eq!(result.confidence_delta, -12);
}

#[test]
fn negative_latency_is_clamped_to_zero() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    engine.process_answer(&mut profile, &answer(ALGEBRA, true, -5.0, Tier::Medium));
    let topic = &profile.topics[ALGEBRA];
    assert_eq!(topic.average_speed, 0.0);
    // Clamped to 0 s, read as a fast correct answer.
    assert_eq!(topic.confidence, 65);
}

#[test]
fn streaks_reset_on_opposite_outcome() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    engine.process_answer(&mut profile, &answer(ALGEBRA, true, 40.0, Tier::Medium));
    engine.process_answer(&mut profile, &answer(ALGEBRA, true, 40.0, Tier::Medium));
    assert_eq!(profile.topics[ALGEBRA].consecutive_correct, 2);

    engine.process_answer(&mut profile, &answer(ALGEBRA, false, 40.0, Tier::Medium));
    let topic = &profile.topics[ALGEBRA];
    assert_eq!(topic.consecutive_correct, 0);
    assert_eq!(topic.consecutive_wrong, 1);
}

#[test]
fn average_speed_is_an_incremental_mean() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    engine.process_answer(&mut profile, &answer(ALGEBRA, true, 40.0, Tier::Medium));
    engine.process_answer(&mut profile, &answer(ALGEBRA, false, 60.0, Tier::Medium));
    engine.process_answer(&mut profile, &answer(ALGEBRA, true, 50.0, Tier::Medium));
    assert!((profile.topics[ALGEBRA].average_speed - 50.0).abs() < 1e-9);
}

#[test]
fn direct_evidence_is_never_overwritten_by_inference() {
    let engine = engine_with_relations();
    let mut profile = UserSkillProfile::default();

    // Directly-assessed related topic with its own (weak) record.
    let mut target = SubtopicSkillProfile::new(COORD_GEO);
    target.tier = Tier::Easy;
    target.confidence = 30;
    target.total_attempted = 1;
    profile.topics.insert(COORD_GEO.to_string(), target);

    let mut source = SubtopicSkillProfile::new(ALGEBRA);
    source.tier = Tier::Hard;
    source.confidence = 80;
    source.total_attempted = 5;
    source.total_correct = 5;
    profile.topics.insert(ALGEBRA.to_string(), source);

    let result = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 20.0, Tier::Hard));
    assert!(result.inferred_topics.is_empty());
    let target = &profile.topics[COORD_GEO];
    assert_eq!(target.tier, Tier::Easy);
    assert_eq!(target.confidence, 30);
}

#[test]
fn inferred_marker_clears_after_three_direct_answers() {
    let engine = engine_with_relations();
    let mut profile = UserSkillProfile::default();

    // Master the source: three fast correct answers auto-promote and seed
    // the related topic as inferred.
    for t in [20.0, 22.0, 18.0] {
        engine.process_answer(&mut profile, &answer(ALGEBRA, true, t, Tier::Medium));
    }
    assert!(profile.topics[COORD_GEO].assessment.is_inferred());

    engine.process_answer(&mut profile, &answer(COORD_GEO, true, 40.0, Tier::Medium));
    engine.process_answer(&mut profile, &answer(COORD_GEO, false, 40.0, Tier::Medium));
    assert!(profile.topics[COORD_GEO].assessment.is_inferred());

    engine.process_answer(&mut profile, &answer(COORD_GEO, true, 40.0, Tier::Medium));
    assert_eq!(profile.topics[COORD_GEO].assessment, Assessment::Direct);
}

#[test]
fn single_answer_never_moves_tier_more_than_one_step() {
    let engine = engine();
    let mut profile = UserSkillProfile::default();

    // Saturated confidence at Easy: auto-promote fires, but only one step.
    let mut topic = SubtopicSkillProfile::new(ALGEBRA);
    topic.tier = Tier::Easy;
    topic.confidence = 99;
    topic.total_attempted = 10;
    topic.total_correct = 10;
    profile.topics.insert(ALGEBRA.to_string(), topic);

    let result = engine.process_answer(&mut profile, &answer(ALGEBRA, true, 10.0, Tier::Easy));
    assert_eq!(result.tier_change, TierChange::Promoted);
    assert_eq!(profile.topics[ALGEBRA].tier, Tier::Medium);
}

#[test]
fn recommended_difficulty_prefers_existing_profile() {
    let engine = engine_with_relations();
    let mut profile = UserSkillProfile::default();
    let mut topic = SubtopicSkillProfile::new(ALGEBRA);
    topic.tier = Tier::Hard;
    profile.topics.insert(ALGEBRA.to_string(), topic);

    assert_eq!(engine.recommended_difficulty(&profile, ALGEBRA), Tier::Hard);
}

#[test]
fn recommended_difficulty_derives_from_mastered_related_topic() {
    let mut relations = TopicRelations::new();
    relations.insert(COORD_GEO, vec![ALGEBRA.to_string()]);
    let engine = CalibrationEngine::new(CalibrationConfig::default(), relations);

    let mut profile = UserSkillProfile::default();
    let mut source = SubtopicSkillProfile::new(ALGEBRA);
    source.tier = Tier::Hard;
    source.confidence = 85;
    source.total_attempted = 5;
    source.total_correct = 5;
    profile.topics.insert(ALGEBRA.to_string(), source);

    assert_eq!(engine.recommended_difficulty(&profile, COORD_GEO), Tier::Medium);
}

#[test]
fn recommended_difficulty_defaults_to_medium() {
    let engine = engine();
    let profile = UserSkillProfile::default();
    assert_eq!(
        engine.recommended_difficulty(&profile, "never-seen"),
        Tier::Medium
    );
}

#[test]
fn skill_summary_covers_all_known_topics() {
    let engine = engine_with_relations();
    let mut profile = UserSkillProfile::default();
    for t in [20.0, 22.0, 18.0] {
        engine.process_answer(&mut profile, &answer(ALGEBRA, true, t, Tier::Medium));
    }

    let summary = engine.skill_summary(&profile);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[ALGEBRA], Tier::Hard);
    assert_eq!(summary[COORD_GEO], Tier::Medium);
}

#[test]
fn process_for_user_loads_and_saves_through_the_store() {
    let store = Arc::new(InMemoryProfileStore::new());
    let engine = engine().with_store(store.clone());

    let record = answer(ALGEBRA, true, 20.0, Tier::Medium);
    engine.process_for_user("learner-1", &record).unwrap();
    engine.process_for_user("learner-1", &record).unwrap();

    let saved = store.load("learner-1").unwrap().unwrap();
    assert_eq!(saved.total_questions_answered, 2);
    assert_eq!(saved.topics[ALGEBRA].total_attempted, 2);
}

#[test]
fn process_for_user_without_store_is_an_error() {
    let engine = engine();
    let record = answer(ALGEBRA, true, 20.0, Tier::Medium);
    assert!(engine.process_for_user("learner-1", &record).is_err());
}
