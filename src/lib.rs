//! Stealth skill-calibration engine.
//!
//! Infers a learner's per-topic proficiency tier purely from behavioral
//! signals (correctness, answer latency) gathered during ordinary use.
//! Pure computation: no I/O inside the scoring pipeline; persistence is a
//! collaborator behind the [`store::ProfileStore`] contract.

pub mod calibration;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod inference;
pub mod pivot;
pub mod relations;
pub mod store;
pub mod types;

pub use config::CalibrationConfig;
pub use engine::CalibrationEngine;
pub use relations::TopicRelations;
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
pub use types::{
    AnswerRecord, AnswerResult, Assessment, DiagnosticPhase, SubtopicSkillProfile, Tier,
    TierChange, UserSkillProfile,
};
