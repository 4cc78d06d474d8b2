use crate::config::CalibrationParams;
use crate::types::DiagnosticPhase;

/// Monotone phase progression: seed-mission until onboarding is done,
/// calibrating until enough direct evidence has accumulated, then complete.
/// Phases never regress inside the engine.
pub struct CalibrationTracker {
    params: CalibrationParams,
}

impl CalibrationTracker {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    pub fn evaluate(
        &self,
        current: DiagnosticPhase,
        seed_mission_completed: bool,
        total_answered: u32,
        direct_topic_count: usize,
    ) -> DiagnosticPhase {
        let target = if seed_mission_completed
            && total_answered >= self.params.min_total_answers
            && direct_topic_count >= self.params.min_direct_topics
        {
            DiagnosticPhase::Complete
        } else if seed_mission_completed {
            DiagnosticPhase::Calibrating
        } else {
            DiagnosticPhase::SeedMission
        };

        current.max(target)
    }
}

impl Default for CalibrationTracker {
    fn default() -> Self {
        Self::new(CalibrationParams::default())
    }
}
