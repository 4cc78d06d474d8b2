use crate::config::PivotParams;
use crate::types::{RecentAnswer, Tier};

/// Outcome of evaluating the recent-answer window against the current tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotDecision {
    Promote,
    Demote,
    Hold,
}

/// Short-window tier controller. Promotion needs strong, fast, consistent
/// evidence (3/3 correct under the fast bound); demotion fires on mild or
/// slow evidence (at most 1/3 correct, or a slow window regardless of
/// correctness). False promotion costs more than false demotion.
pub struct RapidPivot {
    params: PivotParams,
}

impl RapidPivot {
    pub fn new(params: PivotParams) -> Self {
        Self { params }
    }

    pub fn evaluate(&self, window: &[RecentAnswer], tier: Tier) -> PivotDecision {
        if window.len() < self.params.window {
            return PivotDecision::Hold;
        }

        let correct = window.iter().filter(|a| a.is_correct).count();
        let mean_latency =
            window.iter().map(|a| a.time_to_answer).sum::<f64>() / window.len() as f64;

        if correct == window.len() && mean_latency < self.params.fast_track_secs {
            return match tier {
                Tier::Hard => PivotDecision::Hold,
                _ => PivotDecision::Promote,
            };
        }

        // Covers the 2-of-3-but-slow case at any tier, including the
        // borderline Hard profile the safe baseline would otherwise keep.
        if correct <= 1 || mean_latency > self.params.normal_max_secs {
            return match tier {
                Tier::Easy => PivotDecision::Hold,
                _ => PivotDecision::Demote,
            };
        }

        PivotDecision::Hold
    }
}

impl Default for RapidPivot {
    fn default() -> Self {
        Self::new(PivotParams::default())
    }
}
