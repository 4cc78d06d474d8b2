use crate::config::ConfidenceParams;
use crate::types::Tier;

/// Per-answer confidence update, independent of the tier-transition rule.
/// Fast correct answers earn the most; slow correctness earns little.
/// A fast wrong answer reads as a careless slip, a slow one as genuine
/// struggle. Tier scales the signal: correctness at Hard says more,
/// failure at Easy says the most.
pub struct ConfidenceScorer {
    params: ConfidenceParams,
}

impl ConfidenceScorer {
    pub fn new(params: ConfidenceParams) -> Self {
        Self { params }
    }

    pub fn score(&self, current: i32, is_correct: bool, time_to_answer: f64, tier: Tier) -> i32 {
        let p = &self.params;
        let delta = if is_correct {
            let base = if time_to_answer < p.fast_secs {
                p.correct_fast
            } else if time_to_answer < p.slow_secs {
                p.correct_mid
            } else {
                p.correct_slow
            };
            match tier {
                Tier::Hard => base + p.hard_bonus,
                Tier::Easy => base - p.easy_discount,
                Tier::Medium => base,
            }
        } else {
            let base = if time_to_answer < p.fast_secs {
                -p.wrong_fast
            } else if time_to_answer > p.slow_secs {
                -p.wrong_slow
            } else {
                -p.wrong_mid
            };
            match tier {
                Tier::Easy => base - p.easy_failure_penalty,
                _ => base,
            }
        };

        (current + delta).clamp(0, 100)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ConfidenceParams::default())
    }
}
