use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotParams {
    /// Window size the pivot rule evaluates.
    pub window: usize,
    /// Mean latency below this counts as fast mastery (seconds).
    pub fast_track_secs: f64,
    /// Mean latency above this counts as struggling (seconds).
    pub normal_max_secs: f64,
    /// Minimum direct attempts before the pivot rule may fire.
    pub min_attempts: u32,
}

impl Default for PivotParams {
    fn default() -> Self {
        Self {
            window: 3,
            fast_track_secs: 30.0,
            normal_max_secs: 90.0,
            min_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceParams {
    pub fast_secs: f64,
    pub slow_secs: f64,
    pub correct_fast: i32,
    pub correct_mid: i32,
    pub correct_slow: i32,
    pub hard_bonus: i32,
    pub easy_discount: i32,
    pub wrong_fast: i32,
    pub wrong_mid: i32,
    pub wrong_slow: i32,
    pub easy_failure_penalty: i32,
    /// Confidence at or above this triggers auto-promotion.
    pub auto_promote_at: i32,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            fast_secs: 30.0,
            slow_secs: 90.0,
            correct_fast: 15,
            correct_mid: 10,
            correct_slow: 5,
            hard_bonus: 5,
            easy_discount: 3,
            wrong_fast: 10,
            wrong_mid: 12,
            wrong_slow: 15,
            easy_failure_penalty: 5,
            auto_promote_at: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceParams {
    /// Source topic must be at least this confident to propagate.
    pub min_confidence: i32,
    /// Source topic must have at least this many direct attempts.
    pub min_attempts: u32,
    /// A Medium source needs this much confidence to seed Medium (else Easy).
    pub medium_source_confidence: i32,
    pub hard_source_cap: i32,
    pub hard_source_discount: i32,
    pub medium_source_cap: i32,
    pub medium_source_discount: i32,
    pub easy_source_cap: i32,
    pub easy_source_discount: i32,
    /// Direct attempts after which an inferred marker is cleared.
    pub direct_clear_attempts: u32,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            min_confidence: 70,
            min_attempts: 3,
            medium_source_confidence: 75,
            hard_source_cap: 60,
            hard_source_discount: 20,
            medium_source_cap: 55,
            medium_source_discount: 25,
            easy_source_cap: 50,
            easy_source_discount: 30,
            direct_clear_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationParams {
    pub min_total_answers: u32,
    pub min_direct_topics: usize,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            min_total_answers: 30,
            min_direct_topics: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub pivot: PivotParams,
    pub confidence: ConfidenceParams,
    pub inference: InferenceParams,
    pub calibration: CalibrationParams,
    /// Safety net: this many consecutive wrong answers forces a demotion.
    pub safety_net_wrong_streak: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            pivot: PivotParams::default(),
            confidence: ConfidenceParams::default(),
            inference: InferenceParams::default(),
            calibration: CalibrationParams::default(),
            safety_net_wrong_streak: 3,
        }
    }
}

impl CalibrationConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CALIB_AUTO_PROMOTE_AT") {
            config.confidence.auto_promote_at =
                val.parse().unwrap_or(config.confidence.auto_promote_at);
        }
        if let Ok(val) = std::env::var("CALIB_MIN_TOTAL_ANSWERS") {
            config.calibration.min_total_answers =
                val.parse().unwrap_or(config.calibration.min_total_answers);
        }
        if let Ok(val) = std::env::var("CALIB_MIN_DIRECT_TOPICS") {
            config.calibration.min_direct_topics =
                val.parse().unwrap_or(config.calibration.min_direct_topics);
        }
        if let Ok(val) = std::env::var("CALIB_INFERENCE_MIN_CONFIDENCE") {
            config.inference.min_confidence =
                val.parse().unwrap_or(config.inference.min_confidence);
        }

        config
    }
}
