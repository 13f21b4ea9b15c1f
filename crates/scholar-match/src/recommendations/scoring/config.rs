use serde::{Deserialize, Serialize};

/// Weights for combining sub-scores, plus the deadline decay window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub qualification_weight: f64,
    pub score_threshold_weight: f64,
    pub gender_weight: f64,
    pub region_weight: f64,
    pub deadline_weight: f64,
    pub award_weight: f64,
    /// Days after the deadline at which freshness reaches zero.
    pub deadline_decay_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            qualification_weight: 0.35,
            score_threshold_weight: 0.30,
            gender_weight: 0.075,
            region_weight: 0.075,
            deadline_weight: 0.10,
            award_weight: 0.10,
            deadline_decay_days: 60,
        }
    }
}
