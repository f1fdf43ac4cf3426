//! Configuration for candidate mining and question shaping
//!
//! Level 4 - Utilities and configuration

/// Thresholds for turning pool statistics into questions
#[derive(Clone, Debug, PartialEq)]
pub struct MinerConfig {
    /// Smallest share of the pool a value must cover
    pub min_ratio: f64,
    /// Largest share of the pool a value may cover
    pub max_ratio: f64,
    /// Fewest options a question may offer
    pub min_options: usize,
    /// Most options a question may offer
    pub max_options: usize,
    /// Acceptance band for name-token fallback candidates
    pub fallback_min_ratio: f64,
    pub fallback_max_ratio: f64,
    /// Weight multiplier for name-token fallback candidates
    pub fallback_discount: f64,
    /// Lower bound on the per-dish weight of AI-sourced evidence
    pub ai_confidence_floor: f64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.07,
            max_ratio: 0.65,
            min_options: 3,
            max_options: 4,
            fallback_min_ratio: 0.15,
            fallback_max_ratio: 0.85,
            fallback_discount: 0.75,
            ai_confidence_floor: 0.2,
        }
    }
}

impl MinerConfig {
    /// Set the structured acceptance band
    pub fn with_ratio_band(mut self, min_ratio: f64, max_ratio: f64) -> Self {
        self.min_ratio = min_ratio;
        self.max_ratio = max_ratio;
        self
    }

    /// Set the option count bounds
    pub fn with_option_range(mut self, min_options: usize, max_options: usize) -> Self {
        self.min_options = min_options;
        self.max_options = max_options;
        self
    }

    /// Weight applied to one dish's AI-sourced evidence
    pub fn ai_weight(&self, ai_confidence: f32) -> f64 {
        (ai_confidence as f64).min(1.0).max(self.ai_confidence_floor)
    }
}
