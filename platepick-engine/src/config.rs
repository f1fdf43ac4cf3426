//! Engine configuration
//!
//! Level 4 - Utilities and configuration

use platepick_questions::MinerConfig;
use platepick_tournament::BracketConfig;

/// Configuration for one play-through
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Pools at or below this size skip straight to the tournament
    pub narrowing_threshold: usize,
    /// Candidate mining and question shaping
    pub miner: MinerConfig,
    /// Tournament seeding and match shapes
    pub bracket: BracketConfig,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            narrowing_threshold: 8,
            miner: MinerConfig::default(),
            bracket: BracketConfig::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the narrowing threshold
    pub fn with_narrowing_threshold(mut self, threshold: usize) -> Self {
        self.narrowing_threshold = threshold;
        self
    }

    /// Set the tournament entry cap
    pub fn with_entry_cap(mut self, entry_cap: usize) -> Self {
        self.bracket.entry_cap = entry_cap;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
