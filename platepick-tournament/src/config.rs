//! Configuration types for bracket play
//!
//! Level 4 - Utilities and configuration

/// Contenders in a four-way match
pub const QUAD_SIZE: usize = 4;

/// Contenders in a pairwise duel
pub const DUEL_SIZE: usize = 2;

/// Bracket configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BracketConfig {
    /// Largest field admitted; bigger pools are randomly sampled down
    pub entry_cap: usize,
    /// Queue length from which four-way matches are offered
    pub quad_min: usize,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            entry_cap: 34,
            quad_min: QUAD_SIZE,
        }
    }
}

impl BracketConfig {
    /// Create config with the given entry cap
    pub fn with_entry_cap(mut self, entry_cap: usize) -> Self {
        self.entry_cap = entry_cap;
        self
    }

    /// Duels only, never four-way matches
    pub fn pairwise_only() -> Self {
        Self {
            quad_min: usize::MAX,
            ..Default::default()
        }
    }

    /// Effective quad threshold (a quad always needs four contenders)
    pub fn quad_threshold(&self) -> usize {
        self.quad_min.max(QUAD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_config_defaults() {
        let config = BracketConfig::default();
        assert_eq!(config.entry_cap, 34);
        assert_eq!(config.quad_threshold(), 4);
    }

    #[test]
    fn test_quad_threshold_never_below_quad_size() {
        let config = BracketConfig {
            quad_min: 2,
            ..Default::default()
        };
        assert_eq!(config.quad_threshold(), QUAD_SIZE);
        assert_eq!(BracketConfig::pairwise_only().quad_threshold(), usize::MAX);
    }

    #[test]
    fn test_with_entry_cap() {
        assert_eq!(BracketConfig::default().with_entry_cap(16).entry_cap, 16);
    }
}
