//! Engine error types

use platepick_tournament::TournamentError;

use crate::engine::Phase;

/// Errors surfaced by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Initial fetch failed or returned nothing; only a restart recovers
    #[error("No dishes available: {reason}")]
    DataUnavailable { reason: String },

    #[error(transparent)]
    Tournament(#[from] TournamentError),

    /// Event not accepted in the current phase
    #[error("Cannot {event} while {phase}")]
    InvalidEvent { event: &'static str, phase: Phase },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
