//! Platepick Engine - One play-through from catalog to winner
//!
//! This crate drives a session:
//! - Fetching the pool from a [`DishSource`](platepick_core::DishSource)
//! - Narrowing it with generated questions until it is small
//! - Handing the rest to the bracket and reporting the winner
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: GameEngine::dispatch (orchestration)
//! - Level 2: start, submit_answer, match resolution, next_step (phases)
//! - Level 3: apply_answer, tournament hand-off (steps)
//! - Level 4: configuration and errors

mod config;
mod engine;
mod error;
mod narrowing;

pub use config::EngineConfig;
pub use engine::{AnswerOutcome, EngineView, Event, GameEngine, Phase};
pub use error::{EngineError, Result};
pub use narrowing::{apply_answer, next_step, Filtered, HandOffReason, NarrowingStep};
