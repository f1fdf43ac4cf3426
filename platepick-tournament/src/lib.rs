//! Platepick Tournament - Resolving a small pool by direct choice
//!
//! This crate provides the bracket state machine:
//! - Capped, uniformly sampled seeding
//! - Four-way and pairwise matches resolved by user picks
//! - Byes for odd leftovers, round bookkeeping, match history
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Bracket::start, Bracket::resolve (orchestration)
//! - Level 2: end-of-round bookkeeping (phases)
//! - Level 3: seed_contenders, winner coercion (steps)
//! - Level 4: configuration

mod bracket;
mod config;

pub use bracket::{seed_contenders, Bracket, MatchKind, MatchRecord, Matchup, Progress, TournamentError};
pub use config::{BracketConfig, DUEL_SIZE, QUAD_SIZE};
