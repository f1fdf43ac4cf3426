//! Platepick Questions - Adaptive elimination questionnaire
//!
//! This crate turns a pool of dishes into one multiple-choice question:
//! - Candidate mining (which attribute values split the pool well)
//! - Question building (labels, hints, membership test)
//! - Question selection (no repeats, no overlap, weighted choice)
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: generate_question (orchestration)
//! - Level 2: select_question (phases)
//! - Level 3: mine_candidates, group_candidates, build_question (steps)
//! - Level 4: configuration

mod config;
mod miner;
mod question;
mod selector;

use platepick_core::Dish;
use rand::Rng;

pub use config::MinerConfig;
pub use miner::{collect_candidates, collect_name_candidates, mine_candidates, Candidate};
pub use question::{
    build_question, group_candidates, question_id, title_case, Question, QuestionCandidate,
    QUESTION_ID_PREFIX,
};
pub use selector::{select_question, QuestionMemory};

/// Generate the next question for `pool`, or `None` if nothing useful is left to ask
pub fn generate_question<R: Rng + ?Sized>(
    pool: &[Dish],
    memory: &QuestionMemory,
    config: &MinerConfig,
    rng: &mut R,
) -> Option<Question> {
    if pool.len() <= 1 {
        return None;
    }

    let candidates = mine_candidates(pool, config);
    if candidates.is_empty() {
        return None;
    }

    let groups = group_candidates(&candidates, config);
    let selected = select_question(&groups, memory, rng)?;
    Some(build_question(selected))
}
