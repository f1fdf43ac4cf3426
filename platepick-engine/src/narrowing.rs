//! Narrowing controller - ask another question or hand off to the tournament
//!
//! Level 2 - Phases

use platepick_core::Dish;
use platepick_questions::{generate_question, Question, QuestionMemory};
use rand::Rng;

use crate::config::EngineConfig;

/// Why narrowing stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandOffReason {
    /// Pool is already at or below the narrowing threshold
    SmallPool,
    /// Nothing eligible left to ask
    NoQuestion,
}

/// Decision for the current pool
#[derive(Clone, Debug, PartialEq)]
pub enum NarrowingStep {
    Ask(Question),
    HandOff(HandOffReason),
}

/// Result of applying an answer
#[derive(Clone, Debug, PartialEq)]
pub enum Filtered {
    /// The dishes matching the answer
    Narrowed(Vec<Dish>),
    /// Nothing matched; the pool must stay as it was
    Empty,
}

/// Decide whether `pool` gets another question
pub fn next_step<R: Rng + ?Sized>(
    pool: &[Dish],
    memory: &QuestionMemory,
    config: &EngineConfig,
    rng: &mut R,
) -> NarrowingStep {
    if pool.len() <= config.narrowing_threshold {
        return NarrowingStep::HandOff(HandOffReason::SmallPool);
    }

    match generate_question(pool, memory, &config.miner, rng) {
        Some(question) => NarrowingStep::Ask(question),
        None => NarrowingStep::HandOff(HandOffReason::NoQuestion),
    }
}

/// Filter `pool` by the chosen option
pub fn apply_answer(pool: &[Dish], question: &Question, answer: &str) -> Filtered {
    let kept = question.filter_pool(pool, answer);
    if kept.is_empty() {
        Filtered::Empty
    } else {
        Filtered::Narrowed(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platepick_core::{AttributeKind, DishAiMeta};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn textured_pool(n: usize) -> Vec<Dish> {
        let textures = ["crispy", "creamy", "chewy"];
        (0..n)
            .map(|i| {
                Dish::new(format!("d{}", i), format!("Dish {}", i)).with_ai(DishAiMeta {
                    texture_profile: vec![textures[i % 3].to_string()],
                    spice_level: 2,
                    ai_confidence: 1.0,
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn test_small_pool_hands_off() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let step = next_step(&textured_pool(8), &QuestionMemory::new(), &EngineConfig::default(), &mut rng);
        assert_eq!(step, NarrowingStep::HandOff(HandOffReason::SmallPool));
    }

    #[test]
    fn test_large_pool_asks() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let step = next_step(&textured_pool(12), &QuestionMemory::new(), &EngineConfig::default(), &mut rng);
        match step {
            NarrowingStep::Ask(q) => assert_eq!(q.kind, AttributeKind::TextureProfile),
            other => panic!("expected a question, got {:?}", other),
        }
    }

    #[test]
    fn test_exhausted_memory_hands_off() {
        let pool = textured_pool(12);
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut memory = QuestionMemory::new();

        if let NarrowingStep::Ask(q) = next_step(&pool, &memory, &config, &mut rng) {
            memory.record(&q);
        }
        let step = next_step(&pool, &memory, &config, &mut rng);
        assert_eq!(step, NarrowingStep::HandOff(HandOffReason::NoQuestion));
    }

    #[test]
    fn test_apply_answer() {
        let pool = textured_pool(12);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let NarrowingStep::Ask(question) =
            next_step(&pool, &QuestionMemory::new(), &EngineConfig::default(), &mut rng)
        else {
            panic!("expected a question");
        };

        match apply_answer(&pool, &question, "creamy") {
            Filtered::Narrowed(kept) => assert_eq!(kept.len(), 4),
            Filtered::Empty => panic!("creamy should match"),
        }
        assert_eq!(apply_answer(&pool, &question, "sticky"), Filtered::Empty);
    }
}
