//! Question selection with anti-repetition memory
//!
//! Level 2 - Phases

use std::collections::BTreeSet;

use platepick_core::AttributeKind;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::question::{Question, QuestionCandidate};

/// What has been asked during one play-through
#[derive(Clone, Debug, Default)]
pub struct QuestionMemory {
    asked_ids: FxHashSet<String>,
    last_options: FxHashMap<AttributeKind, BTreeSet<String>>,
}

impl QuestionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an asked question: its id, and its options as the latest for its kind
    pub fn record(&mut self, question: &Question) {
        self.asked_ids.insert(question.id.clone());
        self.last_options.insert(question.kind, question.option_set());
    }

    pub fn was_asked(&self, id: &str) -> bool {
        self.asked_ids.contains(id)
    }

    /// Options of the most recent question of `kind`
    pub fn last_options(&self, kind: AttributeKind) -> Option<&BTreeSet<String>> {
        self.last_options.get(&kind)
    }

    /// Whether `group` shares any option with the last question of its kind
    pub fn overlaps_last(&self, group: &QuestionCandidate) -> bool {
        match self.last_options(group.kind) {
            Some(previous) => group.option_values().any(|v| previous.contains(v)),
            None => false,
        }
    }

    pub fn asked_count(&self) -> usize {
        self.asked_ids.len()
    }

    pub fn clear(&mut self) {
        self.asked_ids.clear();
        self.last_options.clear();
    }
}

/// Pick one eligible group, or `None` when nothing is left to ask.
///
/// Drops groups already asked and groups overlapping the previous question of
/// the same kind, then samples the rest by weight.
pub fn select_question<'a, R: Rng + ?Sized>(
    groups: &'a [QuestionCandidate],
    memory: &QuestionMemory,
    rng: &mut R,
) -> Option<&'a QuestionCandidate> {
    let eligible: Vec<&QuestionCandidate> = groups
        .iter()
        .filter(|g| !memory.was_asked(&g.id))
        .filter(|g| !memory.overlaps_last(g))
        .collect();

    tracing::debug!(
        "{} of {} question groups eligible",
        eligible.len(),
        groups.len()
    );

    weighted_pick(&eligible, |g| g.weight, rng)
}

/// Weighted random choice; degenerate weights fall back to the first item
fn weighted_pick<'a, T, R: Rng + ?Sized>(
    items: &[&'a T],
    weight: impl Fn(&T) -> f64,
    rng: &mut R,
) -> Option<&'a T> {
    let first = *items.first()?;
    match WeightedIndex::new(items.iter().map(|item| weight(*item))) {
        Ok(dist) => Some(items[dist.sample(rng)]),
        Err(_) => Some(first),
    }
}
