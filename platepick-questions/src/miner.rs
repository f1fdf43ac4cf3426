//! Candidate mining - scoring attribute values as question axes
//!
//! Level 3 - Steps

use std::collections::BTreeSet;

use platepick_core::{normalize_token, AttributeKind, Dish, MILD, SPICY};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::MinerConfig;

/// Words ignored when mining dish names
const NAME_STOP_WORDS: [&str; 7] = ["and", "with", "the", "for", "style", "food", "dish"];

/// A scored attribute value observed in one pool snapshot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candidate {
    pub kind: AttributeKind,
    pub value: String,
    /// Number of dishes carrying the value, weighted by AI confidence
    pub support: f64,
    /// `support / pool size`
    pub ratio: f64,
    pub weight: f64,
}

/// Support counts per value, per kind
#[derive(Default)]
struct Tally {
    buckets: FxHashMap<AttributeKind, FxHashMap<String, f64>>,
}

impl Tally {
    fn add(&mut self, kind: AttributeKind, value: &str, weight: f64) {
        if value.is_empty() {
            return;
        }
        *self
            .buckets
            .entry(kind)
            .or_default()
            .entry(value.to_string())
            .or_insert(0.0) += weight;
    }

    /// Each distinct value counts once per dish
    fn add_list(&mut self, kind: AttributeKind, values: &[String], weight: f64) {
        let unique: BTreeSet<String> = values.iter().map(|v| normalize_token(v)).collect();
        for value in &unique {
            self.add(kind, value, weight);
        }
    }
}

/// Mine question axes from a pool.
///
/// Falls back to dish-name tokens when structured attributes yield nothing.
pub fn mine_candidates(pool: &[Dish], config: &MinerConfig) -> Vec<Candidate> {
    if pool.len() < 2 {
        return Vec::new();
    }

    let structured = collect_candidates(pool, config);
    if !structured.is_empty() {
        return structured;
    }

    let fallback = collect_name_candidates(pool, config);
    tracing::debug!(
        "No structured candidates in pool of {}, {} name-token candidates",
        pool.len(),
        fallback.len()
    );
    fallback
}

/// Candidates from base attributes and AI metadata
pub fn collect_candidates(pool: &[Dish], config: &MinerConfig) -> Vec<Candidate> {
    let total = pool.len() as f64;
    let mut tally = Tally::default();

    for dish in pool {
        if let Some(ai) = &dish.ai {
            let weight = config.ai_weight(ai.ai_confidence);

            if !ai.protein_type.is_neutral() {
                tally.add(AttributeKind::ProteinType, ai.protein_type.as_str(), weight);
            }
            if !ai.serving_temperature.is_neutral() {
                tally.add(AttributeKind::ServingTemperature, ai.serving_temperature.as_str(), weight);
            }
            if !ai.comfort_vs_light.is_neutral() {
                tally.add(AttributeKind::ComfortVsLight, ai.comfort_vs_light.as_str(), weight);
            }

            if ai.is_spicy() {
                tally.add(AttributeKind::SpiceLevel, SPICY, weight);
            }
            if ai.is_mild() {
                tally.add(AttributeKind::SpiceLevel, MILD, weight);
            }

            for kind in AttributeKind::ALL {
                if let Some(tags) = kind.ai_tags(ai) {
                    tally.add_list(kind, tags, weight);
                }
            }
        }

        tally.add_list(AttributeKind::Cuisine, &dish.cuisines, 1.0);
        tally.add_list(AttributeKind::Ingredient, &dish.ingredients, 1.0);
        tally.add_list(AttributeKind::Category, &dish.categories, 1.0);
    }

    let mut candidates = Vec::new();
    for kind in AttributeKind::ALL {
        let Some(bucket) = tally.buckets.get(&kind) else {
            continue;
        };
        for (value, &support) in bucket {
            let ratio = support / total;
            if ratio < config.min_ratio || ratio > config.max_ratio {
                continue;
            }
            candidates.push(Candidate {
                kind,
                value: value.clone(),
                support,
                ratio,
                weight: split_score(ratio) * kind.priority(),
            });
        }
    }
    candidates
}

/// Candidates from dish-name tokens, filed under [`AttributeKind::Ingredient`]
pub fn collect_name_candidates(pool: &[Dish], config: &MinerConfig) -> Vec<Candidate> {
    let total = pool.len() as f64;
    let mut counts: FxHashMap<String, f64> = FxHashMap::default();

    for dish in pool {
        let tokens: BTreeSet<String> = name_tokens(&dish.name).collect();
        for token in tokens {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }
    }

    counts
        .into_iter()
        .filter_map(|(value, support)| {
            let ratio = support / total;
            if ratio < config.fallback_min_ratio || ratio > config.fallback_max_ratio {
                return None;
            }
            Some(Candidate {
                kind: AttributeKind::Ingredient,
                value,
                support,
                ratio,
                weight: (1.0 - (0.5 - ratio).abs()) * config.fallback_discount + 0.01,
            })
        })
        .collect()
}

/// Rewards near 50/50 splits
fn split_score(ratio: f64) -> f64 {
    (1.0 - (0.5 - ratio).abs()) + 0.01
}

fn name_tokens(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .map(str::to_ascii_lowercase)
        .filter(|token| token.len() > 2 && !NAME_STOP_WORDS.contains(&token.as_str()))
}
