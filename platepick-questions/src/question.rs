//! Question building - grouping ranked candidates into multiple-choice questions
//!
//! Level 3 - Steps

use std::collections::BTreeSet;

use platepick_core::{normalize_token, AttributeKind, Dish};
use serde::Serialize;

use crate::config::MinerConfig;
use crate::miner::Candidate;

/// Prefix shared by all multiple-choice question ids
pub const QUESTION_ID_PREFIX: &str = "multi-";

/// A multiple-choice question on one attribute axis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Question {
    /// Deterministic: same kind and option set, same id
    pub id: String,
    pub prompt: String,
    pub kind: AttributeKind,
    /// Option values in rank order
    pub options: Vec<String>,
    /// Human-readable labels, parallel to `options`
    pub labels: Vec<String>,
    /// Share of the offered options' combined support, parallel to `options`
    pub hints: Vec<String>,
}

impl Question {
    /// Whether `dish` carries the chosen option
    pub fn matches(&self, dish: &Dish, option: &str) -> bool {
        self.kind.matches(dish, &normalize_token(option))
    }

    /// Keep only the dishes that carry the chosen option
    pub fn filter_pool(&self, pool: &[Dish], option: &str) -> Vec<Dish> {
        let option = normalize_token(option);
        pool.iter()
            .filter(|dish| self.kind.matches(dish, &option))
            .cloned()
            .collect()
    }

    /// Normalized option values
    pub fn option_set(&self) -> BTreeSet<String> {
        self.options.iter().map(|o| normalize_token(o)).collect()
    }

    pub fn has_option(&self, option: &str) -> bool {
        let option = normalize_token(option);
        self.options.iter().any(|o| *o == option)
    }
}

/// Top-ranked candidates of one kind, ready to become a question
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionCandidate {
    pub kind: AttributeKind,
    pub options: Vec<Candidate>,
    pub id: String,
    /// Sum of option weights scaled by the kind's priority
    pub weight: f64,
}

impl QuestionCandidate {
    /// Wrap already-ranked candidates of a single kind
    pub fn from_ranked(kind: AttributeKind, options: Vec<Candidate>) -> Self {
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        let id = question_id(kind, values.as_slice());
        let weight = options.iter().map(|o| o.weight).sum::<f64>() * kind.priority();
        Self {
            kind,
            options,
            id,
            weight,
        }
    }

    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.value.as_str())
    }
}

/// Id for a question on `kind` offering `values`. Order of `values` is irrelevant.
pub fn question_id<S: AsRef<str>>(kind: AttributeKind, values: &[S]) -> String {
    let sorted: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();
    let joined: Vec<&str> = sorted.into_iter().collect();
    format!("{}{}-{}", QUESTION_ID_PREFIX, kind.key(), joined.join("|"))
}

/// Group candidates by kind, rank each group, keep groups with enough options.
///
/// Groups come back in [`AttributeKind::ALL`] order.
pub fn group_candidates(candidates: &[Candidate], config: &MinerConfig) -> Vec<QuestionCandidate> {
    AttributeKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let mut ranked: Vec<Candidate> = candidates
                .iter()
                .filter(|c| c.kind == kind)
                .cloned()
                .collect();
            ranked.sort_by(|a, b| {
                b.weight
                    .partial_cmp(&a.weight)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.value.cmp(&b.value))
            });
            ranked.truncate(config.max_options);

            if ranked.len() < config.min_options {
                return None;
            }
            Some(QuestionCandidate::from_ranked(kind, ranked))
        })
        .collect()
}

/// Turn a selected group into a concrete question
pub fn build_question(group: &QuestionCandidate) -> Question {
    let options: Vec<String> = group.option_values().map(str::to_string).collect();
    let labels = options.iter().map(|v| title_case(v)).collect();

    let total: f64 = group.options.iter().map(|o| o.support).sum();
    let hints = group
        .options
        .iter()
        .map(|o| {
            let pct = if total > 0.0 {
                (o.support / total * 100.0).round() as u32
            } else {
                0
            };
            format!("{}% Of Remaining Dishes", pct)
        })
        .collect();

    Question {
        id: group.id.clone(),
        prompt: group.kind.prompt().to_string(),
        kind: group.kind,
        options,
        labels,
        hints,
    }
}

/// `late_night` -> `Late Night`
pub fn title_case(value: &str) -> String {
    value
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
