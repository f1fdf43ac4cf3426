//! Dish sources - where the pool comes from
//!
//! The engine only sees the [`DishSource`] trait. [`CatalogSource`] reads the
//! enriched JSON catalog; [`InMemorySource`] serves a fixed list.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::dish::Dish;
use crate::sanitize::sanitize_ai_meta;

/// Errors raised while fetching dishes
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no usable dishes")]
    Empty,

    #[error("Dish source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the initial pool.
///
/// Implementations return a non-empty, already shuffled list whose enrichment
/// is fully populated, or an error.
pub trait DishSource {
    fn fetch_dishes(&mut self) -> Result<Vec<Dish>, CatalogError>;
}

// ============================================================================
// In-memory source
// ============================================================================

/// Serves a fixed list in its given order
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    dishes: Vec<Dish>,
    failure: Option<String>,
}

impl InMemorySource {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self {
            dishes,
            failure: None,
        }
    }

    /// A source whose every fetch fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            dishes: Vec::new(),
            failure: Some(reason.into()),
        }
    }
}

impl DishSource for InMemorySource {
    fn fetch_dishes(&mut self) -> Result<Vec<Dish>, CatalogError> {
        if let Some(reason) = &self.failure {
            return Err(CatalogError::Unavailable(reason.clone()));
        }
        if self.dishes.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(self.dishes.clone())
    }
}

// ============================================================================
// JSON catalog source
// ============================================================================

/// Record shape of the enriched catalog file
#[derive(Debug, Deserialize)]
struct RawDish {
    id: Option<String>,
    name: Option<String>,
    image: Option<String>,
    #[serde(default)]
    cuisines: Vec<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    ai: Option<Value>,
}

/// Enriched catalog loaded from JSON, reshuffled on every fetch
#[derive(Clone)]
pub struct CatalogSource {
    dishes: Vec<Dish>,
    rng: ChaCha8Rng,
}

impl CatalogSource {
    /// Load the catalog at `path`
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a catalog from a JSON array of dish records
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawDish> = serde_json::from_str(content)?;
        let total = raw.len();
        let dishes: Vec<Dish> = raw.into_iter().filter_map(clean_dish).collect();

        if dishes.len() < total {
            tracing::warn!(
                "Dropped {} of {} catalog records (missing fields or placeholder names)",
                total - dishes.len(),
                total
            );
        }
        if dishes.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self {
            dishes,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// Fix the shuffle order for reproducible sessions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Dishes in file order
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

impl DishSource for CatalogSource {
    fn fetch_dishes(&mut self) -> Result<Vec<Dish>, CatalogError> {
        let mut shuffled = self.dishes.clone();
        shuffled.shuffle(&mut self.rng);
        Ok(shuffled)
    }
}

fn clean_dish(raw: RawDish) -> Option<Dish> {
    let id = non_empty(raw.id)?;
    let name = non_empty(raw.name)?;
    let image = non_empty(raw.image)?;

    if is_placeholder_name(&id, &name) {
        return None;
    }

    let ai = sanitize_ai_meta(raw.ai.as_ref().unwrap_or(&Value::Null));

    Some(Dish {
        id,
        name,
        image,
        cuisines: clean_tokens(raw.cuisines),
        ingredients: clean_tokens(raw.ingredients),
        categories: clean_tokens(raw.categories),
        ai: Some(ai),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn clean_tokens(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// `Q` followed by one or more digits, case-insensitive
fn is_qid(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some('q' | 'Q'))
        && value.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

/// Trailing `/Q123` of an entity URL, uppercased
fn qid_from_entity_url(id: &str) -> Option<String> {
    let tail = id.rsplit('/').next()?;
    if id.contains('/') && is_qid(tail) {
        Some(tail.to_uppercase())
    } else {
        None
    }
}

/// Names that are just the unresolved Wikidata QID
fn is_placeholder_name(id: &str, name: &str) -> bool {
    let name = name.trim();
    if !is_qid(name) {
        return false;
    }
    match qid_from_entity_url(id) {
        Some(qid) => name.to_uppercase() == qid,
        None => true,
    }
}
