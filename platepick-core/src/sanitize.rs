//! Sanitize-and-default for enrichment metadata
//!
//! Raw enrichment output is untrusted JSON. Everything here produces a fully
//! populated [`DishAiMeta`] no matter what comes in.

use serde_json::{Map, Value};

use crate::dish::{ComfortVsLight, DishAiMeta, ProteinType, ServingTemperature};

/// Maximum entries kept per tag list
pub const LIST_LIMIT: usize = 8;

pub const FLAVOR_VOCAB: &[&str] = &[
    "sweet", "savory", "spicy", "umami", "sour", "bitter", "salty", "rich", "smoky", "tangy",
];

pub const MEAL_CONTEXT_VOCAB: &[&str] = &[
    "breakfast", "lunch", "dinner", "snack", "dessert", "appetizer", "late_night",
];

pub const DIETARY_VOCAB: &[&str] = &[
    "vegetarian", "vegan", "gluten_free", "dairy_free", "nut_free", "egg_free", "halal", "kosher",
    "pescatarian",
];

pub const TEXTURE_VOCAB: &[&str] = &[
    "crispy", "crunchy", "creamy", "chewy", "brothy", "tender", "silky", "sticky",
];

pub const ALLERGEN_VOCAB: &[&str] = &[
    "contains_nuts",
    "contains_dairy",
    "contains_gluten",
    "contains_shellfish",
    "contains_egg",
    "contains_soy",
    "contains_fish",
    "contains_sesame",
];

pub const COURSE_VOCAB: &[&str] = &["starter", "main", "side", "dessert", "street_food", "snack"];

pub const COOKING_METHOD_VOCAB: &[&str] = &[
    "fried", "stir_fried", "grilled", "baked", "steamed", "raw", "stewed", "boiled", "roasted",
    "braised", "sauteed", "smoked",
];

/// Lowercase, collapse every run of non-alphanumerics to `_`, strip edge `_`
pub fn to_snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_sep = false;
    for ch in value.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Build a complete [`DishAiMeta`] from arbitrary JSON.
///
/// Non-objects yield the defaults. Each field is validated on its own, so a
/// bad field never discards the good ones.
pub fn sanitize_ai_meta(input: &Value) -> DishAiMeta {
    let base = DishAiMeta::default();
    let raw = match input.as_object() {
        Some(raw) => raw,
        None => return base,
    };

    DishAiMeta {
        flavor_profile: clean_list(raw.get("flavorProfile"), Some(FLAVOR_VOCAB)),
        meal_context: clean_list(raw.get("mealContext"), Some(MEAL_CONTEXT_VOCAB)),
        dietary_tags: clean_list(raw.get("dietaryTags"), Some(DIETARY_VOCAB)),
        key_ingredients: clean_list(raw.get("keyIngredients"), None),
        texture_profile: clean_list(raw.get("textureProfile"), Some(TEXTURE_VOCAB)),
        serving_temperature: parse_enum(raw, "servingTemperature", &ServingTemperature::ALL, |t| t.as_str())
            .unwrap_or(base.serving_temperature),
        spice_level: clamp_int(raw.get("spiceLevel"), 0, 5, base.spice_level),
        allergen_risk_tags: clean_list(raw.get("allergenRiskTags"), Some(ALLERGEN_VOCAB)),
        protein_type: parse_enum(raw, "proteinType", &ProteinType::ALL, |p| p.as_str())
            .unwrap_or(base.protein_type),
        course_type: clean_list(raw.get("courseType"), Some(COURSE_VOCAB)),
        cooking_method_tags: clean_list(raw.get("cookingMethodTags"), Some(COOKING_METHOD_VOCAB)),
        comfort_vs_light: parse_enum(raw, "comfortVsLight", &ComfortVsLight::ALL, |c| c.as_str())
            .unwrap_or(base.comfort_vs_light),
        adventure_level: clamp_int(raw.get("adventureLevel"), 1, 5, base.adventure_level),
        ai_confidence: clamp_float(raw.get("aiConfidence"), 0.0, 1.0, base.ai_confidence),
    }
}

/// Snake-case, dedupe in first-seen order, filter to `allowed` (if any), cap at [`LIST_LIMIT`]
fn clean_list(values: Option<&Value>, allowed: Option<&[&str]>) -> Vec<String> {
    let items = match values.and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut unique: Vec<String> = Vec::new();
    for item in items.iter().filter_map(Value::as_str) {
        let normalized = to_snake_case(item);
        if normalized.is_empty() {
            continue;
        }
        if let Some(allowed) = allowed {
            if !allowed.contains(&normalized.as_str()) {
                continue;
            }
        }
        if !unique.contains(&normalized) {
            unique.push(normalized);
        }
        if unique.len() >= LIST_LIMIT {
            break;
        }
    }
    unique
}

fn parse_enum<T: Copy>(
    raw: &Map<String, Value>,
    field: &str,
    variants: &[T],
    name: impl Fn(T) -> &'static str,
) -> Option<T> {
    let value = raw.get(field)?.as_str()?;
    variants.iter().copied().find(|v| name(*v) == value)
}

fn clamp_int(value: Option<&Value>, min: u8, max: u8, fallback: u8) -> u8 {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n.round().clamp(min as f64, max as f64) as u8,
        _ => fallback,
    }
}

fn clamp_float(value: Option<&Value>, min: f32, max: f32, fallback: f32) -> f32 {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => (n as f32).clamp(min, max),
        _ => fallback,
    }
}
