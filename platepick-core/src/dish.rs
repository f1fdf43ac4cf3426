//! Dish records and their AI metadata

use serde::{Deserialize, Serialize};

/// How a dish is served
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingTemperature {
    Hot,
    Cold,
    Room,
    Mixed,
}

impl ServingTemperature {
    pub const ALL: [ServingTemperature; 4] = [Self::Hot, Self::Cold, Self::Room, Self::Mixed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Room => "room",
            Self::Mixed => "mixed",
        }
    }

    /// `mixed` carries no signal for narrowing
    pub fn is_neutral(self) -> bool {
        self == Self::Mixed
    }
}

impl Default for ServingTemperature {
    fn default() -> Self {
        ServingTemperature::Mixed
    }
}

/// Dominant protein source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinType {
    Meat,
    Seafood,
    Vegetarian,
    Vegan,
    Mixed,
    Unknown,
}

impl ProteinType {
    pub const ALL: [ProteinType; 6] = [
        Self::Meat,
        Self::Seafood,
        Self::Vegetarian,
        Self::Vegan,
        Self::Mixed,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meat => "meat",
            Self::Seafood => "seafood",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Self::Unknown
    }
}

impl Default for ProteinType {
    fn default() -> Self {
        ProteinType::Unknown
    }
}

/// Comfort food versus light fare
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortVsLight {
    Comfort,
    Balanced,
    Light,
    Unknown,
}

impl ComfortVsLight {
    pub const ALL: [ComfortVsLight; 4] = [Self::Comfort, Self::Balanced, Self::Light, Self::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comfort => "comfort",
            Self::Balanced => "balanced",
            Self::Light => "light",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Self::Unknown
    }
}

impl Default for ComfortVsLight {
    fn default() -> Self {
        ComfortVsLight::Unknown
    }
}

/// Lowest spice level that counts as "spicy"
pub const SPICY_MIN_LEVEL: u8 = 3;
/// Highest spice level that counts as "mild"
pub const MILD_MAX_LEVEL: u8 = 1;

/// Enrichment block attached to a dish.
///
/// Always fully populated: partial input goes through
/// [`sanitize_ai_meta`](crate::sanitize_ai_meta) before reaching a pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishAiMeta {
    pub flavor_profile: Vec<String>,
    pub meal_context: Vec<String>,
    pub dietary_tags: Vec<String>,
    pub key_ingredients: Vec<String>,
    pub texture_profile: Vec<String>,
    pub serving_temperature: ServingTemperature,
    /// 0 (none) to 5 (very hot)
    pub spice_level: u8,
    pub allergen_risk_tags: Vec<String>,
    pub protein_type: ProteinType,
    pub course_type: Vec<String>,
    pub cooking_method_tags: Vec<String>,
    pub comfort_vs_light: ComfortVsLight,
    /// 1 (familiar) to 5 (adventurous)
    pub adventure_level: u8,
    /// Model confidence in [0, 1]
    pub ai_confidence: f32,
}

impl Default for DishAiMeta {
    fn default() -> Self {
        Self {
            flavor_profile: Vec::new(),
            meal_context: Vec::new(),
            dietary_tags: Vec::new(),
            key_ingredients: Vec::new(),
            texture_profile: Vec::new(),
            serving_temperature: ServingTemperature::Mixed,
            spice_level: 0,
            allergen_risk_tags: Vec::new(),
            protein_type: ProteinType::Unknown,
            course_type: Vec::new(),
            cooking_method_tags: Vec::new(),
            comfort_vs_light: ComfortVsLight::Unknown,
            adventure_level: 3,
            ai_confidence: 0.0,
        }
    }
}

impl DishAiMeta {
    pub fn is_spicy(&self) -> bool {
        self.spice_level >= SPICY_MIN_LEVEL
    }

    pub fn is_mild(&self) -> bool {
        self.spice_level <= MILD_MAX_LEVEL
    }
}

/// A dish in the candidate pool. Read-only once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cuisines: Vec<String>,
    pub ingredients: Vec<String>,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<DishAiMeta>,
}

impl Dish {
    /// Create a dish with no attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            cuisines: Vec::new(),
            ingredients: Vec::new(),
            categories: Vec::new(),
            ai: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_cuisines(mut self, cuisines: &[&str]) -> Self {
        self.cuisines = cuisines.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_ingredients(mut self, ingredients: &[&str]) -> Self {
        self.ingredients = ingredients.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_ai(mut self, ai: DishAiMeta) -> Self {
        self.ai = Some(ai);
        self
    }
}
