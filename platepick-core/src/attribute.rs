//! Attribute kinds used as question axes
//!
//! Each kind knows its priority, its prompt, and how to test whether a dish
//! carries a given value.

use serde::{Deserialize, Serialize};

use crate::dish::{Dish, DishAiMeta};

/// Synthetic value for spice level >= 3
pub const SPICY: &str = "spicy";
/// Synthetic value for spice level <= 1
pub const MILD: &str = "mild";

/// An axis along which the pool can be split
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    ProteinType,
    ServingTemperature,
    SpiceLevel,
    ComfortVsLight,
    CourseType,
    FlavorProfile,
    TextureProfile,
    MealContext,
    DietaryTags,
    CookingMethodTags,
    KeyIngredients,
    Cuisine,
    Ingredient,
    Category,
}

impl AttributeKind {
    /// Every kind, in mining order
    pub const ALL: [AttributeKind; 14] = [
        Self::ProteinType,
        Self::ServingTemperature,
        Self::SpiceLevel,
        Self::ComfortVsLight,
        Self::CourseType,
        Self::FlavorProfile,
        Self::TextureProfile,
        Self::MealContext,
        Self::DietaryTags,
        Self::CookingMethodTags,
        Self::KeyIngredients,
        Self::Cuisine,
        Self::Ingredient,
        Self::Category,
    ];

    /// Stable key used in question ids
    pub fn key(self) -> &'static str {
        match self {
            Self::ProteinType => "proteinType",
            Self::ServingTemperature => "servingTemperature",
            Self::SpiceLevel => "spiceLevel",
            Self::ComfortVsLight => "comfortVsLight",
            Self::CourseType => "courseType",
            Self::FlavorProfile => "flavorProfile",
            Self::TextureProfile => "textureProfile",
            Self::MealContext => "mealContext",
            Self::DietaryTags => "dietaryTags",
            Self::CookingMethodTags => "cookingMethodTags",
            Self::KeyIngredients => "keyIngredients",
            Self::Cuisine => "cuisine",
            Self::Ingredient => "ingredient",
            Self::Category => "category",
        }
    }

    /// Parse a key produced by [`AttributeKind::key`]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// How discriminating this axis is considered. Higher is asked more often.
    pub fn priority(self) -> f64 {
        match self {
            Self::ProteinType => 1.6,
            Self::ServingTemperature => 1.5,
            Self::SpiceLevel => 1.45,
            Self::CourseType => 1.4,
            Self::ComfortVsLight => 1.35,
            Self::FlavorProfile => 1.35,
            Self::TextureProfile => 1.25,
            Self::MealContext => 1.15,
            Self::DietaryTags => 1.1,
            Self::CookingMethodTags => 1.05,
            Self::KeyIngredients => 1.0,
            Self::Cuisine => 0.95,
            Self::Ingredient => 0.9,
            Self::Category => 0.85,
        }
    }

    /// Whether values come from the enrichment block rather than the base record
    pub fn is_ai_sourced(self) -> bool {
        !matches!(self, Self::Cuisine | Self::Ingredient | Self::Category)
    }

    /// Prompt shown for a question on this axis
    pub fn prompt(self) -> &'static str {
        match self {
            Self::ProteinType => "Pick A Protein Direction",
            Self::ServingTemperature => "Pick A Temperature Vibe",
            Self::SpiceLevel => "Choose Your Spice Level",
            Self::ComfortVsLight => "Pick Your Food Mood",
            Self::CourseType => "Pick A Course Style",
            Self::FlavorProfile => "Pick A Flavor Profile",
            Self::TextureProfile => "Pick A Texture Profile",
            Self::MealContext => "What Occasion Is This For?",
            Self::DietaryTags => "Pick A Dietary Preference",
            Self::CookingMethodTags => "Pick A Cooking Style",
            Self::KeyIngredients => "Pick An Ingredient Vibe",
            Self::Cuisine => "Pick A Cuisine Direction",
            Self::Ingredient => "Pick An Ingredient Direction",
            Self::Category => "Pick A Food Category",
        }
    }

    /// Multi-valued tag list for AI-sourced list kinds
    pub fn ai_tags(self, ai: &DishAiMeta) -> Option<&[String]> {
        match self {
            Self::CourseType => Some(&ai.course_type),
            Self::FlavorProfile => Some(&ai.flavor_profile),
            Self::TextureProfile => Some(&ai.texture_profile),
            Self::MealContext => Some(&ai.meal_context),
            Self::DietaryTags => Some(&ai.dietary_tags),
            Self::CookingMethodTags => Some(&ai.cooking_method_tags),
            Self::KeyIngredients => Some(&ai.key_ingredients),
            _ => None,
        }
    }

    /// Whether `dish` carries `value` along this axis.
    ///
    /// `value` is expected normalized (see [`normalize_token`]). Dishes without
    /// enrichment never match an AI-sourced kind.
    pub fn matches(self, dish: &Dish, value: &str) -> bool {
        match self {
            Self::Cuisine => contains_token(&dish.cuisines, value),
            Self::Ingredient => {
                contains_token(&dish.ingredients, value)
                    || dish.name.to_lowercase().contains(value)
            }
            Self::Category => contains_token(&dish.categories, value),
            _ => match &dish.ai {
                Some(ai) => self.matches_ai(ai, value),
                None => false,
            },
        }
    }

    fn matches_ai(self, ai: &DishAiMeta, value: &str) -> bool {
        match self {
            Self::ProteinType => ai.protein_type.as_str() == value,
            Self::ServingTemperature => ai.serving_temperature.as_str() == value,
            Self::ComfortVsLight => ai.comfort_vs_light.as_str() == value,
            Self::SpiceLevel => match value {
                SPICY => ai.is_spicy(),
                MILD => ai.is_mild(),
                _ => false,
            },
            _ => self
                .ai_tags(ai)
                .map(|tags| contains_token(tags, value))
                .unwrap_or(false),
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Trim and lowercase a token
pub fn normalize_token(value: &str) -> String {
    value.trim().to_lowercase()
}

fn contains_token(values: &[String], value: &str) -> bool {
    values.iter().any(|entry| normalize_token(entry) == value)
}
