use serde::{Deserialize, Serialize};

/// A single ingredient with parsed quantity information.
///
/// `quantity` is `None` when the source expresses an indeterminate amount
/// ("to taste", "a pinch"). Values are never mutated after construction;
/// rescaling re-derives a fresh list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
}

impl Ingredient {
    pub fn named(name: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            quantity: None,
            unit: None,
            preparation: None,
        }
    }
}

/// Nutrition facts as flat strings, empty when the page did not provide them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub protein_content: String,
    #[serde(default)]
    pub fat_content: String,
    #[serde(default)]
    pub carbohydrate_content: String,
}

/// Raw recipe fields as recovered by one of the extractors, before
/// normalization. Time fields keep whatever the page said (usually ISO-8601
/// durations); nothing is scaled or defaulted beyond empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecipe {
    pub name: String,
    pub description: String,
    pub image: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub total_time: String,
    pub cook_time: String,
    pub prep_time: String,
    pub yield_text: String,
    pub category: String,
    pub cuisine: String,
    pub keywords: Vec<String>,
    pub nutrition: Nutrition,
}

/// Canonical extracted recipe. Constructed once per extraction request and
/// never mutated; a servings change builds a new `Recipe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub description: String,
    pub image: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub total_time: String,
    pub cook_time: String,
    pub prep_time: String,
    #[serde(rename = "yield")]
    pub yield_text: String,
    pub category: String,
    pub cuisine: String,
    pub keywords: Vec<String>,
    pub nutrition: Nutrition,
    pub original_servings: u32,
    pub scaled_servings: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    C,
    F,
}

/// Category of the dominant physical action in a cooking step, consumed by
/// the presentation layer to pick an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Cutting,
    Stirring,
    Waiting,
    Heating,
    Mixing,
    Pouring,
    Seasoning,
    Whisking,
    Kneading,
    Rolling,
    Grating,
    Peeling,
    Folding,
    Sauteing,
    Cooling,
    Blending,
    Steaming,
    Mashing,
    Straining,
    Measuring,
    Sifting,
    Beating,
    Crushing,
    Shredding,
    Juicing,
    Serving,
}

/// One structured cooking step produced by the instruction decomposer.
///
/// Steps come out in cooking order, one per input instruction, with
/// `step_number` equal to the 1-based input index. `notes` is only ever
/// populated by the LLM tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedStep {
    pub step_number: u32,
    pub total_steps: u32,
    pub action: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_unit: Option<DurationUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_unit: Option<TemperatureUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_type: Option<AnimationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
