//! Shapes raw extractor output into the canonical [`Recipe`], applying
//! servings-based ingredient scaling when requested.

use crate::model::{RawRecipe, Recipe};
use crate::quantity::scale_quantities;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digits regex"));

/// Parse a servings count from a yield string: first run of digits, default 1.
pub fn parse_servings(yield_text: &str) -> u32 {
    DIGITS
        .find(yield_text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// Build the canonical recipe from raw extractor fields.
///
/// When `requested_servings` is absent the ingredient strings pass through
/// untouched; the scaling code path (which reformats numbers) only runs for an
/// explicit servings request.
pub fn normalize(raw: RawRecipe, requested_servings: Option<u32>) -> Recipe {
    let original_servings = parse_servings(&raw.yield_text);

    let (ingredients, yield_text, scaled_servings) = match requested_servings {
        Some(requested) if requested >= 1 => {
            let factor = f64::from(requested) / f64::from(original_servings);
            debug!(
                "Scaling ingredients from {} to {} servings (factor {:.3})",
                original_servings, requested, factor
            );
            let scaled = raw
                .ingredients
                .iter()
                .map(|line| scale_quantities(line, factor))
                .collect();
            (scaled, format!("{requested} servings"), requested)
        }
        _ => (raw.ingredients, raw.yield_text, original_servings),
    };

    Recipe {
        name: raw.name,
        description: raw.description,
        image: raw.image,
        ingredients,
        instructions: raw.instructions,
        total_time: raw.total_time,
        cook_time: raw.cook_time,
        prep_time: raw.prep_time,
        yield_text,
        category: raw.category,
        cuisine: raw.cuisine,
        keywords: raw.keywords,
        nutrition: raw.nutrition,
        original_servings,
        scaled_servings,
    }
}
