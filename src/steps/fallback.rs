//! Deterministic regex tier of the instruction decomposer.
//!
//! Pure and total: any array of strings, including empty and pattern-free
//! ones, produces one valid step per instruction without ever failing. Each
//! pattern family lives in its own static so order stays visible and
//! test-covered.

use crate::model::{AnimationType, DurationUnit, Ingredient, ProcessedStep, TemperatureUnit};
use regex::Regex;
use std::sync::LazyLock;

/// Ordered category -> keyword table. First matching category wins; no match
/// defaults to `Waiting`. Canonical order: heating precedes stirring, so
/// "simmer while stirring" classifies as heating; "cool" belongs to cooling,
/// not waiting.
pub const ANIMATION_KEYWORDS: &[(AnimationType, &[&str])] = &[
    (AnimationType::Cutting, &["cut", "chop", "slice", "dice"]),
    (
        AnimationType::Heating,
        &["heat", "cook", "boil", "simmer", "bake", "roast"],
    ),
    (AnimationType::Stirring, &["stir", "mix"]),
    (AnimationType::Whisking, &["whisk"]),
    (AnimationType::Beating, &["beat"]),
    (AnimationType::Kneading, &["knead", "dough"]),
    (AnimationType::Rolling, &["roll", "pastry"]),
    (AnimationType::Folding, &["fold", "incorporate"]),
    (AnimationType::Sauteing, &["saute", "fry"]),
    (AnimationType::Grating, &["grate"]),
    (AnimationType::Shredding, &["shred"]),
    (AnimationType::Peeling, &["peel", "skin"]),
    (AnimationType::Mashing, &["mash"]),
    (AnimationType::Blending, &["blend", "puree"]),
    (AnimationType::Steaming, &["steam"]),
    (AnimationType::Straining, &["strain", "drain"]),
    (AnimationType::Sifting, &["sift"]),
    (AnimationType::Crushing, &["crush"]),
    (AnimationType::Juicing, &["juice"]),
    (AnimationType::Measuring, &["measure"]),
    (
        AnimationType::Seasoning,
        &["season", "salt", "pepper", "sprinkle"],
    ),
    (AnimationType::Pouring, &["pour", "add"]),
    (AnimationType::Cooling, &["cool", "chill", "refrigerate"]),
    (AnimationType::Serving, &["serve", "plate", "garnish"]),
    (AnimationType::Waiting, &["wait", "rest", "marinate"]),
];

static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(minute|hour|second)s?").expect("duration regex"));

// The trailing word boundary keeps "2 cups" from reading as 2 °C.
static TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:degrees?\s*|°\s*)?([CF])\b").expect("temperature regex")
});

static FRACTION_QTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)\s*([A-Za-z]+)").expect("fraction regex"));

static DECIMAL_QTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([A-Za-z]+)").expect("decimal regex"));

static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^an?\s+(.+)$").expect("article regex"));

static PREPARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:finely|roughly|thinly)?\s*(chopped|diced|sliced|minced|grated|peeled)")
        .expect("preparation regex")
});

static CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:add|with|and|plus|of)\s+").expect("connector regex"));

/// Indeterminate-amount phrases: quantity stays unset, the phrase becomes the
/// unit. Phrases ending in "of" name the ingredient after them, the others
/// name it before. Matched on the original text so offsets stay valid for
/// non-ASCII input.
static SPECIAL_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)to taste|as needed|pinch of|dash of").expect("special phrase regex")
});

/// Unit positions these words can never fill; they belong to duration and
/// temperature extraction.
const UNIT_BLOCKLIST: &[&str] = &[
    "minute", "minutes", "hour", "hours", "second", "seconds", "degree", "degrees", "c", "f",
];

pub fn classify_animation(instruction: &str) -> AnimationType {
    let lower = instruction.to_lowercase();
    for (animation, keywords) in ANIMATION_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *animation;
        }
    }
    AnimationType::Waiting
}

pub fn extract_duration(instruction: &str) -> (Option<u32>, Option<DurationUnit>) {
    let caps = match DURATION.captures(instruction) {
        Some(caps) => caps,
        None => return (None, None),
    };
    let value = match caps[1].parse::<u32>() {
        Ok(v) => v,
        Err(_) => return (None, None),
    };
    let unit = match caps[2].to_lowercase().as_str() {
        "second" => DurationUnit::Seconds,
        "hour" => DurationUnit::Hours,
        _ => DurationUnit::Minutes,
    };
    (Some(value), Some(unit))
}

pub fn extract_temperature(instruction: &str) -> (Option<i32>, Option<TemperatureUnit>) {
    let caps = match TEMPERATURE.captures(instruction) {
        Some(caps) => caps,
        None => return (None, None),
    };
    let value = match caps[1].parse::<i32>() {
        Ok(v) => v,
        Err(_) => return (None, None),
    };
    let unit = if caps[2].eq_ignore_ascii_case("c") {
        TemperatureUnit::C
    } else {
        TemperatureUnit::F
    };
    (Some(value), Some(unit))
}

/// First quantity+unit match in a clause: fraction before decimal (tie-break
/// order), blocked units treated as no match. Returns (quantity, unit, end of
/// the matched span).
fn quantity_match(clause: &str) -> Option<(f64, String, usize)> {
    if let Some(caps) = FRACTION_QTY.captures(clause) {
        let numerator = caps[1].parse::<f64>().ok()?;
        let denominator = caps[2].parse::<f64>().ok()?;
        let unit = caps[3].to_string();
        if denominator != 0.0 && !UNIT_BLOCKLIST.contains(&unit.to_lowercase().as_str()) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            return Some((numerator / denominator, unit, end));
        }
    }

    let caps = DECIMAL_QTY.captures(clause)?;
    let value = caps[1].parse::<f64>().ok()?;
    let unit = caps[2].to_string();
    if UNIT_BLOCKLIST.contains(&unit.to_lowercase().as_str()) {
        return None;
    }
    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    Some((value, unit, end))
}

/// Parse one comma/period-delimited clause. The bool reports whether any
/// amount pattern actually fired; a pattern-less clause only survives the
/// outer filter when it names a known ingredient.
fn parse_clause(clause: &str) -> Option<(Ingredient, bool)> {
    let trimmed = clause.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut quantity = None;
    let mut unit = None;
    let mut name = trimmed.to_string();
    let mut matched_pattern = true;

    if let Some((value, matched_unit, end)) = quantity_match(trimmed) {
        quantity = Some(value);
        unit = Some(matched_unit);
        name = trimmed[end..].trim().to_string();
    } else if let Some(found) = SPECIAL_PHRASE.find(trimmed) {
        let phrase = found.as_str().to_lowercase();
        name = if phrase.ends_with("of") {
            trimmed[found.end()..].trim().to_string()
        } else {
            trimmed[..found.start()].trim().to_string()
        };
        unit = Some(phrase);
    } else if let Some(caps) = ARTICLE.captures(trimmed) {
        quantity = Some(1.0);
        name = caps[1].trim().to_string();
    } else {
        matched_pattern = false;
    }

    let prep_capture = PREPARATION
        .captures(&name)
        .and_then(|caps| caps.get(0).map(|full| (caps[1].to_lowercase(), full.range())));
    let preparation = prep_capture.map(|(method, range)| {
        name = format!("{}{}", &name[..range.start], &name[range.end..])
            .trim()
            .to_string();
        method
    });

    let name = CONNECTOR.replace(&name, "").trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some((
        Ingredient {
            name,
            quantity,
            unit,
            preparation,
        },
        matched_pattern,
    ))
}

/// Parse one ingredient list line ("2 cups stock") into an [`Ingredient`].
/// Unlike instruction clauses, a line with no amount pattern is still an
/// ingredient; the whole line becomes the name ("salt").
pub fn parse_ingredient_line(line: &str) -> Option<Ingredient> {
    parse_clause(line).map(|(ingredient, _)| ingredient)
}

const MATCH_STOPWORDS: &[&str] = &["the", "and", "with", "into", "in", "a", "an", "of", "some"];

/// Case-insensitive match between an extracted name and a known ingredient
/// name: substring either way, or any shared non-stopword. The word check
/// lets "pour in the stock" find "chicken stock".
fn matches_known(name: &str, known: &str) -> bool {
    if known == name || known.contains(name) || name.contains(known) {
        return true;
    }
    name.split_whitespace()
        .filter(|w| w.len() > 2 && !MATCH_STOPWORDS.contains(w))
        .any(|w| known.split_whitespace().any(|kw| kw == w))
}

/// Extract per-step ingredients from one instruction, cross-referencing the
/// caller's known ingredient list to prefer its quantities and units.
///
/// A clause that fired no amount pattern is only an ingredient mention if it
/// names something from the known list; otherwise it is narrative text and is
/// dropped.
pub fn extract_ingredients(instruction: &str, known: &[Ingredient]) -> Vec<Ingredient> {
    instruction
        .split([',', '.'])
        .filter_map(parse_clause)
        .filter_map(|(mut ingredient, matched_pattern)| {
            let lower = ingredient.name.to_lowercase();
            let matched = known
                .iter()
                .find(|k| matches_known(&lower, &k.name.to_lowercase()));

            match (matched, matched_pattern) {
                (Some(known_ingredient), true) => {
                    if known_ingredient.quantity.is_some() {
                        ingredient.quantity = known_ingredient.quantity;
                    }
                    if known_ingredient.unit.is_some() {
                        ingredient.unit = known_ingredient.unit.clone();
                    }
                    Some(ingredient)
                }
                // Mention without an amount: the known entry carries the
                // authoritative name and quantities.
                (Some(known_ingredient), false) => Some(known_ingredient.clone()),
                (None, true) => Some(ingredient),
                (None, false) => None,
            }
        })
        .collect()
}

/// The always-succeeding tier: one step per instruction, in input order.
/// `notes` is never populated here.
pub fn decompose_fallback(instructions: &[String], known: &[Ingredient]) -> Vec<ProcessedStep> {
    let total = instructions.len() as u32;
    instructions
        .iter()
        .enumerate()
        .map(|(index, instruction)| {
            let (duration, duration_unit) = extract_duration(instruction);
            let (temperature, temperature_unit) = extract_temperature(instruction);
            let action = if instruction.trim().is_empty() {
                format!("Step {}", index + 1)
            } else {
                instruction.trim().to_string()
            };

            ProcessedStep {
                step_number: index as u32 + 1,
                total_steps: total,
                action,
                ingredients: extract_ingredients(instruction, known),
                duration,
                duration_unit,
                temperature,
                temperature_unit,
                animation_type: Some(classify_animation(instruction)),
                notes: None,
            }
        })
        .collect()
}
