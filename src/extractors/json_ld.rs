use crate::error::ExtractError;
use crate::extractors::Extractor;
use crate::model::{Nutrition, RawRecipe};
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

/// Extracts recipes from embedded `application/ld+json` blocks.
pub struct JsonLdExtractor;

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Clean up JSON-LD payloads before parsing. Real pages wrap these in HTML
/// comments, prepend junk, or leave trailing commas.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str.trim().to_string();

    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find('{') {
            cleaned = cleaned[start..].to_string();
        }
    }

    cleaned = cleaned.replace(",]", "]").replace(",}", "}");
    cleaned = cleaned.replace(r"<!--", "").replace("-->", "");

    cleaned
}

fn type_matches(value: &Value, expected: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == expected,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(expected)),
        _ => false,
    }
}

/// Ordered shape matchers for one JSON-LD block; the first that produces a
/// Recipe node wins:
///   (a) top-level array containing a Recipe entity
///   (b) `@graph` array, same type rule
///   (c) the block itself is a Recipe
///   (d) a WebPage wrapping a Recipe `mainEntity`
fn resolve_recipe_node(root: &Value) -> Option<&Value> {
    if let Some(items) = root.as_array() {
        return items.iter().find(|item| type_matches(item, "Recipe"));
    }

    if let Some(graph) = root.get("@graph").and_then(Value::as_array) {
        if let Some(found) = graph.iter().find(|item| type_matches(item, "Recipe")) {
            return Some(found);
        }
    }

    if type_matches(root, "Recipe") {
        return Some(root);
    }

    if type_matches(root, "WebPage") {
        if let Some(main) = root.get("mainEntity") {
            if type_matches(main, "Recipe") {
                return Some(main);
            }
        }
    }

    None
}

fn string_field(node: &Value, key: &str) -> String {
    node.get(key)
        .and_then(Value::as_str)
        .map(decode_html_symbols)
        .unwrap_or_default()
}

/// Coalesce a string-or-array-or-object field to one string. Arrays use their
/// first element; objects their `url` (image objects embed one).
fn string_or_first(node: &Value, key: &str) -> String {
    let value = match node.get(key) {
        Some(v) => v,
        None => return String::new(),
    };
    let text = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => item.get("url").and_then(Value::as_str),
            _ => None,
        }),
        Value::Object(_) => value.get("url").and_then(Value::as_str),
        _ => None,
    };
    text.map(decode_html_symbols).unwrap_or_default()
}

/// One instruction entry may be a bare string or an object carrying `text`,
/// `name` or `description` (HowToStep included). Priority: text > name >
/// description.
fn instruction_text(entry: &Value) -> Option<String> {
    let text = match entry {
        Value::String(s) => Some(s.as_str()),
        Value::Object(_) => ["text", "name", "description"]
            .iter()
            .find_map(|key| entry.get(key).and_then(Value::as_str)),
        _ => None,
    };
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(decode_html_symbols)
}

fn instructions(node: &Value) -> Vec<String> {
    match node.get("recipeInstructions") {
        Some(Value::Array(entries)) => entries.iter().filter_map(instruction_text).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            vec![decode_html_symbols(s.trim())]
        }
        _ => Vec::new(),
    }
}

fn ingredients(node: &Value) -> Vec<String> {
    node.get("recipeIngredient")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| decode_html_symbols(s.trim()))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn keywords(node: &Value) -> Vec<String> {
    match node.get("keywords") {
        Some(Value::String(s)) => s
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn nutrition(node: &Value) -> Nutrition {
    match node.get("nutrition") {
        Some(n) => Nutrition {
            calories: string_field(n, "calories"),
            protein_content: string_field(n, "proteinContent"),
            fat_content: string_field(n, "fatContent"),
            carbohydrate_content: string_field(n, "carbohydrateContent"),
        },
        None => Nutrition::default(),
    }
}

fn map_recipe_node(node: &Value) -> RawRecipe {
    RawRecipe {
        name: string_field(node, "name"),
        description: string_field(node, "description"),
        image: string_or_first(node, "image"),
        ingredients: ingredients(node),
        instructions: instructions(node),
        // Time fields stay as the page's raw ISO-8601-style strings.
        total_time: string_field(node, "totalTime"),
        cook_time: string_field(node, "cookTime"),
        prep_time: string_field(node, "prepTime"),
        yield_text: string_or_first(node, "recipeYield"),
        category: string_or_first(node, "recipeCategory"),
        cuisine: string_or_first(node, "recipeCuisine"),
        keywords: keywords(node),
        nutrition: nutrition(node),
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, document: &Html) -> Result<RawRecipe, ExtractError> {
        let selector =
            Selector::parse("script[type='application/ld+json']").expect("static selector");

        // First matching block in document order wins. A block that fails to
        // parse is skipped, never aborts the scan.
        for script in document.select(&selector) {
            let cleaned = sanitize_json(&script.inner_html());
            let root: Value = match serde_json::from_str(&cleaned) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping malformed JSON-LD block: {}", e);
                    continue;
                }
            };

            if let Some(node) = resolve_recipe_node(&root) {
                debug!("Found JSON-LD recipe node");
                return Ok(map_recipe_node(node));
            }
        }

        Err(ExtractError::NoRecipeData)
    }
}
