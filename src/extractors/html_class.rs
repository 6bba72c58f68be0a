use crate::error::ExtractError;
use crate::extractors::Extractor;
use crate::model::{Nutrition, RawRecipe};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Heuristic fallback extractor for pages without structured-data markup.
///
/// Three tiers, each only consulted when the previous one came up empty:
/// class-name selection, "Section:" label-anchored sibling scanning, and a
/// page-wide last-resort sweep.
pub struct HtmlClassExtractor;

static INGREDIENTS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ingredients?:").expect("ingredients label regex"));

static INSTRUCTIONS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^instructions?:|^directions?:|^steps?:").expect("instructions label regex")
});

static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ingredients?:|^instructions?:|^directions?:|^steps?:")
        .expect("section label regex")
});

/// List items starting with these markers are recipe metadata, not ingredients.
static NON_INGREDIENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^step|^instruction|^prep|^cook|^total").expect("marker regex"));

/// Paragraphs that look like a numbered or imperative step.
static STEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^step|^instruction|^\d+\.|^[a-z]\.").expect("step regex"));

fn selector(source: &str) -> Selector {
    Selector::parse(source).expect("static selector")
}

fn element_text(el: ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, source: &str) -> String {
    document
        .select(&selector(source))
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn all_texts(document: &Html, source: &str) -> Vec<String> {
    document
        .select(&selector(source))
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn first_attr(document: &Html, source: &str, attr: &str) -> String {
    document
        .select(&selector(source))
        .find_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Tier 2: find the first heading/paragraph/div whose text is a section label
/// and walk its following siblings, collecting list items (also those nested
/// in a sibling ul/ol) and non-label paragraphs. Ingredient scans stop at the
/// instructions label; instruction scans run to the end of the siblings.
fn label_anchored_items(document: &Html, label: &Regex, stop_at: Option<&Regex>) -> Vec<String> {
    let anchors = selector("p, div, h2, h3, h4");
    let anchor = match document
        .select(&anchors)
        .find(|el| label.is_match(&element_text(*el)))
    {
        Some(el) => el,
        None => return Vec::new(),
    };

    let li = selector("li");
    let mut items = Vec::new();

    for node in anchor.next_siblings() {
        let el = match ElementRef::wrap(node) {
            Some(el) => el,
            None => continue,
        };
        let text = element_text(el);

        if let Some(boundary) = stop_at {
            if boundary.is_match(&text) {
                break;
            }
        }

        match el.value().name() {
            "li" => {
                if !text.is_empty() {
                    items.push(text);
                }
            }
            "ul" | "ol" => {
                for item in el.select(&li) {
                    let item_text = element_text(item);
                    if !item_text.is_empty() {
                        items.push(item_text);
                    }
                }
            }
            "p" => {
                if !text.is_empty() && !SECTION_LABEL.is_match(&text) {
                    items.push(text);
                }
            }
            _ => {}
        }
    }

    items
}

fn tier3_ingredients(document: &Html) -> Vec<String> {
    all_texts(document, "ul li, ol li")
        .into_iter()
        .filter(|t| !NON_INGREDIENT_MARKER.is_match(t))
        .collect()
}

fn tier3_instructions(document: &Html) -> Vec<String> {
    all_texts(document, "p, div")
        .into_iter()
        .filter(|t| STEP_PATTERN.is_match(t))
        .collect()
}

impl Extractor for HtmlClassExtractor {
    fn parse(&self, document: &Html) -> Result<RawRecipe, ExtractError> {
        debug!("Attempting heuristic DOM extraction");

        // Tier 1: conventional recipe-markup class names.
        let mut ingredients = all_texts(
            document,
            ".ingredients li, .ingredient-item, [class*='ingredient'] li",
        );
        let mut instructions = all_texts(
            document,
            ".instructions li, .steps li, [class*='instruction'] li, [class*='step'] li",
        );

        // Tier 2: label-anchored sibling scan for whichever list is missing.
        if ingredients.is_empty() {
            ingredients =
                label_anchored_items(document, &INGREDIENTS_LABEL, Some(&INSTRUCTIONS_LABEL));
        }
        if instructions.is_empty() {
            instructions = label_anchored_items(document, &INSTRUCTIONS_LABEL, None);
        }

        // Tier 3: last-resort page-wide sweep.
        if ingredients.is_empty() {
            ingredients = tier3_ingredients(document);
        }
        if instructions.is_empty() {
            instructions = tier3_instructions(document);
        }

        if ingredients.is_empty() && instructions.is_empty() {
            return Err(ExtractError::NoRecipeData);
        }

        let mut name = first_text(document, "h1");
        if name.is_empty() {
            name = first_text(document, "[class*='title']");
        }
        if name.is_empty() {
            name = "Untitled Recipe".to_string();
        }

        let mut image = first_attr(
            document,
            ".recipe-image img, .recipe-photo img, [class*='recipe'] img",
            "src",
        );
        if image.is_empty() {
            image = first_attr(document, "meta[property='og:image']", "content");
        }
        if image.is_empty() {
            image = first_attr(document, "meta[name='twitter:image']", "content");
        }

        let mut yield_text = first_text(document, "[class*='yield']");
        if yield_text.is_empty() {
            yield_text = first_text(document, "[class*='servings']");
        }

        debug!(
            "Heuristic extraction found {} ingredients, {} instructions",
            ingredients.len(),
            instructions.len()
        );

        Ok(RawRecipe {
            name,
            description: first_text(document, ".recipe-description, [class*='description']"),
            image,
            ingredients,
            instructions,
            total_time: first_text(document, "[class*='total-time']"),
            cook_time: first_text(document, "[class*='cook-time']"),
            prep_time: first_text(document, "[class*='prep-time']"),
            yield_text,
            category: first_text(document, "[class*='category']"),
            cuisine: first_text(document, "[class*='cuisine']"),
            keywords: all_texts(document, "[class*='keywords'] li, [class*='tags'] li"),
            nutrition: Nutrition {
                calories: first_text(document, "[class*='calories']"),
                protein_content: first_text(document, "[class*='protein']"),
                fat_content: first_text(document, "[class*='fat']"),
                carbohydrate_content: first_text(
                    document,
                    "[class*='carbs'], [class*='carbohydrate']",
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier1_class_names() {
        let html = r#"
            <html><body>
            <h1>Tomato Soup</h1>
            <div class="recipe-description">A simple soup.</div>
            <ul class="ingredients">
                <li>4 tomatoes</li>
                <li>1 onion</li>
            </ul>
            <ol class="instructions">
                <li>Chop the vegetables</li>
                <li>Simmer for 20 minutes</li>
            </ol>
            <span class="recipe-servings">4 servings</span>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();

        assert_eq!(result.name, "Tomato Soup");
        assert_eq!(result.description, "A simple soup.");
        assert_eq!(result.ingredients, vec!["4 tomatoes", "1 onion"]);
        assert_eq!(
            result.instructions,
            vec!["Chop the vegetables", "Simmer for 20 minutes"]
        );
        assert_eq!(result.yield_text, "4 servings");
    }

    #[test]
    fn test_tier2_label_anchored() {
        let html = r#"
            <html><body>
            <h1>Plain Blog Recipe</h1>
            <h3>Ingredients:</h3>
            <ul>
                <li>2 cups flour</li>
                <li>1 cup water</li>
            </ul>
            <h3>Instructions:</h3>
            <p>Mix the flour and water.</p>
            <p>Knead into a dough.</p>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();

        assert_eq!(result.ingredients, vec!["2 cups flour", "1 cup water"]);
        assert_eq!(
            result.instructions,
            vec!["Mix the flour and water.", "Knead into a dough."]
        );
    }

    #[test]
    fn test_tier2_ingredient_scan_stops_at_instructions_label() {
        let html = r#"
            <html><body>
            <p>Ingredients:</p>
            <p>3 eggs</p>
            <p>Directions:</p>
            <p>Beat the eggs.</p>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();

        assert_eq!(result.ingredients, vec!["3 eggs"]);
        assert_eq!(result.instructions, vec!["Beat the eggs."]);
    }

    #[test]
    fn test_tier3_last_resort() {
        let html = r#"
            <html><body>
            <h1>Bare Page</h1>
            <ul>
                <li>1 lemon</li>
                <li>Prep time: 5 minutes</li>
            </ul>
            <p>1. Squeeze the lemon.</p>
            <p>Nothing steppy here.</p>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();

        // Metadata-looking list items are filtered out of ingredients.
        assert_eq!(result.ingredients, vec!["1 lemon"]);
        assert_eq!(result.instructions, vec!["1. Squeeze the lemon."]);
    }

    #[test]
    fn test_no_data_fails() {
        let html = "<html><body><h1>Nothing here</h1></body></html>";
        let result = HtmlClassExtractor.parse(&Html::parse_document(html));
        assert!(matches!(result, Err(ExtractError::NoRecipeData)));
    }

    #[test]
    fn test_name_fallbacks() {
        let html = r#"
            <html><body>
            <div class="post-title">Styled Title</div>
            <ul class="ingredients"><li>1 thing</li></ul>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();
        assert_eq!(result.name, "Styled Title");

        let html = r#"
            <html><body>
            <ul class="ingredients"><li>1 thing</li></ul>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();
        assert_eq!(result.name, "Untitled Recipe");
    }

    #[test]
    fn test_og_image_fallback() {
        let html = r#"
            <html><head>
            <meta property="og:image" content="https://example.com/og.jpg">
            </head><body>
            <ul class="ingredients"><li>1 egg</li></ul>
            </body></html>
        "#;
        let result = HtmlClassExtractor
            .parse(&Html::parse_document(html))
            .unwrap();
        assert_eq!(result.image, "https://example.com/og.jpg");
    }
}
