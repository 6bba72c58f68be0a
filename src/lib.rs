//! cookflow turns recipe web pages into structured, scalable recipe data.
//!
//! The pipeline has two halves:
//!
//! 1. **Extraction** — fetch a page, read its JSON-LD structured data (or fall
//!    back to class-name heuristics when a site has none), and normalize the
//!    result into a [`Recipe`], optionally rescaling ingredient quantities to
//!    a requested number of servings.
//! 2. **Decomposition** — turn free-text instructions into [`ProcessedStep`]s
//!    via a structured LLM call, with a deterministic regex tier that takes
//!    over whenever the provider is unavailable or replies with garbage.
//!
//! ```no_run
//! # async fn run() -> Result<(), cookflow::ExtractError> {
//! let recipe = cookflow::extract_recipe("https://example.com/lasagna", Some(8)).await?;
//! let steps = cookflow::process_instructions(&recipe.instructions, &[]).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod providers;
pub mod quantity;
pub mod steps;

pub use error::ExtractError;
pub use model::{Ingredient, ProcessedStep, RawRecipe, Recipe};

use config::AppConfig;
use extractors::{Extractor, HtmlClassExtractor, JsonLdExtractor};
use fetcher::PageFetcher;
use log::{debug, info, warn};
use providers::{LlmProvider, ProviderFactory};
use scraper::Html;
use std::time::Duration;

/// Extract a recipe from an already-fetched HTML document.
///
/// Tries structured data first and degrades to class-name heuristics;
/// `Err(ExtractError::NoRecipeData)` means both tiers came up empty.
pub fn extract_recipe_from_html(
    html: &str,
    servings: Option<u32>,
) -> Result<Recipe, ExtractError> {
    // `Html` is parsed and dropped inside this block so the async callers
    // never hold it across an await point.
    let raw = {
        let document = Html::parse_document(html);
        match JsonLdExtractor.parse(&document) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Structured data pass failed ({}), trying class heuristics", e);
                HtmlClassExtractor.parse(&document)?
            }
        }
    };

    Ok(normalize::normalize(raw, servings))
}

/// Fetch a recipe page and extract a [`Recipe`] from it.
///
/// `servings` rescales ingredient quantities relative to the page's own
/// yield; `None` leaves ingredient text untouched.
pub async fn extract_recipe(url: &str, servings: Option<u32>) -> Result<Recipe, ExtractError> {
    let app_config = load_config();
    let fetcher = PageFetcher::new(Some(Duration::from_secs(app_config.fetch_timeout)))?;

    let html = fetcher.fetch(url).await?;
    let recipe = extract_recipe_from_html(&html, servings)?;
    info!("Extracted recipe '{}' from {}", recipe.name, url);
    Ok(recipe)
}

/// Decompose free-text instructions into structured steps.
///
/// Uses the configured default provider when one can be constructed and
/// degrades to the deterministic regex tier otherwise, so this never fails:
/// the result always has exactly one step per instruction.
pub async fn process_instructions(
    instructions: &[String],
    ingredients: &[Ingredient],
) -> Vec<ProcessedStep> {
    let app_config = load_config();
    match ProviderFactory::get_default_provider(&app_config) {
        Ok(provider) => steps::decompose(instructions, ingredients, provider.as_ref()).await,
        Err(e) => {
            warn!("No usable provider ({}), using regex fallback", e);
            steps::decompose_fallback(instructions, ingredients)
        }
    }
}

/// Parse a recipe's ingredient lines into [`Ingredient`]s for the
/// decomposer's cross-referencing, so step text like "pour in the stock" can
/// pick up the quantity the ingredient list declared.
pub fn known_ingredients(lines: &[String]) -> Vec<Ingredient> {
    lines
        .iter()
        .filter_map(|line| steps::parse_ingredient_line(line))
        .collect()
}

/// Like [`process_instructions`] but with an explicit provider, bypassing
/// configuration. The fallback tier still applies on provider failure.
pub async fn process_instructions_with_provider(
    instructions: &[String],
    ingredients: &[Ingredient],
    provider: &dyn LlmProvider,
) -> Vec<ProcessedStep> {
    steps::decompose(instructions, ingredients, provider).await
}

fn load_config() -> AppConfig {
    AppConfig::load().unwrap_or_else(|e| {
        warn!("Configuration load failed ({}), using defaults", e);
        AppConfig::default()
    })
}
