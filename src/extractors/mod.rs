use crate::error::ExtractError;
use crate::model::RawRecipe;
use scraper::Html;

mod html_class;
mod json_ld;

pub use self::html_class::HtmlClassExtractor;
pub use self::json_ld::JsonLdExtractor;

/// A strategy for recovering raw recipe fields from a parsed page.
///
/// The pipeline tries the structured-data extractor first and falls back to
/// the heuristic one; both signal "nothing here" with
/// [`ExtractError::NoRecipeData`].
pub trait Extractor {
    fn parse(&self, document: &Html) -> Result<RawRecipe, ExtractError>;
}
