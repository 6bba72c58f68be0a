mod factory;
mod google;
mod open_ai;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for structured-generation providers.
///
/// A provider receives one combined prompt and must come back with JSON text.
/// Everything about the call is fallible — network, quota, malformed output —
/// and callers are expected to treat any failure as recoverable.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Run one structured-generation call and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}
