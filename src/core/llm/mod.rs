pub mod providers;

use anyhow::Result;
use async_trait::async_trait;

/// Opaque text-completion function. The pipeline sends one prompt and reads
/// one text reply per chat turn; everything else about the provider is its
/// own business.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String>;
}
