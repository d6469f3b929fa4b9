use crate::error::GenerateError;
use async_trait::async_trait;

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// Dyn-compatible single-shot text generation.
///
/// Implemented by provider agents; callers hold an `Arc<dyn TextGenerator>`
/// so the provider can be swapped for an in-process double.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
