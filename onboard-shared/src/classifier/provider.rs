//! Text completion providers.
//!
//! The classifier only needs "prompt in, text out", so the seam is a single
//! async method. Implementations must be cheap to share behind an `Arc`.

use async_trait::async_trait;

/// Failure of an external completion call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Network, authentication or HTTP-level failure, or a response that
    /// could not be understood.
    #[error("Completion service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier, used in logs.
    fn model_name(&self) -> &str;

    /// Requests a completion for a single user prompt.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

/// Provider used when no completion service is configured.
///
/// Every call fails, so callers always take their fallback path.
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider;

#[async_trait]
impl CompletionProvider for UnavailableProvider {
    fn model_name(&self) -> &str {
        "unavailable"
    }

    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
        Err(CompletionError::ServiceUnavailable(
            "no completion service configured".to_string(),
        ))
    }
}
