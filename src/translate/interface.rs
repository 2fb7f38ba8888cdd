use async_trait::async_trait;
use thiserror::Error;

/// Result of a single provider call
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Source language as reported by the provider, which may differ from
    /// the requested one when the provider auto-detects it
    pub source_language: String,
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected translation response: {0}")]
    UnexpectedResponse(String),
}

/// Translate interface - the actual translation happens in an external service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source` - Source language code, `auto` lets the provider detect it
    /// * `target` - Target language code
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError>;

    /// Short provider name used in logs
    fn name(&self) -> &str;
}
