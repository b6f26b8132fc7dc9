use super::model::ProcessedText;
use async_trait::async_trait;

/// Failure modes of segment production. All of them are terminal for the
/// session attempt: the caller gets no partial playlist and may retry.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Provider of translated, phonetically annotated segments.
/// Abstracts the underlying translation backend (Gemini, OpenAI, etc.)
///
/// Implementations are responsible for:
/// - Splitting the text into logical sentences or short phrases
/// - Translating each sentence into Portuguese
/// - Rendering a PT-BR phonetic approximation of the English original
#[async_trait]
pub trait SegmentProvider: Send + Sync {
    /// Produce the ordered playlist of segments for a document.
    ///
    /// # Arguments
    /// * `text` - The cleaned document text (plain text, normalized whitespace)
    /// * `title` - The document title, carried through to the result
    ///
    /// # Errors
    /// Returns `ProcessingError` on network, parse, or quota failure. No
    /// partial results are ever returned.
    async fn produce_segments(
        &self,
        text: &str,
        title: &str,
    ) -> Result<ProcessedText, ProcessingError>;
}
