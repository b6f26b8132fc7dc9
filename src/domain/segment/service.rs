use super::model::ProcessedText;
use super::provider::{ProcessingError, SegmentProvider};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// A single provider prompt handles at most this many characters; longer
/// documents are cut off rather than split across requests.
const MAX_DOCUMENT_CHARS: usize = 4000;

/// Front of the segment provider: cleans and truncates the document text,
/// caches results so a user-initiated retry of the same document does not
/// burn provider quota, and logs the round trip.
pub struct SegmentService {
    provider: Arc<dyn SegmentProvider>,
    cache: Option<Cache<String, ProcessedText>>,
}

impl SegmentService {
    pub fn new(provider: Arc<dyn SegmentProvider>, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { provider, cache }
    }

    /// Produce the playlist for a document, going through the cache.
    pub async fn produce(
        &self,
        text: &str,
        title: &str,
    ) -> Result<ProcessedText, ProcessingError> {
        tracing::info!(
            title = %title,
            text_length = text.len(),
            "Segment production request"
        );

        let cleaned = Self::prepare_text(text);
        if cleaned.is_empty() {
            return Err(ProcessingError::Invalid(
                "Document contains no readable text".to_string(),
            ));
        }

        let cache_key = format!("{title}\u{1f}{cleaned}");

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(
                    title = %title,
                    segment_count = cached.len(),
                    "Segment cache hit - returning cached playlist"
                );
                return Ok(cached);
            }
        }

        let processed = self.provider.produce_segments(&cleaned, title).await?;

        tracing::info!(
            title = %title,
            cleaned_length = cleaned.len(),
            segment_count = processed.len(),
            "Segments produced"
        );

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, processed.clone()).await;
        }

        Ok(processed)
    }

    /// Normalize whitespace and truncate to the provider's prompt limit.
    fn prepare_text(text: &str) -> String {
        let whitespace_pattern = regex::Regex::new(r"\s+").unwrap();
        let normalized = whitespace_pattern.replace_all(text, " ");
        let trimmed = normalized.trim();

        // Truncate on a character boundary, never mid code point
        trimmed.chars().take(MAX_DOCUMENT_CHARS).collect()
    }
}
