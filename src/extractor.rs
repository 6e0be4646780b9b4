//! Shopping-intent keyword extraction using a chat-completion model.
//!
//! The model is asked (via the configured system prompt) to answer with a
//! JSON array of strings. Anything else is treated as "no keywords".

mod normalizer;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::models::Keyword;
use crate::openai::{ChatClientTrait, ChatError, ChatRequest};

pub use normalizer::KeywordNormalizer;

/// Why an extraction produced no keywords.
///
/// None of these are fatal: callers degrade to an empty keyword list.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no API credential available")]
    MissingCredential,

    #[error("language-model request failed: {0}")]
    Request(#[from] ChatError),

    #[error("model output is not a JSON array of strings")]
    UnparseableOutput,
}

/// Extracts keywords from article text with a chat-completion model.
pub struct KeywordExtractor {
    client: Arc<dyn ChatClientTrait>,
}

impl KeywordExtractor {
    #[must_use]
    pub fn new(client: Arc<dyn ChatClientTrait>) -> Self {
        Self { client }
    }

    /// Asks the model for keywords, reporting why none were found.
    ///
    /// Without an API key this returns `MissingCredential` and no request is
    /// sent. An empty JSON array is a successful, empty result.
    pub fn extract(
        &self,
        content: &str,
        config: &PipelineConfig,
        api_key: Option<&str>,
    ) -> Result<Vec<Keyword>, ExtractionError> {
        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            return Err(ExtractionError::MissingCredential);
        };

        let request = ChatRequest::keyword_extraction(config, content);
        let response = self.client.complete(api_key, &request)?;

        let raw = response
            .first_content()
            .and_then(parse_keyword_array)
            .ok_or(ExtractionError::UnparseableOutput)?;

        let keywords = KeywordNormalizer::normalize_all(raw, config.normalization);
        debug!(count = keywords.len(), model = %config.model, "extracted keywords");
        Ok(keywords)
    }

    /// Fail-soft variant of [`extract`](Self::extract): any failure is logged
    /// and yields an empty list.
    pub fn extract_keywords(
        &self,
        content: &str,
        config: &PipelineConfig,
        api_key: Option<&str>,
    ) -> Vec<Keyword> {
        self.extract(content, config, api_key)
            .unwrap_or_else(|e| {
                warn!(error = %e, "keyword extraction failed");
                Vec::new()
            })
    }
}

/// Parses model output as a JSON array of strings.
///
/// A surrounding markdown code fence is tolerated; any other wrapper, a
/// non-array document, or a non-string element rejects the whole output.
fn parse_keyword_array(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    serde_json::from_str(trimmed)
        .ok()
        .or_else(|| serde_json::from_str(strip_code_fence(trimmed)?).ok())
}

/// Returns the body of a ```` ``` ```` or ```` ```json ```` fenced block.
fn strip_code_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?.strip_suffix("```")?;
    let body = body.strip_prefix("json").unwrap_or(body);
    Some(body.trim())
}
