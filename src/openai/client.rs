/// Chat-completion HTTP client implementation.
///
/// This module provides `OpenAiClient` for making synchronous requests to an
/// OpenAI-compatible chat-completion API, along with its error type and builder.
use std::time::Duration;

use thiserror::Error;

use super::types::{ChatRequest, ChatResponse};

/// Default API base URL when neither the builder nor `OPENAI_BASE_URL` sets one.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Fixed upper bound on a single chat-completion request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest slice of an error response body kept for diagnostics.
const MAX_ERROR_BODY: usize = 300;

/// Errors that can occur when calling the chat-completion API.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status, with the start of the response body
    #[error("HTTP error: status {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body was not a chat-completion JSON document
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ChatError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ChatError::Timeout(error)
        } else {
            ChatError::Network(error)
        }
    }
}

/// Builder for constructing `OpenAiClient` instances.
///
/// # Examples
///
/// ```
/// use affil::openai::OpenAiClientBuilder;
///
/// let client = OpenAiClientBuilder::new()
///     .base_url("http://localhost:8080/v1")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAiClientBuilder {
    /// Creates a new `OpenAiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (e.g., "https://api.openai.com/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the request timeout. Production callers keep the default
    /// [`REQUEST_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OpenAiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method will check the
    /// `OPENAI_BASE_URL` environment variable. If not set, it defaults to
    /// [`DEFAULT_BASE_URL`].
    pub fn build(self) -> Result<OpenAiClient, ChatError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| ChatError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(REQUEST_TIMEOUT))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ChatError::Network)?;

        Ok(OpenAiClient {
            client,
            endpoint: format!("{}/chat/completions", base_url),
            base_url,
        })
    }
}

/// Synchronous client for an OpenAI-compatible chat-completion API.
///
/// Each call is a single attempt bounded by the configured timeout; there
/// is no retry.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    endpoint: String,
}

/// Chat-completion operations, abstracted so the pipeline can be tested
/// without network access.
pub trait ChatClientTrait: Send + Sync {
    /// Sends `request` authenticated with `api_key` and returns the decoded
    /// response.
    fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

impl OpenAiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the chat-completion endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatClientTrait for OpenAiClient {
    fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        // `json()` also sets `Content-Type: application/json`.
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .map_err(ChatError::from_transport)?;

        let status = response.status();
        let body = response.text().map_err(ChatError::from_transport)?;

        if !status.is_success() {
            return Err(ChatError::Http {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(ChatError::Serialization)
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
