/// Chat-completion client module.
///
/// This module provides a blocking HTTP client for OpenAI-compatible
/// chat-completion APIs, its wire types, and the trait used to mock it.
mod client;
mod types;

pub use client::{
    ChatClientTrait, ChatError, DEFAULT_BASE_URL, OpenAiClient, OpenAiClientBuilder,
    REQUEST_TIMEOUT,
};
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatResponseMessage, ChatRole};
