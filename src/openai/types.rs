use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl ChatRequest {
    /// Builds the two-message keyword extraction conversation: the configured
    /// prompt as the system message and the article text as the user message.
    pub fn keyword_extraction(config: &PipelineConfig, content: &str) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage::system(config.prompt.clone()),
                ChatMessage::user(content),
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
        }
    }
}

/// The subset of the chat-completion response the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Returns `choices[0].message.content`, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordNormalization;

    fn config() -> PipelineConfig {
        PipelineConfig {
            model: "gpt-4o-mini".to_string(),
            prompt: "List product keywords".to_string(),
            max_tokens: 100,
            temperature: 0.3,
            frequency_penalty: 0.1,
            presence_penalty: 0.2,
            normalization: KeywordNormalization::Verbatim,
        }
    }

    #[test]
    fn keyword_extraction_request_serializes_to_wire_format() {
        let request = ChatRequest::keyword_extraction(&config(), "Best mats for hot yoga");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "List product keywords");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Best mats for hot yoga");
        assert_eq!(json["max_tokens"], 100);
        assert!(json["temperature"].as_f64().is_some());
        assert!(json["frequency_penalty"].as_f64().is_some());
        assert!(json["presence_penalty"].as_f64().is_some());
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn first_content_reads_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"[\"yoga mat\"]"}}]}"#,
        )
        .unwrap();

        assert_eq!(response.first_content(), Some(r#"["yoga mat"]"#));
    }

    #[test]
    fn first_content_is_none_without_choices_or_content() {
        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_content(), None);

        let null_content: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.first_content(), None);
    }
}
