use serde::{Deserialize, Serialize};

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const FEEDBACK_MODEL: &str = "gpt-3.5-turbo";
pub const FEEDBACK_PROMPT: &str = "hello";
pub const FEEDBACK_TEMPERATURE: f32 = 0.7;
pub const FEEDBACK_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// The fixed feedback request: a single `hello` user message.
    pub fn placeholder() -> Self {
        Self {
            model: FEEDBACK_MODEL.to_string(),
            messages: vec![ChatMessage::user(FEEDBACK_PROMPT)],
            temperature: FEEDBACK_TEMPERATURE,
            max_tokens: FEEDBACK_MAX_TOKENS,
        }
    }
}

/// Minimal subset of the completion response we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the API returned one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}
