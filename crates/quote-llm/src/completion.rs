//! Chat completion request and response types

use crate::Message;
use serde::{Deserialize, Serialize};

/// A chat completion call
///
/// quote-brief sends one user turn per call, optionally preceded by system
/// instructions; [`CompletionRequest::user`] covers that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,

    /// Sent ahead of `messages` as a system turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Ignored by `deepseek-reasoner`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Single-turn request carrying `prompt` as the user message
    pub fn user(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model).with_message(Message::user(prompt))
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Blank instructions are dropped
    pub fn with_system(mut self, system: Option<String>) -> Self {
        self.system = system.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Why generation ended, as reported in `finish_reason`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    #[default]
    Stop,
    /// Hit `max_tokens` or the context window
    Length,
    ContentFilter,
    /// Server ran out of capacity mid-answer; the text is truncated
    InsufficientSystemResource,
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// Whether the answer ended before the model finished it
    pub fn is_truncated(self) -> bool {
        matches!(self, Self::Length | Self::InsufficientSystemResource)
    }
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// Prompt tokens served from DeepSeek's context cache
    pub cached_prompt_tokens: u32,
    /// Completion tokens spent on the reasoning trace
    pub reasoning_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The model's answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Final answer, empty when the model returned none
    pub content: String,

    /// Reasoning trace of reasoning models, never part of `content`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    pub fn text(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_single_turn_request() {
        let request = CompletionRequest::user("deepseek-reasoner", "Analyse HK.00700")
            .with_system(Some("You are a financial analyst".to_string()))
            .with_max_tokens(2048)
            .with_temperature(0.7);

        assert_eq!(request.model, "deepseek-reasoner");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.system.as_deref(), Some("You are a financial analyst"));
    }

    #[test]
    fn test_blank_system_dropped() {
        let request = CompletionRequest::new("m").with_system(Some("   ".to_string()));
        assert!(request.system.is_none());
        let request = CompletionRequest::new("m").with_system(None);
        assert!(request.system.is_none());
    }

    #[test]
    fn test_finish_reason_wire_names() {
        let parse = |s: &str| serde_json::from_str::<FinishReason>(&format!("\"{s}\"")).unwrap();
        assert_eq!(parse("stop"), FinishReason::Stop);
        assert_eq!(parse("length"), FinishReason::Length);
        assert_eq!(
            parse("insufficient_system_resource"),
            FinishReason::InsufficientSystemResource
        );
        assert_eq!(parse("tool_calls"), FinishReason::Unknown);

        assert!(FinishReason::Length.is_truncated());
        assert!(FinishReason::InsufficientSystemResource.is_truncated());
        assert!(!FinishReason::Stop.is_truncated());
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
            cached_prompt_tokens: 64,
            reasoning_tokens: 30,
        };
        assert_eq!(usage.total(), 150);
    }
}
