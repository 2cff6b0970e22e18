//! DeepSeek provider implementation
//!
//! DeepSeek exposes an OpenAI-compatible chat completion endpoint. This module
//! implements the LLMProvider trait against it, non-streaming.
//! See: https://api-docs.deepseek.com/api/create-chat-completion
//!
//! # Examples
//!
//! ```no_run
//! use quote_llm::{CompletionRequest, LLMProvider};
//! use quote_llm::providers::DeepSeekProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads DEEPSEEK_API_KEY (required) and DEEPSEEK_BASE_URL (optional)
//!     let provider = DeepSeekProvider::from_env()?;
//!
//!     let request = CompletionRequest::user(
//!         provider.config().model.clone(),
//!         "Summarise HK.00700 at 320.0",
//!     );
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!
//!     Ok(())
//! }
//! ```
//!
//! Any other OpenAI-compatible server works the same way:
//!
//! ```no_run
//! use quote_llm::providers::{DeepSeekConfig, DeepSeekProvider};
//!
//! let config = DeepSeekConfig::new("not-needed")
//!     .with_base_url("http://localhost:1234/v1")
//!     .with_model("qwen2.5-7b-instruct")
//!     .with_timeout(300);
//! let provider = DeepSeekProvider::with_config(config)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMProvider, Result, Role,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
/// Reasoning model used when none is configured
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-reasoner";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the DeepSeek provider
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.deepseek.com")
    pub base_url: String,

    /// Model used when a caller does not pick one
    pub model: String,

    /// Request timeout in seconds (default: 300, reasoning models are slow)
    pub timeout_secs: u64,
}

impl DeepSeekConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_DEEPSEEK_BASE_URL.to_string(),
            model: DEFAULT_DEEPSEEK_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// `DEEPSEEK_API_KEY` is required; construction fails fast without it.
    /// `DEEPSEEK_BASE_URL` and `DEEPSEEK_MODEL` are optional overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError(
                    "DEEPSEEK_API_KEY environment variable not set".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("DEEPSEEK_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var("DEEPSEEK_MODEL") {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// Set custom base URL
    ///
    /// A trailing slash is dropped so the endpoint path joins cleanly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// DeepSeek provider
///
/// Works with `deepseek-reasoner` and `deepseek-chat`, and with any other
/// server that speaks the OpenAI chat completion format.
pub struct DeepSeekProvider {
    client: Client,
    config: DeepSeekConfig,
}

impl DeepSeekProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: DeepSeekConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(DeepSeekConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(DeepSeekConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &DeepSeekConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for DeepSeekProvider {
    #[instrument(skip(self, request), fields(model = %request.model, base_url = %self.config.base_url))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to {}", self.config.endpoint());

        let chat_request = build_chat_request(request);

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&chat_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let err = LLMError::from_status(status.as_u16(), &body);
            warn!(error = %err, transient = err.is_transient(), "DeepSeek request failed");
            return Err(err);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        parse_chat_response(chat_response)
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[serde(default)]
    prompt_cache_hit_tokens: u32,
    #[serde(default)]
    completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Deserialize)]
struct CompletionTokensDetails {
    #[serde(default)]
    reasoning_tokens: u32,
}

impl From<ChatUsage> for TokenUsage {
    fn from(usage: ChatUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            cached_prompt_tokens: usage.prompt_cache_hit_tokens,
            reasoning_tokens: usage
                .completion_tokens_details
                .map_or(0, |d| d.reasoning_tokens),
        }
    }
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Build the wire request; the system prompt becomes the first message
fn build_chat_request(request: CompletionRequest) -> ChatRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system) = request.system {
        messages.push(ChatMessage {
            role: Role::System.as_str(),
            content: system,
        });
    }

    messages.extend(request.messages.into_iter().map(|msg| ChatMessage {
        role: msg.role.as_str(),
        content: msg.content,
    }));

    ChatRequest {
        model: request.model,
        messages,
        stream: false,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Take the first choice; only its final `content` becomes the answer
fn parse_chat_response(response: ChatResponse) -> Result<CompletionResponse> {
    let usage = response.usage.map(TokenUsage::from).unwrap_or_default();

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let finish_reason = choice.finish_reason.unwrap_or_default();
    if finish_reason.is_truncated() {
        warn!(?finish_reason, "answer was cut short");
    }
    debug!(
        ?finish_reason,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        cached = usage.cached_prompt_tokens,
        reasoning = usage.reasoning_tokens,
        "received completion"
    );

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        reasoning: choice
            .message
            .reasoning_content
            .filter(|r| !r.is_empty()),
        finish_reason,
        usage,
    })
}
