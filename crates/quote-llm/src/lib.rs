//! Chat-completion provider abstraction for quote-brief
//!
//! This crate provides provider-agnostic abstractions for sending a prompt to
//! a large language model and reading back its narrative answer. It includes:
//!
//! - Message types for chat-style requests
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - A DeepSeek provider speaking the OpenAI-compatible chat API (behind the
//!   `deepseek` feature, enabled by default)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "deepseek")]
pub mod providers;
