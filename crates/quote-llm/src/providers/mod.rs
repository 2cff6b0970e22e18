//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the chat-completion services quote-brief talks to.

pub mod deepseek;

pub use deepseek::{DEFAULT_DEEPSEEK_MODEL, DeepSeekConfig, DeepSeekProvider};
