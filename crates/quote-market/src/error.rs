//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Symbol input was empty or whitespace
    #[error("Empty symbol")]
    EmptySymbol,

    /// Symbol matched none of the recognised formats
    #[error("Invalid symbol format: {0}")]
    InvalidSymbolFormat(String),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// CSV header row lacks the required column
    #[error("Missing '{column}' column in header of {path}")]
    MissingHeader { column: String, path: String },

    /// No symbol survived normalisation
    #[error("No valid symbols in {0}")]
    NoValidSymbols(String),

    /// Text could not be repaired into JSON
    #[error("Malformed input: {detail} (text: {text})")]
    MalformedInput { detail: String, text: String },

    /// CSV reader error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// File system error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// LongPort SDK error (connection, authentication, request)
    #[error("LongPort error: {0}")]
    LongPortError(#[from] longport::Error),

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Market data API returned an error
    #[error("API error: {0}")]
    ApiError(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    LlmError(#[from] quote_llm::LLMError),

    /// Prompt construction error
    #[error("Prompt error: {0}")]
    PromptError(#[from] quote_prompt::PromptError),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    /// Whether this error only affects a single row or record
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::EmptySymbol | Self::InvalidSymbolFormat(_) | Self::MalformedInput { .. }
        )
    }
}
