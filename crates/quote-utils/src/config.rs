//! Application configuration

use serde::{Deserialize, Serialize};

const DEFAULT_LOG_FILTER: &str = "info";

/// Process-level configuration shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name, reported when logging starts
    pub app_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub default_log_filter: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "quote-brief".to_string(),
            default_log_filter: DEFAULT_LOG_FILTER.to_string(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables
    ///
    /// `QUOTE_BRIEF_LOG` overrides the default filter and
    /// `QUOTE_BRIEF_LOG_JSON` (`1`/`true`) switches to JSON output.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(filter) = std::env::var("QUOTE_BRIEF_LOG") {
            if !filter.trim().is_empty() {
                config.default_log_filter = filter;
            }
        }
        if let Ok(flag) = std::env::var("QUOTE_BRIEF_LOG_JSON") {
            config.json_logs = parse_flag(&flag);
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
