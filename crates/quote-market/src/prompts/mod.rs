//! Prompts sent to the analysis model
//!
//! - `static_info`: the multi-security static-info comparison prompt
//! - `quote`: the single symbol/price analysis prompt

mod quote;
mod static_info;

pub use quote::{format_price, quote_analysis_prompt, quote_analysis_template};
pub use static_info::{AnalysisPromptOptions, static_info_prompt};
