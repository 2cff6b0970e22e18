//! Prompt construction for quote-brief
//!
//! Three ways to produce prompt text:
//!
//! - [`JinjaTemplate`]: named templates with Chinese and English bodies,
//!   rendered with MiniJinja
//! - [`PromptBuilder`]: line-oriented builder for sectioned prompts with
//!   `【heading】` blocks, bullet lists and keycap-numbered task lists
//! - `PromptLayers` (feature `file-loader`): YAML prompt files merged from
//!   foundation to scenario, with `{var}` substitution
//!
//! # Quick Start
//!
//! ```
//! use quote_prompt::{JinjaTemplate, Language, PromptBuilder};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::bilingual(
//!     "analyst",
//!     "Analyze {{ symbol }}",
//!     "分析 {{ symbol }}",
//! ).unwrap();
//! let en = template.render(Language::English, &json!({ "symbol": "700.HK" })).unwrap();
//! assert_eq!(en, "Analyze 700.HK");
//!
//! let prompt = PromptBuilder::new()
//!     .line("Title")
//!     .blank_line()
//!     .heading("额外要求")
//!     .bullets(["Be brief"])
//!     .build();
//! assert_eq!(prompt, "Title\n\n【额外要求】\n- Be brief");
//! ```

mod builder;
mod error;
mod language;
mod template;

#[cfg(feature = "file-loader")]
mod layers;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use language::Language;
pub use template::JinjaTemplate;

#[cfg(feature = "file-loader")]
pub use layers::{LayeredPrompt, PromptLayers, RENDERED_KEYS, render_placeholders};
