//! MiniJinja-backed prompt templates
//!
//! A [`JinjaTemplate`] holds one template body per [`Language`] and renders
//! the requested one, falling back to whichever variant exists.

use crate::{Language, PromptError, Result};
use minijinja::Environment;
use std::collections::HashMap;

/// A named prompt template with one Jinja body per language
///
/// Templates are rendered with `trim_blocks` and `lstrip_blocks` enabled so
/// block tags can sit on their own lines without leaking blank lines into
/// the prompt.
///
/// ```
/// use quote_prompt::{JinjaTemplate, Language};
/// use serde_json::json;
///
/// let template = JinjaTemplate::bilingual(
///     "greeting",
///     "Hello, {{ name }}!",
///     "你好，{{ name }}！",
/// ).unwrap();
///
/// let zh = template.render(Language::Chinese, &json!({ "name": "世界" })).unwrap();
/// assert_eq!(zh, "你好，世界！");
/// ```
pub struct JinjaTemplate {
    name: String,
    bodies: HashMap<Language, String>,
}

impl JinjaTemplate {
    /// Create a single-language template
    pub fn new(
        name: impl Into<String>,
        language: Language,
        body: impl Into<String>,
    ) -> Result<Self> {
        let mut bodies = HashMap::new();
        bodies.insert(language, body.into());
        Self::from_bodies(name.into(), bodies)
    }

    /// Create with English and Chinese bodies
    pub fn bilingual(
        name: impl Into<String>,
        english: impl Into<String>,
        chinese: impl Into<String>,
    ) -> Result<Self> {
        let mut bodies = HashMap::new();
        bodies.insert(Language::Chinese, chinese.into());
        bodies.insert(Language::English, english.into());
        Self::from_bodies(name.into(), bodies)
    }

    fn from_bodies(name: String, bodies: HashMap<Language, String>) -> Result<Self> {
        let env = environment();
        for (lang, body) in &bodies {
            env.template_from_str(body)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }
        Ok(Self { name, bodies })
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a body exists for `lang`
    pub fn supports(&self, lang: Language) -> bool {
        self.bodies.contains_key(&lang)
    }

    /// Render for `lang`, falling back to the first available language
    pub fn render(&self, lang: Language, vars: &serde_json::Value) -> Result<String> {
        let body = self
            .bodies
            .get(&lang)
            .or_else(|| Language::all().iter().find_map(|l| self.bodies.get(l)))
            .ok_or_else(|| PromptError::NoLanguageAvailable(self.name.clone()))?;

        environment()
            .render_str(body, minijinja::Value::from_serialize(vars))
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.bodies.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bilingual_render() {
        let template =
            JinjaTemplate::bilingual("t", "Analyse {{ symbol }}", "分析 {{ symbol }}").unwrap();

        let zh = template
            .render(Language::Chinese, &json!({ "symbol": "HK.00700" }))
            .unwrap();
        assert_eq!(zh, "分析 HK.00700");

        let en = template
            .render(Language::English, &json!({ "symbol": "US.AAPL" }))
            .unwrap();
        assert_eq!(en, "Analyse US.AAPL");
    }

    #[test]
    fn test_fallback_to_available_language() {
        let template = JinjaTemplate::new("t", Language::English, "only english").unwrap();
        assert!(!template.supports(Language::Chinese));
        let result = template.render(Language::Chinese, &json!({})).unwrap();
        assert_eq!(result, "only english");
    }

    #[test]
    fn test_invalid_template_error() {
        let result = JinjaTemplate::new("t", Language::Chinese, "{{ unclosed");
        assert!(matches!(result, Err(PromptError::TemplateParseFailed { .. })));
    }

    #[test]
    fn test_loop_with_block_trimming() {
        let template = JinjaTemplate::new(
            "loop",
            Language::English,
            "{% for item in items %}\n- {{ item }}\n{% endfor %}\n",
        )
        .unwrap();

        let result = template
            .render(Language::English, &json!({ "items": ["one", "two"] }))
            .unwrap();
        assert_eq!(result, "- one\n- two\n");
    }

    #[test]
    fn test_debug() {
        let template = JinjaTemplate::bilingual("analysis", "a", "b").unwrap();
        let debug = format!("{template:?}");
        assert!(debug.contains("JinjaTemplate"));
        assert!(debug.contains("analysis"));
    }
}
