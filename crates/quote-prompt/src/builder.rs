//! Fluent prompt builder
//!
//! [`PromptBuilder`] assembles a prompt piece by piece, useful where parts are
//! optional or data-driven and a template would be mostly conditionals.

/// A fluent builder for constructing prompts
///
/// ```
/// use quote_prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .line("You are a professional stock analyst.")
///     .when(true, "Keep it under 200 words.")
///     .build();
///
/// assert_eq!(prompt, "You are a professional stock analyst.\nKeep it under 200 words.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    lines: Vec<String>,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line
    pub fn line(mut self, content: impl Into<String>) -> Self {
        self.lines.push(content.into());
        self
    }

    /// Append an empty line
    pub fn blank_line(self) -> Self {
        self.line("")
    }

    /// Append a line only when `condition` holds
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.line(content) } else { self }
    }

    /// Append a line when `content` is present and not blank
    pub fn optional(self, content: Option<&str>) -> Self {
        match content.map(str::trim) {
            Some(text) if !text.is_empty() => self.line(text),
            _ => self,
        }
    }

    /// Append a section title wrapped in corner brackets, e.g. `【分析任务】`
    pub fn heading(self, title: impl AsRef<str>) -> Self {
        self.line(format!("【{}】", title.as_ref()))
    }

    /// Append `- item` lines
    pub fn bullets<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self = self.line(format!("- {}", item.as_ref()));
        }
        self
    }

    /// Append items numbered with keycap digits (`1️⃣ item`)
    pub fn keycap_list<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, item) in items.into_iter().enumerate() {
            self = self.line(format!("{}\u{fe0f}\u{20e3} {}", idx + 1, item.as_ref()));
        }
        self
    }

    /// Whether nothing has been added
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the lines with `\n`
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}
