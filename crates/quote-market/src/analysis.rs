//! Analysis pipelines
//!
//! [`StaticInfoAnalysis`] compares the reference data of a batch of symbols:
//!
//! ```text
//! symbols -> static info -> strip type prefix -> coerce -> exchange times
//!         -> relabel -> prompt (+ extra) -> completion -> AnalysisReport
//! ```
//!
//! [`QuoteAnalysis`] asks for a short take on a single symbol at a price.

use crate::api::MarketDataSource;
use crate::coerce::{coerce, strip_type_prefix};
use crate::error::{MarketError, Result};
use crate::exchange_time::ExchangeClock;
use crate::labels::{LabelTable, relabel};
use crate::prompts::{AnalysisPromptOptions, quote_analysis_prompt, static_info_prompt};
use crate::symbols::Symbol;
use chrono::{DateTime, Local};
use quote_llm::{CompletionRequest, LLMProvider};
use quote_prompt::Language;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Prompt and model answer from one run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub symbols: Vec<Symbol>,
    pub prompt: String,
    pub analysis: String,
    /// Reasoning trace, when the model returns one
    pub reasoning: Option<String>,
    pub created_at: DateTime<Local>,
}

impl AnalysisReport {
    pub fn new(symbols: Vec<Symbol>, prompt: String, analysis: String) -> Self {
        Self {
            symbols,
            prompt,
            analysis,
            reasoning: None,
            created_at: Local::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Local>) -> Self {
        self.created_at = created_at;
        self
    }

    /// `analysis_YYYYMMDD_HHMMSS.txt`
    pub fn file_name(&self) -> String {
        format!("analysis_{}.txt", self.created_at.format("%Y%m%d_%H%M%S"))
    }

    /// File contents
    pub fn render(&self) -> String {
        format!(
            "Prompt:\n{}\n\nAnalysis & Suggestions:\n{}\n",
            self.prompt, self.analysis
        )
    }

    /// Write the report into `dir`, creating it if needed, and return the path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render())?;
        info!(path = %path.display(), "analysis written");
        Ok(path)
    }
}

/// Static-info comparison over a batch of symbols
pub struct StaticInfoAnalysis {
    source: Arc<dyn MarketDataSource>,
    provider: Arc<dyn LLMProvider>,
    model: String,
    labels: LabelTable,
    options: AnalysisPromptOptions,
    clock: Option<ExchangeClock>,
    system_prompt: Option<String>,
    extra_prompt: Option<String>,
}

impl StaticInfoAnalysis {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        provider: Arc<dyn LLMProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            source,
            provider,
            model: model.into(),
            labels: LabelTable::chinese(),
            options: AnalysisPromptOptions::default(),
            clock: None,
            system_prompt: None,
            extra_prompt: None,
        }
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_options(mut self, options: AnalysisPromptOptions) -> Self {
        self.options = options;
        self
    }

    /// Pin the reference time; defaults to the time of each run
    pub fn with_clock(mut self, clock: ExchangeClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_system_prompt(mut self, system: Option<String>) -> Self {
        self.system_prompt = system.filter(|s| !s.trim().is_empty());
        self
    }

    /// Instructions appended after the generated prompt
    pub fn with_extra_prompt(mut self, extra: Option<String>) -> Self {
        self.extra_prompt = extra.filter(|s| !s.trim().is_empty());
        self
    }

    /// Turn raw provider records into labelled, time-stamped JSON
    pub fn prepare_records(&self, raw: &[String]) -> Result<Vec<Value>> {
        let coerced = raw
            .iter()
            .map(|record| coerce(strip_type_prefix(record)))
            .collect::<Result<Vec<_>>>()?;

        let clock = self
            .clock
            .clone()
            .unwrap_or_else(ExchangeClock::now)
            .with_labels(self.labels);
        let enriched = clock.enrich(&coerced);

        Ok(enriched.iter().map(|r| relabel(r, &self.labels)).collect())
    }

    /// Full prompt for prepared records, extra instructions included
    pub fn build_prompt(&self, records: &[Value]) -> Result<String> {
        let prompt = static_info_prompt(records, &self.options)?;
        Ok(match &self.extra_prompt {
            Some(extra) => format!("{prompt}\n\n{extra}"),
            None => prompt,
        })
    }

    /// Fetch, prompt and ask the model
    #[instrument(skip(self, symbols), fields(count = symbols.len(), source = self.source.name()))]
    pub async fn run(&self, symbols: &[Symbol]) -> Result<AnalysisReport> {
        if symbols.is_empty() {
            return Err(MarketError::NoValidSymbols("request".to_string()));
        }

        let raw = self.source.static_info(symbols).await?;
        debug!(records = raw.len(), "fetched static info");

        let records = self.prepare_records(&raw)?;
        let prompt = self.build_prompt(&records)?;

        let request = CompletionRequest::user(self.model.clone(), prompt.clone())
            .with_system(self.system_prompt.clone());

        let response = self.provider.complete(request).await?;
        info!(
            provider = self.provider.name(),
            tokens = response.usage.total(),
            "analysis received"
        );

        let mut report = AnalysisReport::new(symbols.to_vec(), prompt, response.text().to_string());
        report.reasoning = response.reasoning;
        Ok(report)
    }
}

/// Single symbol at a given price
pub struct QuoteAnalysis {
    provider: Arc<dyn LLMProvider>,
    model: String,
    language: Language,
}

impl QuoteAnalysis {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            language: Language::English,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Model's analysis text; empty when the model returned no content
    #[instrument(skip(self, extra))]
    pub async fn analyze(&self, symbol: &str, price: f64, extra: Option<&str>) -> Result<String> {
        let prompt = quote_analysis_prompt(symbol, price, extra, self.language)?;
        let request = CompletionRequest::user(self.model.clone(), prompt);

        let response = self.provider.complete(request).await?;
        Ok(response.text().to_string())
    }
}
