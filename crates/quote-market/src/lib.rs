//! Market data preparation and analysis for quote-brief
//!
//! - [`symbols`]: normalise hand-typed tickers (`700`, `AAPL.US`) to canonical
//!   `HK.00700` / `US.AAPL` and load them from CSV
//! - [`coerce`]: repair the SDK's debug-printed records into JSON
//! - [`labels`]: translate field names into display labels
//! - [`exchange_time`]: stamp records with exchange-local and UTC time
//! - [`prompts`]: build the prompts sent to the model
//! - [`api`]: market-data sources ([`LongPortClient`])
//! - [`analysis`]: the end-to-end pipelines
//!
//! # Example
//!
//! ```rust,ignore
//! use quote_market::{LongPortClient, StaticInfoAnalysis, load_symbols_from_csv};
//! use quote_llm::providers::DeepSeekProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let symbols = load_symbols_from_csv("config/symbols.csv")?;
//!     let provider = DeepSeekProvider::from_env()?;
//!     let model = provider.config().model.clone();
//!
//!     let pipeline = StaticInfoAnalysis::new(
//!         Arc::new(LongPortClient::from_env().await?),
//!         Arc::new(provider),
//!         model,
//!     );
//!     let report = pipeline.run(&symbols).await?;
//!     println!("{}", report.write_to(".")?.display());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod coerce;
pub mod error;
pub mod exchange_time;
pub mod labels;
pub mod prompts;
pub mod symbols;

pub use analysis::{AnalysisReport, QuoteAnalysis, StaticInfoAnalysis};
pub use api::{LongPortClient, LongPortConfig, MarketDataSource, Quote};
pub use coerce::{coerce, coerce_records, strip_type_prefix};
pub use error::{MarketError, Result};
pub use exchange_time::ExchangeClock;
pub use labels::{LabelTable, relabel};
pub use prompts::AnalysisPromptOptions;
pub use symbols::{
    Market, SkippedRow, Symbol, SymbolLoad, load_symbols_from_csv, load_symbols_report, normalize,
    parse_symbol_list,
};

// Re-export Language from quote-prompt
pub use quote_prompt::Language;
