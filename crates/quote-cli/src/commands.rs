//! Subcommand implementations

use crate::{AnalyzeArgs, AskArgs, QuoteArgs};
use anyhow::{Context, Result};
use comfy_table::Table;
use quote_llm::providers::{DeepSeekConfig, DeepSeekProvider};
use quote_market::api::MarketDataSource;
use quote_market::{
    AnalysisPromptOptions, LongPortClient, Quote, QuoteAnalysis, StaticInfoAnalysis,
    load_symbols_report, parse_symbol_list,
};
use quote_prompt::PromptLayers;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

fn deepseek(model: Option<String>) -> Result<DeepSeekProvider> {
    let mut config = DeepSeekConfig::from_env()?;
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        config = config.with_model(model);
    }
    Ok(DeepSeekProvider::with_config(config)?)
}

/// Price argument as a number; anything unparseable is 0.0
pub(crate) fn parse_price(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(raw, "price is not a number, using 0.0");
        0.0
    })
}

/// Join the non-blank parts with a blank line between them
pub(crate) fn join_instructions<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let parts: Vec<&str> = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

pub(crate) async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let load = load_symbols_report(&args.symbols_csv)
        .with_context(|| format!("loading symbols from {}", args.symbols_csv.display()))?;
    if !load.skipped.is_empty() {
        warn!(skipped = load.skipped.len(), "some symbol rows were skipped");
    }
    let symbols = load.symbols;
    info!(count = symbols.len(), "symbols loaded");

    let provider = deepseek(args.model)?;
    let model = provider.config().model.clone();
    let source = LongPortClient::from_env()
        .await
        .context("connecting to LongPort")?;

    let (system, template) = match &args.prompts_dir {
        Some(dir) => {
            let mut vars = BTreeMap::new();
            vars.insert(
                "symbols".to_string(),
                symbols.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            );
            let layered = PromptLayers::new(dir)
                .load(Some(args.module.as_str()), args.scenario.as_deref(), &vars)
                .with_context(|| format!("loading prompts from {}", dir.display()))?;
            (
                layered.system().map(str::to_string),
                layered.user_template().map(str::to_string),
            )
        },
        None => (None, None),
    };

    let options = AnalysisPromptOptions::default()
        .with_language(args.language)
        .with_summary_words(args.summary_words);

    let pipeline = StaticInfoAnalysis::new(Arc::new(source), Arc::new(provider), model)
        .with_options(options)
        .with_system_prompt(system)
        .with_extra_prompt(join_instructions([
            template.as_deref(),
            args.extra_prompt.as_deref(),
        ]));

    let report = pipeline.run(&symbols).await?;
    let path = report
        .write_to(&args.output_dir)
        .with_context(|| format!("writing analysis to {}", args.output_dir.display()))?;

    println!("Analysis written to {}", path.display());
    Ok(())
}

pub(crate) async fn quote(args: QuoteArgs) -> Result<()> {
    let symbols = parse_symbol_list(&args.symbols)
        .context("specify symbols with --symbols or SYMBOLS, e.g. 700.HK,AAPL.US")?;
    let client = LongPortClient::from_env()
        .await
        .context("connecting to LongPort")?;

    let quotes = client.quotes(&symbols).await?;
    if args.table {
        println!("{}", quote_table(&quotes));
    } else {
        for quote in &quotes {
            println!("{quote}");
        }
    }
    Ok(())
}

fn quote_table(quotes: &[Quote]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Last price", "Timestamp"]);
    for quote in quotes {
        table.add_row(vec![
            quote.symbol.clone(),
            quote.last_price.to_string(),
            quote.timestamp.to_rfc3339(),
        ]);
    }
    table
}

pub(crate) async fn ask(args: AskArgs) -> Result<()> {
    let price = parse_price(&args.price);
    let provider = deepseek(args.model)?;
    let model = provider.config().model.clone();

    let analysis = QuoteAnalysis::new(Arc::new(provider), model).with_language(args.language);
    let text = analysis
        .analyze(&args.symbol, price, args.extra_prompt.as_deref())
        .await?;

    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert!((parse_price("50") - 50.0).abs() < f64::EPSILON);
        assert!((parse_price(" 321.4 ") - 321.4).abs() < f64::EPSILON);
        assert!(parse_price("abc").abs() < f64::EPSILON);
        assert!(parse_price("").abs() < f64::EPSILON);
    }

    #[test]
    fn test_join_instructions() {
        assert_eq!(join_instructions([None, None]), None);
        assert_eq!(join_instructions([Some("  "), None]), None);
        assert_eq!(
            join_instructions([Some("from yaml"), Some("from flag")]),
            Some("from yaml\n\nfrom flag".to_string())
        );
        assert_eq!(join_instructions([None, Some("only")]), Some("only".to_string()));
    }

    #[test]
    fn test_quote_table() {
        let quotes = vec![Quote {
            symbol: "700.HK".to_string(),
            last_price: 321.4,
            timestamp: "2024-01-02T03:04:05Z".parse().unwrap(),
        }];
        let rendered = quote_table(&quotes).to_string();
        assert!(rendered.contains("700.HK"));
        assert!(rendered.contains("321.4"));
    }

    fn parse(args: &[&str]) -> crate::Command {
        use clap::Parser;
        crate::Cli::try_parse_from(args).unwrap().command
    }

    #[tokio::test]
    async fn test_quote_rejects_unusable_symbols_before_connecting() {
        let crate::Command::Quote(args) = parse(&["quote-brief", "quote", "--symbols", " , !!!"])
        else {
            panic!("expected quote command");
        };
        let err = quote(args).await.unwrap_err();
        assert!(format!("{err:#}").contains("No valid symbols"));
    }

    #[tokio::test]
    async fn test_analyze_reports_missing_symbol_file() {
        let crate::Command::Analyze(args) = parse(&[
            "quote-brief",
            "analyze",
            "--symbols-csv",
            "does/not/exist.csv",
        ]) else {
            panic!("expected analyze command");
        };
        let err = analyze(args).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("loading symbols from does/not/exist.csv"));
        assert!(message.contains("File not found"));
    }
}
