//! Command-line interface for quote-brief
//!
//! ```bash
//! # Compare the static info of every symbol in a CSV and save the analysis
//! quote-brief analyze --symbols-csv config/symbols.csv --output-dir reports
//!
//! # One snapshot of last prices
//! SYMBOLS=700.HK,AAPL.US quote-brief quote
//!
//! # Quick take on a single price
//! quote-brief ask 700.HK 321.4
//! ```

mod commands;

use clap::{Parser, Subcommand};
use quote_prompt::Language;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "quote-brief")]
#[command(about = "Market data to LLM analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the static info of the symbols in a CSV file
    Analyze(AnalyzeArgs),
    /// Print the latest quote for each symbol
    Quote(QuoteArgs),
    /// Ask for an analysis of one symbol at a price
    Ask(AskArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// CSV file with a `symbol` column
    #[arg(long, default_value = "config/symbols.csv")]
    symbols_csv: PathBuf,

    /// Directory for the analysis file
    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Additional instructions appended to the prompt
    #[arg(long, env = "DEEPSEEK_EXTRA_PROMPT")]
    extra_prompt: Option<String>,

    /// Prompt language (zh, en)
    #[arg(long, default_value = "zh")]
    language: Language,

    /// Approximate length of the closing summary
    #[arg(long, default_value_t = 200)]
    summary_words: usize,

    /// Directory of layered YAML prompt files
    #[arg(long)]
    prompts_dir: Option<PathBuf>,

    /// Prompt module to load from the prompts directory
    #[arg(long, default_value = "realtime_analysis")]
    module: String,

    /// Prompt scenario to load from the prompts directory
    #[arg(long)]
    scenario: Option<String>,

    /// Model override
    #[arg(long, env = "DEEPSEEK_MODEL")]
    model: Option<String>,
}

#[derive(clap::Args, Debug)]
struct QuoteArgs {
    /// Comma-separated symbols, e.g. 700.HK,AAPL.US
    #[arg(long, env = "SYMBOLS")]
    symbols: String,

    /// Render as a table
    #[arg(long)]
    table: bool,
}

#[derive(clap::Args, Debug)]
struct AskArgs {
    /// Symbol as the data provider writes it, e.g. 700.HK
    #[arg(env = "QUOTE_SYMBOL", default_value = "700.HK")]
    symbol: String,

    /// Latest price; unparseable values count as 0.0
    #[arg(env = "QUOTE_PRICE", default_value = "0.0")]
    price: String,

    /// Additional instructions on a new line after the question
    #[arg(long)]
    extra_prompt: Option<String>,

    /// Prompt language (zh, en)
    #[arg(long, default_value = "en")]
    language: Language,

    /// Model override
    #[arg(long, env = "DEEPSEEK_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = quote_utils::AppConfig::from_env();
    quote_utils::init_tracing_with(&config);

    let cli = Cli::parse();
    debug!(app = %config.app_name, ?cli, "parsed arguments");

    match cli.command {
        Command::Analyze(args) => commands::analyze(args).await,
        Command::Quote(args) => commands::quote(args).await,
        Command::Ask(args) => commands::ask(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "quote-brief",
            "analyze",
            "--symbols-csv",
            "s.csv",
            "--output-dir",
            "out",
            "--language",
            "en",
            "--scenario",
            "intraday",
        ])
        .unwrap();

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.symbols_csv, PathBuf::from("s.csv"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.language, Language::English);
        assert_eq!(args.module, "realtime_analysis");
        assert_eq!(args.scenario.as_deref(), Some("intraday"));
    }

    #[test]
    fn test_parse_ask_positionals() {
        let cli = Cli::try_parse_from(["quote-brief", "ask", "AAPL.US", "187.5"]).unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.symbol, "AAPL.US");
        assert_eq!(args.price, "187.5");
        assert_eq!(args.language, Language::English);
    }

    #[test]
    fn test_invalid_language_rejected() {
        let result = Cli::try_parse_from(["quote-brief", "ask", "700.HK", "1", "--language", "fr"]);
        assert!(result.is_err());
    }
}
