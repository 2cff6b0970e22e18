//! Symbol normalisation and CSV ingestion
//!
//! Tickers arrive in several hand-typed shapes (`700`, `700.HK`, `hk.00700`,
//! `aapl`, `AAPL.US`). They are normalised to one canonical form per market,
//! `HK.00700` or `US.AAPL`, which is the dedup key for the rest of the run.

use crate::error::{MarketError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Column holding the raw ticker in symbol CSV files
pub const SYMBOL_COLUMN: &str = "symbol";

/// Market a canonical symbol belongs to
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    HK,
    US,
}

impl Market {
    /// Prefix used in the canonical form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HK => "HK",
            Self::US => "US",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical security symbol, displayed as `<MARKET>.<CODE>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    market: Market,
    code: String,
}

impl Symbol {
    pub fn market(&self) -> Market {
        self.market
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Form used by the market-data API: code first, market suffix,
    /// HK leading zeros stripped (`700.HK`, `AAPL.US`)
    pub fn provider_symbol(&self) -> String {
        match self.market {
            Market::HK => {
                let trimmed = self.code.trim_start_matches('0');
                let code = if trimmed.is_empty() { "0" } else { trimmed };
                format!("{code}.HK")
            },
            Market::US => format!("{}.US", self.code),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.market, self.code)
    }
}

impl FromStr for Symbol {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s)
    }
}

/// Recognised input shapes, in matching priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    /// `700`, `HK.700`, `HK.00700`
    HkPrefixed,
    /// `700.HK`
    HkSuffixed,
    /// `AAPL`, `US.AAPL`, `BRK.B`
    UsPrefixed,
    /// `AAPL.US`
    UsSuffixed,
}

impl Grammar {
    fn canonicalize(self, capture: &str) -> Option<Symbol> {
        match self {
            Self::HkPrefixed | Self::HkSuffixed => {
                let number: u32 = capture.parse().ok()?;
                Some(Symbol {
                    market: Market::HK,
                    code: format!("{number:05}"),
                })
            },
            Self::UsPrefixed => {
                let upper = capture.to_ascii_uppercase();
                // `.US` belongs to the suffixed grammar; `HK.` to the fallback
                if upper.ends_with(".US") || upper.starts_with("HK.") {
                    return None;
                }
                Some(Symbol {
                    market: Market::US,
                    code: upper,
                })
            },
            Self::UsSuffixed => {
                let upper = capture.to_ascii_uppercase();
                let code = upper.strip_prefix("US.").unwrap_or(&upper);
                Some(Symbol {
                    market: Market::US,
                    code: code.to_string(),
                })
            },
        }
    }
}

static GRAMMARS: LazyLock<Vec<(Grammar, Regex)>> = LazyLock::new(|| {
    [
        (Grammar::HkPrefixed, r"(?i)^(?:HK\.)?(\d{1,5})$"),
        (Grammar::HkSuffixed, r"(?i)^(\d{1,5})\.HK$"),
        (Grammar::UsPrefixed, r"(?i)^(?:US\.)?([A-Z][A-Z0-9\-.]{0,9})$"),
        (Grammar::UsSuffixed, r"(?i)^([A-Z0-9\-.]{1,10})\.US$"),
    ]
    .into_iter()
    .map(|(grammar, pattern)| (grammar, Regex::new(pattern).expect("valid grammar pattern")))
    .collect()
});

/// Normalise a raw ticker into its canonical [`Symbol`]
///
/// ```
/// use quote_market::normalize;
///
/// assert_eq!(normalize("700.HK").unwrap().to_string(), "HK.00700");
/// assert_eq!(normalize("aapl").unwrap().to_string(), "US.AAPL");
/// ```
pub fn normalize(raw: &str) -> Result<Symbol> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(MarketError::EmptySymbol);
    }

    for (grammar, re) in GRAMMARS.iter() {
        let Some(caps) = re.captures(s) else {
            continue;
        };
        if let Some(symbol) = caps.get(1).and_then(|m| grammar.canonicalize(m.as_str())) {
            return Ok(symbol);
        }
    }

    // Already canonical, possibly with a code the grammars do not cover
    let upper = s.to_ascii_uppercase();
    for market in [Market::HK, Market::US] {
        if let Some(code) = upper.strip_prefix(market.as_str()).and_then(|r| r.strip_prefix('.')) {
            return Ok(Symbol {
                market,
                code: code.to_string(),
            });
        }
    }

    Err(MarketError::InvalidSymbolFormat(raw.to_string()))
}

/// A CSV row that was skipped during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file
    pub line: u64,
    /// Raw `symbol` cell
    pub raw: String,
    /// Why normalisation failed
    pub reason: String,
}

/// Outcome of loading a symbol file
#[derive(Debug, Clone, Default)]
pub struct SymbolLoad {
    /// Canonical symbols, deduplicated in first-seen order
    pub symbols: Vec<Symbol>,
    /// Rows that failed normalisation
    pub skipped: Vec<SkippedRow>,
}

/// Load canonical symbols from a CSV file with a `symbol` column
pub fn load_symbols_from_csv(path: impl AsRef<Path>) -> Result<Vec<Symbol>> {
    load_symbols_report(path).map(|load| load.symbols)
}

/// Load symbols and report the rows that were skipped
pub fn load_symbols_report(path: impl AsRef<Path>) -> Result<SymbolLoad> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    if !path.exists() {
        return Err(MarketError::FileNotFound(shown));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == SYMBOL_COLUMN)
        .ok_or_else(|| MarketError::MissingHeader {
            column: SYMBOL_COLUMN.to_string(),
            path: shown.clone(),
        })?;

    let mut seen = HashSet::new();
    let mut load = SymbolLoad::default();

    for record in reader.records() {
        let record = record?;
        let raw = record.get(column).unwrap_or_default().trim();
        if raw.is_empty() {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);

        match normalize(raw) {
            Ok(symbol) => {
                if seen.insert(symbol.clone()) {
                    load.symbols.push(symbol);
                } else {
                    debug!(line, symbol = %symbol, "duplicate symbol");
                }
            },
            Err(e) if e.is_row_level() => {
                warn!(line, raw, error = %e, "skipping invalid symbol row");
                load.skipped.push(SkippedRow {
                    line,
                    raw: raw.to_string(),
                    reason: e.to_string(),
                });
            },
            Err(e) => return Err(e),
        }
    }

    if load.symbols.is_empty() {
        return Err(MarketError::NoValidSymbols(shown));
    }

    debug!(
        path = %shown,
        loaded = load.symbols.len(),
        skipped = load.skipped.len(),
        "loaded symbols"
    );
    Ok(load)
}

/// Parse a comma-separated symbol list such as `"700.HK, AAPL.US"`
pub fn parse_symbol_list(input: &str) -> Result<Vec<Symbol>> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match normalize(raw) {
            Ok(symbol) => {
                if seen.insert(symbol.clone()) {
                    symbols.push(symbol);
                }
            },
            Err(e) if e.is_row_level() => warn!(raw, error = %e, "skipping invalid symbol"),
            Err(e) => return Err(e),
        }
    }

    if symbols.is_empty() {
        return Err(MarketError::NoValidSymbols("symbol list".to_string()));
    }
    Ok(symbols)
}
