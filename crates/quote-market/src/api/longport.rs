//! LongPort OpenAPI quote client
//!
//! Wraps the official SDK's `QuoteContext`. Credentials come from
//! `LONGPORT_APP_KEY`, `LONGPORT_APP_SECRET` and `LONGPORT_ACCESS_TOKEN`; all
//! three are required and construction fails before connecting when one is
//! missing. `LONGPORT_HTTP_URL` and `LONGPORT_QUOTE_WS_URL` override the
//! endpoints, e.g. for a test environment.
//!
//! Static info is handed on as the SDK's `Debug` rendering
//! (`SecurityStaticInfo { symbol: "700.HK", .. }`), the loose text that
//! [`crate::coerce`] repairs.

use super::{MarketDataSource, Quote};
use crate::error::{MarketError, Result};
use crate::symbols::Symbol;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use longport::quote::QuoteContext;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Connection settings for [`LongPortClient`]
#[derive(Clone)]
pub struct LongPortConfig {
    pub app_key: String,
    pub app_secret: String,
    pub access_token: String,
    pub http_url: Option<String>,
    pub quote_ws_url: Option<String>,
}

impl fmt::Debug for LongPortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongPortConfig")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("http_url", &self.http_url)
            .field("quote_ws_url", &self.quote_ws_url)
            .finish()
    }
}

impl LongPortConfig {
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            access_token: access_token.into(),
            http_url: None,
            quote_ws_url: None,
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &str| {
            non_empty(name).ok_or_else(|| MarketError::ConfigError(format!("{name} must be set")))
        };

        let mut config = Self::new(
            require("LONGPORT_APP_KEY")?,
            require("LONGPORT_APP_SECRET")?,
            require("LONGPORT_ACCESS_TOKEN")?,
        );
        if let Some(url) = non_empty("LONGPORT_HTTP_URL") {
            config = config.with_http_url(url);
        }
        if let Some(url) = non_empty("LONGPORT_QUOTE_WS_URL") {
            config = config.with_quote_ws_url(url);
        }
        Ok(config)
    }

    pub fn with_http_url(mut self, url: impl Into<String>) -> Self {
        self.http_url = Some(url.into());
        self
    }

    pub fn with_quote_ws_url(mut self, url: impl Into<String>) -> Self {
        self.quote_ws_url = Some(url.into());
        self
    }

    /// Build the SDK configuration; the SDK signs every request with the
    /// app secret
    pub fn to_sdk(&self) -> longport::Config {
        let mut config = longport::Config::new(
            self.app_key.clone(),
            self.app_secret.clone(),
            self.access_token.clone(),
        );
        if let Some(url) = &self.http_url {
            config = config.http_url(url.clone());
        }
        if let Some(url) = &self.quote_ws_url {
            config = config.quote_ws_url(url.clone());
        }
        config
    }
}

/// Quote client backed by a LongPort `QuoteContext`
#[derive(Clone)]
pub struct LongPortClient {
    ctx: QuoteContext,
}

impl LongPortClient {
    /// Open a quote session
    ///
    /// Push events are not subscribed to, so the SDK's event receiver is
    /// dropped.
    pub async fn connect(config: &LongPortConfig) -> Result<Self> {
        let (ctx, _events) = QuoteContext::try_new(Arc::new(config.to_sdk())).await?;
        info!(
            http_url = config.http_url.as_deref().unwrap_or("default"),
            "LongPort quote session opened"
        );
        Ok(Self { ctx })
    }

    pub async fn from_env() -> Result<Self> {
        Self::connect(&LongPortConfig::from_env()?).await
    }
}

fn provider_symbols(symbols: &[Symbol]) -> Vec<String> {
    symbols.iter().map(Symbol::provider_symbol).collect()
}

/// `Debug` text of each record, the form the coercer accepts
pub fn render_records<T: fmt::Debug>(records: &[T]) -> Vec<String> {
    records.iter().map(|record| format!("{record:?}")).collect()
}

/// Build a [`Quote`] from the SDK's decimal price and unix timestamp
pub fn to_quote(
    symbol: impl Into<String>,
    last_done: Decimal,
    unix_seconds: i64,
    nanos: u32,
) -> Result<Quote> {
    let symbol = symbol.into();
    let last_price = last_done.to_f64().ok_or_else(|| {
        MarketError::ApiError(format!("{symbol}: price {last_done} is not representable"))
    })?;
    let timestamp: DateTime<Utc> = DateTime::from_timestamp(unix_seconds, nanos)
        .ok_or_else(|| {
            MarketError::ApiError(format!("{symbol}: timestamp {unix_seconds} out of range"))
        })?;
    Ok(Quote {
        symbol,
        last_price,
        timestamp,
    })
}

#[async_trait]
impl MarketDataSource for LongPortClient {
    #[instrument(skip(self, symbols), fields(count = symbols.len()))]
    async fn static_info(&self, symbols: &[Symbol]) -> Result<Vec<String>> {
        let infos = self.ctx.static_info(provider_symbols(symbols)).await?;
        debug!(records = infos.len(), "received static info");
        Ok(render_records(&infos))
    }

    #[instrument(skip(self, symbols), fields(count = symbols.len()))]
    async fn quotes(&self, symbols: &[Symbol]) -> Result<Vec<Quote>> {
        let snapshots = self.ctx.quote(provider_symbols(symbols)).await?;
        debug!(quotes = snapshots.len(), "received quotes");
        snapshots
            .into_iter()
            .map(|q| {
                to_quote(
                    q.symbol,
                    q.last_done,
                    q.timestamp.unix_timestamp(),
                    q.timestamp.nanosecond(),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "longport"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_credentials() {
        let err = LongPortConfig::from_lookup(lookup(&[
            ("LONGPORT_APP_KEY", "key"),
            ("LONGPORT_ACCESS_TOKEN", "token"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: LONGPORT_APP_SECRET must be set"
        );

        let err = LongPortConfig::from_lookup(lookup(&[
            ("LONGPORT_APP_KEY", "key"),
            ("LONGPORT_APP_SECRET", "  "),
            ("LONGPORT_ACCESS_TOKEN", "token"),
        ]))
        .unwrap_err();
        assert!(matches!(err, MarketError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = LongPortConfig::from_lookup(lookup(&[
            ("LONGPORT_APP_KEY", "key"),
            ("LONGPORT_APP_SECRET", "secret"),
            ("LONGPORT_ACCESS_TOKEN", "token"),
            ("LONGPORT_HTTP_URL", "https://openapi.example.test"),
            ("LONGPORT_QUOTE_WS_URL", "wss://quote.example.test"),
        ]))
        .unwrap();
        assert_eq!(config.app_secret, "secret");
        assert_eq!(
            config.http_url.as_deref(),
            Some("https://openapi.example.test")
        );
        assert_eq!(
            config.quote_ws_url.as_deref(),
            Some("wss://quote.example.test")
        );

        let default = LongPortConfig::new("k", "s", "t");
        assert!(default.http_url.is_none());
        assert!(default.quote_ws_url.is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let shown = format!("{:?}", LongPortConfig::new("key", "secret", "token"));
        assert!(shown.contains("key"));
        assert!(!shown.contains("secret\""));
        assert!(!shown.contains("token\""));
    }

    #[test]
    fn test_provider_symbols() {
        let symbols: Vec<Symbol> = vec!["HK.00700".parse().unwrap(), "US.AAPL".parse().unwrap()];
        assert_eq!(provider_symbols(&symbols), vec!["700.HK", "AAPL.US"]);
    }

    #[derive(Debug)]
    #[allow(dead_code)]
    struct SecurityStaticInfo {
        symbol: String,
        board: Vec<&'static str>,
    }

    #[test]
    fn test_render_records_is_coercible() {
        let records = render_records(&[SecurityStaticInfo {
            symbol: "700.HK".to_string(),
            board: vec!["HKEquity"],
        }]);
        assert_eq!(
            records[0],
            r#"SecurityStaticInfo { symbol: "700.HK", board: ["HKEquity"] }"#
        );

        let values = crate::coerce::coerce_records(&records).unwrap();
        assert_eq!(values[0]["symbol"], "700.HK");
        assert_eq!(values[0]["board"][0], "HKEquity");
    }

    #[test]
    fn test_to_quote() {
        let quote = to_quote("700.HK", Decimal::new(321_400, 3), 1_704_164_645, 0).unwrap();
        assert_eq!(quote.symbol, "700.HK");
        assert!((quote.last_price - 321.4).abs() < f64::EPSILON);
        assert_eq!(quote.timestamp.timestamp(), 1_704_164_645);

        assert!(to_quote("700.HK", Decimal::ONE, i64::MAX, 0).is_err());
    }
}
