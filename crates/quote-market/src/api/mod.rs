//! Market-data sources
//!
//! The analysis pipeline only needs two calls from a data provider, captured
//! by [`MarketDataSource`]. [`LongPortClient`] implements it over the LongPort SDK.

pub mod longport;

pub use longport::{LongPortClient, LongPortConfig};

use crate::error::Result;
use crate::symbols::Symbol;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last traded price snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Provider form, e.g. `700.HK`
    pub symbol: String,
    pub last_price: f64,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: last_price={}, timestamp={}",
            self.symbol,
            self.last_price,
            self.timestamp.to_rfc3339()
        )
    }
}

/// Provider of static reference data and price snapshots
///
/// Each call is a single round trip. Implementations do not retry or cache.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// One loose-text record per security, in request order
    async fn static_info(&self, symbols: &[Symbol]) -> Result<Vec<String>>;

    /// Latest quote per security
    async fn quotes(&self, symbols: &[Symbol]) -> Result<Vec<Quote>>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
