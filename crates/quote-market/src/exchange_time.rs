//! Exchange-local and UTC timestamps for records
//!
//! Records sent to the model carry the time at which they were captured, both
//! in UTC and in the local zone of the exchange the security trades on, so the
//! model can reason about whether a market is open.

use crate::error::{MarketError, Result};
use crate::labels::LabelTable;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::collections::BTreeMap;

/// Exchange codes and their IANA zones
pub const EXCHANGE_ZONES: &[(&str, Tz)] = &[
    ("SEHK", chrono_tz::Asia::Hong_Kong),
    ("NYSE", chrono_tz::America::New_York),
    ("NASDAQ", chrono_tz::America::New_York),
    ("LSE", chrono_tz::Europe::London),
    ("TSE", chrono_tz::Asia::Tokyo),
    ("SGX", chrono_tz::Asia::Singapore),
];

pub const LOCAL_TIME_FIELD: &str = "local_time";
pub const UTC_TIME_FIELD: &str = "utc_time";
const EXCHANGE_FIELD: &str = "exchange";

/// A fixed reference instant plus an exchange-to-zone table
#[derive(Debug, Clone)]
pub struct ExchangeClock {
    now_utc: DateTime<Utc>,
    zones: BTreeMap<String, Tz>,
    labels: LabelTable,
}

impl ExchangeClock {
    /// Clock pinned at `now_utc` with the built-in zone table
    pub fn new(now_utc: DateTime<Utc>) -> Self {
        Self {
            now_utc,
            zones: EXCHANGE_ZONES
                .iter()
                .map(|(code, tz)| ((*code).to_string(), *tz))
                .collect(),
            labels: LabelTable::chinese(),
        }
    }

    /// Clock pinned at the current time
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Replace the whole zone table
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = (S, Tz)>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(|(code, tz)| (code.into(), tz)).collect();
        self
    }

    /// Add or override one exchange
    pub fn with_zone(mut self, exchange: impl Into<String>, tz: Tz) -> Self {
        self.zones.insert(exchange.into(), tz);
        self
    }

    /// Add or override one exchange by IANA zone name
    pub fn with_zone_name(self, exchange: impl Into<String>, zone: &str) -> Result<Self> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| MarketError::ConfigError(format!("unknown time zone '{zone}'")))?;
        Ok(self.with_zone(exchange, tz))
    }

    /// Label table used to find a relabelled exchange field
    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now_utc
    }

    /// Zone for an exchange code
    pub fn zone_for(&self, exchange: &str) -> Option<Tz> {
        self.zones.get(exchange).copied()
    }

    /// Reference time in the exchange's zone, RFC 3339
    pub fn local_time(&self, exchange: &str) -> Option<String> {
        self.zone_for(exchange).map(|tz| {
            self.now_utc
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::AutoSi, false)
        })
    }

    /// Reference time in UTC, RFC 3339
    pub fn utc_time(&self) -> String {
        self.now_utc.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    /// Copies of `records` with `local_time` and `utc_time` added
    ///
    /// `local_time` is null when the record has no exchange or the exchange
    /// is not in the zone table. Non-object records are copied unchanged.
    pub fn enrich(&self, records: &[Value]) -> Vec<Value> {
        let utc_time = self.utc_time();
        records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Value::Object(map) = &mut record {
                    let local = self
                        .exchange_of(map)
                        .and_then(|exchange| self.local_time(exchange));
                    map.insert(
                        LOCAL_TIME_FIELD.to_string(),
                        local.map_or(Value::Null, Value::String),
                    );
                    map.insert(UTC_TIME_FIELD.to_string(), Value::String(utc_time.clone()));
                }
                record
            })
            .collect()
    }

    fn exchange_of<'a>(&self, map: &'a serde_json::Map<String, Value>) -> Option<&'a str> {
        map.get(EXCHANGE_FIELD)
            .or_else(|| {
                map.iter()
                    .find(|(key, _)| self.labels.source_key(key) == Some(EXCHANGE_FIELD))
                    .map(|(_, value)| value)
            })
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn clock() -> ExchangeClock {
        ExchangeClock::new(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_enrich_known_exchanges() {
        let records = vec![
            json!({"symbol": "2388.HK", "exchange": "SEHK"}),
            json!({"symbol": "AAPL.US", "exchange": "NASDAQ"}),
        ];
        let out = clock().enrich(&records);

        assert_eq!(out[0]["local_time"], json!("2024-01-02T11:04:05+08:00"));
        assert_eq!(out[1]["local_time"], json!("2024-01-01T22:04:05-05:00"));
        assert_eq!(out[0]["utc_time"], json!("2024-01-02T03:04:05+00:00"));
        assert_eq!(out[0]["symbol"], json!("2388.HK"));
    }

    #[test]
    fn test_enrich_unknown_or_missing_exchange() {
        let records = vec![
            json!({"exchange": "XXXX"}),
            json!({"symbol": "none"}),
            json!({"exchange": 42}),
        ];
        let out = clock().enrich(&records);
        for record in &out {
            assert_eq!(record["local_time"], Value::Null);
            assert_eq!(record["utc_time"], json!("2024-01-02T03:04:05+00:00"));
        }
    }

    #[test]
    fn test_enrich_does_not_mutate_input() {
        let records = vec![json!({"exchange": "LSE"})];
        let out = clock().enrich(&records);
        assert!(records[0].get("local_time").is_none());
        assert_eq!(out[0]["local_time"], json!("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn test_enrich_relabelled_exchange() {
        let records = vec![json!({"标的所属交易所": "TSE"})];
        let out = clock().enrich(&records);
        assert_eq!(out[0]["local_time"], json!("2024-01-02T12:04:05+09:00"));

        static CUSTOM: &[(&str, &str)] = &[("exchange", "Venue")];
        let out = clock()
            .with_labels(LabelTable::new(CUSTOM))
            .enrich(&[json!({"Venue": "NYSE"}), json!({"标的所属交易所": "TSE"})]);
        assert_eq!(out[0]["local_time"], json!("2024-01-01T22:04:05-05:00"));
        assert_eq!(out[1]["local_time"], Value::Null);
    }

    #[test]
    fn test_zone_overrides() {
        let clock = clock()
            .with_zone("HKEX", chrono_tz::Asia::Hong_Kong)
            .with_zone_name("ASX", "Australia/Sydney")
            .unwrap();
        assert_eq!(clock.zone_for("HKEX"), Some(chrono_tz::Asia::Hong_Kong));
        assert!(clock.zone_for("ASX").is_some());
        assert!(clock.zone_for("SEHK").is_some());

        let replaced = clock.with_zones([("SGX", chrono_tz::Asia::Singapore)]);
        assert!(replaced.zone_for("SEHK").is_none());

        let err = ExchangeClock::now().with_zone_name("X", "Not/AZone");
        assert!(matches!(err, Err(MarketError::ConfigError(_))));
    }

    #[test]
    fn test_non_object_records_pass_through() {
        let records = vec![json!([1, 2]), json!("text")];
        assert_eq!(clock().enrich(&records), records);
    }
}
