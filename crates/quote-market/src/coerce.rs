//! Loose-text to JSON coercion
//!
//! The market-data SDK prints records in a debug, Python-literal-ish form:
//!
//! ```text
//! SecurityStaticInfo { symbol: "700.HK", board: [HKEquity, Warrant], eps: 3.6, active: True }
//! ```
//!
//! [`coerce`] repairs that into JSON with a fixed sequence of text rewrites.
//! Each stage assumes the earlier ones already normalised quoting, so the
//! order is significant. Stages 2-4 never touch text inside a double-quoted
//! string, so commas and colons in quoted values survive intact.
//!
//! The rewrites are heuristics. A bare value containing its own colon (a URL,
//! a clock time) is turned into an extra key and the record fails to parse
//! with [`MarketError::MalformedInput`].

use crate::error::{MarketError, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// A double-quoted JSON string, escapes included
const QUOTED: &str = r#""(?:[^"\\]|\\.)*""#;

static RE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{QUOTED}|\b(\w+)\s*:")).expect("valid key pattern"));

static RE_FLAT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"{QUOTED}|\[((?:{QUOTED}|[^\[\]{{}}"])*)\]"#))
        .expect("valid list pattern")
});

static RE_BARE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"{QUOTED}|:(\s*)([^\s"\[{{,\]}}][^,\]}}]*)"#))
        .expect("valid value pattern")
});

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?$").expect("valid number pattern")
});

static RE_TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z_]\w*\s+\{").expect("valid prefix pattern"));

/// Repair loose text and parse it as JSON
///
/// ```
/// use quote_market::coerce;
/// use serde_json::json;
///
/// let value = coerce("{symbol: 700.HK, board: [Warrant, ABC], eps: 3.6}").unwrap();
/// assert_eq!(value, json!({"symbol": "700.HK", "board": ["Warrant", "ABC"], "eps": 3.6}));
/// ```
pub fn coerce(text: &str) -> Result<Value> {
    let repaired = repair(text);
    serde_json::from_str(&repaired).map_err(|e| MarketError::MalformedInput {
        detail: e.to_string(),
        text: repaired,
    })
}

/// Run stages 1-4 without parsing
pub fn repair(text: &str) -> String {
    let s = unescape_quotes(text.trim());
    let s = quote_keys(&s);
    let s = quote_list_items(&s);
    quote_bare_values(&s)
}

/// Stage 1: `\"` becomes `"`
pub fn unescape_quotes(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// Stage 2: `key:` becomes `"key":`
pub fn quote_keys(text: &str) -> String {
    RE_KEY
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(key) => format!("\"{}\":", key.as_str()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Stage 3: quote bare items of flat lists, `[Warrant, ABC]` becomes `["Warrant", "ABC"]`
///
/// Lists holding nested lists or objects are left untouched. Empty items are
/// dropped.
pub fn quote_list_items(text: &str) -> String {
    RE_FLAT_LIST
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(inner) => {
                let items: Vec<String> = split_outside_quotes(inner.as_str(), ',')
                    .into_iter()
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| {
                        if is_quoted(item) {
                            item.to_string()
                        } else {
                            literal_or_string(item)
                        }
                    })
                    .collect();
                format!("[{}]", items.join(", "))
            },
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Stage 4: quote bare values after a colon, `: 700.HK` becomes `: "700.HK"`
///
/// Numbers and `true`/`false`/`null` stay bare; opening brackets, braces and
/// quoted strings are skipped.
pub fn quote_bare_values(text: &str) -> String {
    RE_BARE_VALUE
        .replace_all(text, |caps: &Captures| {
            let (Some(space), Some(token)) = (caps.get(1), caps.get(2)) else {
                return caps[0].to_string();
            };
            let raw = token.as_str();
            let trimmed = raw.trim_end();
            let trailing = &raw[trimmed.len()..];
            format!(
                ":{}{}{}",
                space.as_str(),
                literal_or_string(trimmed),
                trailing
            )
        })
        .into_owned()
}

/// Remove a leading debug type name, `SecurityStaticInfo { .. }` becomes `{ .. }`
pub fn strip_type_prefix(record: &str) -> &str {
    match RE_TYPE_PREFIX.find(record) {
        Some(m) => &record[m.end() - 1..],
        None => record.trim_start(),
    }
}

/// Coerce a batch of records, stopping at the first malformed one
pub fn coerce_records<I, S>(records: I) -> Result<Vec<Value>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    records
        .into_iter()
        .map(|record| coerce(strip_type_prefix(record.as_ref())))
        .collect()
}

fn is_quoted(item: &str) -> bool {
    item.len() >= 2 && item.starts_with('"') && item.ends_with('"')
}

/// Bare JSON literal if `token` is one, otherwise a JSON string
fn literal_or_string(token: &str) -> String {
    if RE_NUMBER.is_match(token) {
        return token.to_string();
    }
    let lower = token.to_ascii_lowercase();
    if matches!(lower.as_str(), "true" | "false" | "null") {
        return lower;
    }
    serde_json::to_string(token).unwrap_or_else(|_| format!("\"{token}\""))
}

fn split_outside_quotes(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            },
            _ => {},
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_record() {
        let value = coerce("{symbol: 700.HK, board: [Warrant, ABC], eps: 3.6, active: true}").unwrap();
        let expected: Value =
            serde_json::from_str(r#"{"symbol":"700.HK","board":["Warrant","ABC"],"eps":3.6,"active":true}"#)
                .unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_quoted_value_with_comma_untouched() {
        let value = coerce(r#"{name: "Tencent, Inc"}"#).unwrap();
        assert_eq!(value, json!({"name": "Tencent, Inc"}));

        let value = coerce(r#"{names: ["Tencent, Inc", Alibaba], note: "a: b"}"#).unwrap();
        assert_eq!(
            value,
            json!({"names": ["Tencent, Inc", "Alibaba"], "note": "a: b"})
        );
    }

    #[test]
    fn test_valid_json_passes_through() {
        let text = r#"{"a": 1, "b": [true, null, "x"], "c": {"d": -2.5e3}}"#;
        let value = coerce(text).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(unescape_quotes(r#"{name: \"Tencent\"}"#), r#"{name: "Tencent"}"#);
        let value = coerce(r#"{name: \"Tencent\"}"#).unwrap();
        assert_eq!(value, json!({"name": "Tencent"}));
    }

    #[test]
    fn test_quote_keys_stage() {
        assert_eq!(quote_keys("{a: 1, b_2 : x}"), r#"{"a": 1, "b_2": x}"#);
        assert_eq!(quote_keys(r#"{"a": "k: v"}"#), r#"{"a": "k: v"}"#);
    }

    #[test]
    fn test_quote_list_items_stage() {
        assert_eq!(
            quote_list_items(r#"[Warrant, 1, -2.5, TRUE, "x", , null]"#),
            r#"["Warrant", 1, -2.5, true, "x", null]"#
        );
        assert_eq!(quote_list_items("[]"), "[]");
        // only the innermost flat list is rewritten
        assert_eq!(quote_list_items("[[a], {b}]"), "[[\"a\"], {b}]");
    }

    #[test]
    fn test_quote_bare_values_stage() {
        assert_eq!(
            quote_bare_values(r#"{"a": HKEquity, "b": 2, "c": False, "d": [x]}"#),
            r#"{"a": "HKEquity", "b": 2, "c": false, "d": [x]}"#
        );
        assert_eq!(
            quote_bare_values(r#"{"name": Tencent Holdings }"#),
            r#"{"name": "Tencent Holdings" }"#
        );
    }

    #[test]
    fn test_non_json_numbers_become_strings() {
        let value = coerce("{code: 00700, change: +1.5, lot: 100}").unwrap();
        assert_eq!(value, json!({"code": "00700", "change": "+1.5", "lot": 100}));
    }

    #[test]
    fn test_case_insensitive_literals() {
        let value = coerce("{a: True, b: NULL, c: [FALSE]}").unwrap();
        assert_eq!(value, json!({"a": true, "b": null, "c": [false]}));
    }

    #[test]
    fn test_nested_objects_and_lists_of_objects() {
        let value = coerce("{outer: {inner: value, n: 1}, items: [{k: a}, {k: b}]}").unwrap();
        assert_eq!(
            value,
            json!({"outer": {"inner": "value", "n": 1}, "items": [{"k": "a"}, {"k": "b"}]})
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(coerce("{}").unwrap(), json!({}));
        assert_eq!(coerce("{list: []}").unwrap(), json!({"list": []}));
        assert_eq!(coerce("[]").unwrap(), json!([]));
    }

    #[test]
    fn test_multiline_record() {
        let text = "{\n    symbol: \"700.HK\",\n    exchange: SEHK,\n    lot_size: 100\n}";
        let value = coerce(text).unwrap();
        assert_eq!(
            value,
            json!({"symbol": "700.HK", "exchange": "SEHK", "lot_size": 100})
        );
    }

    #[test]
    fn test_list_order_preserved() {
        let value = coerce("{board: [C, A, B]}").unwrap();
        assert_eq!(value["board"], json!(["C", "A", "B"]));
    }

    #[test]
    fn test_url_like_value_is_malformed() {
        let result = coerce("{url: http://example.com}");
        match result {
            Err(MarketError::MalformedInput { text, .. }) => assert!(text.contains("\"http\"")),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_is_malformed() {
        assert!(matches!(
            coerce("{symbol: 700.HK"),
            Err(MarketError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_strip_type_prefix() {
        assert_eq!(strip_type_prefix("SecurityStaticInfo { a: 1 }"), "{ a: 1 }");
        assert_eq!(strip_type_prefix("  { a: 1 }"), "{ a: 1 }");
        assert_eq!(strip_type_prefix("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_coerce_records() {
        let values = coerce_records([
            "SecurityStaticInfo { symbol: \"700.HK\", board: [HKEquity] }",
            "SecurityStaticInfo { symbol: \"AAPL.US\", eps: 6.1 }",
        ])
        .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["board"], json!(["HKEquity"]));
        assert_eq!(values[1]["eps"], json!(6.1));

        let result = coerce_records(["{a: 1}", "{b: "]);
        assert!(result.is_err());
    }
}
