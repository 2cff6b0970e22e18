//! Field-name to display-label translation

use serde_json::{Map, Value};

/// Static-info field labels in simplified Chinese
const CHINESE_LABELS: &[(&str, &str)] = &[
    ("secu_static_info", "标的基础数据列表"),
    ("symbol", "标的代码"),
    ("name_cn", "中文简体标的名称"),
    ("name_en", "英文标的名称"),
    ("name_hk", "中文繁体标的名称"),
    ("exchange", "标的所属交易所"),
    ("currency", "交易币种"),
    ("lot_size", "每手股数"),
    ("total_shares", "总股本"),
    ("circulating_shares", "流通股本"),
    ("hk_shares", "港股股本 (仅港股)"),
    ("eps", "每股盈利"),
    ("eps_ttm", "每股盈利 (TTM)"),
    ("bps", "每股净资产"),
    ("dividend_yield", "股息"),
    ("stock_derivatives", "可提供的衍生品行情类型"),
    ("board", "标的所属板块"),
];

/// Immutable key-to-label mapping
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Labels for security static info
    pub const fn chinese() -> Self {
        Self::new(CHINESE_LABELS)
    }

    /// Label for `key`, if mapped
    pub fn label(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| *label)
    }

    /// Source key that maps to `label`
    pub fn source_key(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(key, _)| *key)
    }

    /// Entries whose label is itself a source key
    ///
    /// Relabelling is only idempotent when this is empty: a colliding label
    /// would be translated again on a second pass.
    pub fn collisions(&self) -> Vec<(&'static str, &'static str)> {
        self.entries
            .iter()
            .filter(|(_, label)| self.label(label).is_some())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::chinese()
    }
}

/// Replace mapped object keys with their labels, recursively
///
/// Unmapped keys are kept verbatim, key order is preserved and scalars pass
/// through unchanged.
pub fn relabel(value: &Value, table: &LabelTable) -> Value {
    match value {
        Value::Object(map) => {
            let relabelled: Map<String, Value> = map
                .iter()
                .map(|(key, val)| {
                    let key = table.label(key).map_or_else(|| key.clone(), str::to_string);
                    (key, relabel(val, table))
                })
                .collect();
            Value::Object(relabelled)
        },
        Value::Array(items) => Value::Array(items.iter().map(|v| relabel(v, table)).collect()),
        other => other.clone(),
    }
}
