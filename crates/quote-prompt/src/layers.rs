//! Layered YAML prompt files
//!
//! Prompt text can live outside the binary in a directory of YAML files that
//! are merged from general to specific:
//!
//! ```text
//! prompts/
//! ├── foundation.yaml            # always loaded
//! ├── domain/analysis.yaml       # domain of the module
//! ├── modules/<module>.yaml
//! └── scenarios/<scenario>.yaml
//! ```
//!
//! Later layers override earlier ones key by key; nested mappings merge
//! recursively, anything else is replaced. A missing file is an empty layer.
//! After merging, the `system`, `assistant_primer` and `user_template` strings
//! get `{var}` placeholders substituted.

use crate::{PromptError, Result};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keys whose string values receive `{var}` substitution
pub const RENDERED_KEYS: [&str; 3] = ["system", "assistant_primer", "user_template"];

/// Module-to-domain routing
const MODULE_DOMAINS: &[(&str, &str)] = &[("realtime_analysis", "analysis")];

/// Loader rooted at a prompts directory
#[derive(Debug, Clone)]
pub struct PromptLayers {
    root: PathBuf,
}

/// Result of merging and rendering the layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredPrompt {
    merged: Mapping,
}

impl PromptLayers {
    /// Create a loader for `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Domain a module belongs to, if any
    pub fn domain_for(module: &str) -> Option<&'static str> {
        MODULE_DOMAINS
            .iter()
            .find(|(m, _)| *m == module)
            .map(|(_, domain)| *domain)
    }

    /// Load, merge and render the layers for `module` / `scenario`
    ///
    /// `now` (local time, `%Y-%m-%d %H:%M:%S`) is always available as a
    /// variable; entries in `vars` override it.
    pub fn load(
        &self,
        module: Option<&str>,
        scenario: Option<&str>,
        vars: &BTreeMap<String, String>,
    ) -> Result<LayeredPrompt> {
        let mut paths = vec![self.root.join("foundation.yaml")];
        if let Some(domain) = module.and_then(Self::domain_for) {
            paths.push(self.root.join("domain").join(format!("{domain}.yaml")));
        }
        if let Some(module) = module {
            paths.push(self.root.join("modules").join(format!("{module}.yaml")));
        }
        if let Some(scenario) = scenario {
            paths.push(self.root.join("scenarios").join(format!("{scenario}.yaml")));
        }

        let mut merged = Value::Mapping(Mapping::new());
        for path in &paths {
            let layer = read_layer(path)?;
            if !layer.is_null() {
                deep_merge(&mut merged, layer);
            }
        }

        let mut all_vars = BTreeMap::new();
        all_vars.insert(
            "now".to_string(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        all_vars.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut merged = match merged {
            Value::Mapping(map) => map,
            _ => Mapping::new(),
        };
        for key in RENDERED_KEYS {
            if let Some(Value::String(text)) = merged.get_mut(key) {
                *text = render_placeholders(text, &all_vars);
            }
        }

        Ok(LayeredPrompt { merged })
    }
}

impl LayeredPrompt {
    /// String value for `key`, if present
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.merged.get(key).and_then(Value::as_str)
    }

    /// Rendered system prompt
    pub fn system(&self) -> Option<&str> {
        self.get_str("system")
    }

    /// Rendered assistant primer
    pub fn assistant_primer(&self) -> Option<&str> {
        self.get_str("assistant_primer")
    }

    /// Rendered user message template
    pub fn user_template(&self) -> Option<&str> {
        self.get_str("user_template")
    }

    /// Raw merged document
    pub fn as_mapping(&self) -> &Mapping {
        &self.merged
    }

    /// Whether no layer contributed anything
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

fn read_layer(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "prompt layer missing, skipping");
        return Ok(Value::Null);
    }
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&raw).map_err(|e| PromptError::LayerLoadError {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded prompt layer");
    Ok(value)
}

/// Recursively merge `overlay` into `base`
///
/// Mappings merge key by key; any other overlay value replaces the base.
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => {
                        base_map.insert(key, overlay_val);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Replace every `{name}` with its value; unknown placeholders stay as-is
pub fn render_placeholders(template: &str, vars: &BTreeMap<String, String>) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
