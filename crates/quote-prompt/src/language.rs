//! Output language for prompts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language a prompt is rendered in
///
/// Chinese is the default: the label table and the analysis instructions
/// were written for a Chinese-reading audience.
///
/// ```
/// use quote_prompt::Language;
///
/// assert_eq!("zh-CN".parse::<Language>().unwrap(), Language::Chinese);
/// assert_eq!(Language::English.code(), "en");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese
    #[default]
    Chinese,
    /// English
    English,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }

    /// Every supported language, default first
    pub fn all() -> [Language; 2] {
        [Language::Chinese, Language::English]
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "cn" | "chinese" | "中文" | "zh-cn" | "zh-hans" => Ok(Language::Chinese),
            "en" | "english" | "en-us" | "en-gb" => Ok(Language::English),
            other => Err(format!("unsupported language '{other}' (expected zh or en)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("中文".parse::<Language>().unwrap(), Language::Chinese);
        assert!("ja".parse::<Language>().is_err());
    }

    #[test]
    fn test_default_is_chinese() {
        assert_eq!(Language::default(), Language::Chinese);
        assert_eq!(Language::all()[0], Language::Chinese);
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::Chinese.to_string(), "zh");
    }
}
