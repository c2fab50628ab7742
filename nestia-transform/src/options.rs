//! Transform options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Options that shape the generated artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Which closure the artifact carries
    pub stringify: StringifyMode,
}

impl TransformOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stringify mode.
    pub fn with_stringify(mut self, mode: StringifyMode) -> Self {
        self.stringify = mode;
        self
    }
}

/// How the response body is checked before it is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringifyMode {
    /// Throw on a type mismatch, then serialize
    #[default]
    Assert,
    /// Serialize when the value matches, `null` otherwise
    Is,
    /// Return a `{ success, data, errors }` report
    Validate,
    /// Serialize without checking
    Stringify,
}

impl StringifyMode {
    /// All modes, in declaration order.
    pub const ALL: [StringifyMode; 4] = [
        StringifyMode::Assert,
        StringifyMode::Is,
        StringifyMode::Validate,
        StringifyMode::Stringify,
    ];

    /// Name used in config files and in the artifact's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringifyMode::Assert => "assert",
            StringifyMode::Is => "is",
            StringifyMode::Validate => "validate",
            StringifyMode::Stringify => "stringify",
        }
    }
}

impl fmt::Display for StringifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StringifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StringifyMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown stringify mode '{}', expected one of: assert, is, validate, stringify",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_assert() {
        assert_eq!(TransformOptions::default().stringify, StringifyMode::Assert);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("validate".parse::<StringifyMode>(), Ok(StringifyMode::Validate));
        assert!("json".parse::<StringifyMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let options: TransformOptions = serde_json::from_str(r#"{ "stringify": "is" }"#).unwrap();
        assert_eq!(options.stringify, StringifyMode::Is);
        let empty: TransformOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TransformOptions::default());
    }
}
