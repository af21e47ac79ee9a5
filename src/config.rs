//! Rule-set configuration.
//!
//! Loads and validates rule tables from YAML or JSON so a deployment can
//! ship its tag set as data instead of code. A config builds into a
//! [`BbcodeConverter`]; validation runs first so malformed rule files fail
//! loudly at load time rather than looping or silently misbehaving during
//! conversion.
//!
//! ```yaml
//! include_defaults: true
//! simple:
//!   - pattern: "[UL]"
//!     replacement: "<ul>"
//!   - pattern: "[/UL]"
//!     replacement: "</ul>"
//! complex:
//!   - open: "[IMG]"
//!     open_replacement: "<img src=\""
//!     middle: "[/IMG]"
//!     middle_replacement: "\">"
//!     close: ""
//!     close_replacement: ""
//! url_escapes:
//!   - character: "("
//!     replacement: "%28"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::converter::BbcodeConverter;
use crate::error::ConfigError;
use crate::rules::{ComplexRule, SimpleRule, UrlEscape};

fn default_include_defaults() -> bool {
    true
}

/// Declarative rule set, deserializable from YAML or JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Register the built-in default tags before the configured ones.
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,

    /// Simple substitution rules, in match-priority order.
    #[serde(default)]
    pub simple: Vec<SimpleRule>,

    /// Complex (multi-marker) rules, in match-priority order.
    #[serde(default)]
    pub complex: Vec<ComplexRule>,

    /// Additional URL-escape rules, in match-priority order.
    #[serde(default)]
    pub url_escapes: Vec<UrlEscape>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            simple: Vec::new(),
            complex: Vec::new(),
            url_escapes: Vec::new(),
        }
    }
}

impl RulesConfig {
    /// Parse a YAML rule set.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse rules config YAML")
    }

    /// Parse a JSON rule set.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse rules config JSON")
    }

    /// Load and parse a YAML rule-set file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading BBCode rules config from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules config {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("in rules config {}", path.display()))
    }

    /// Check the configured rules for patterns the engine cannot honor.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (index, rule) in self.simple.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(ConfigError::EmptyPattern {
                    table: "simple",
                    index,
                    field: "pattern",
                });
            }
        }

        for (index, rule) in self.complex.iter().enumerate() {
            if rule.open.is_empty() {
                return Err(ConfigError::EmptyPattern {
                    table: "complex",
                    index,
                    field: "open",
                });
            }
            if rule.middle.is_empty() {
                return Err(ConfigError::EmptyPattern {
                    table: "complex",
                    index,
                    field: "middle",
                });
            }
            if rule.close.is_empty() && !rule.close_replacement.is_empty() {
                return Err(ConfigError::DanglingCloseReplacement { index });
            }
        }

        Ok(())
    }

    /// Validate and build a converter carrying the configured rules.
    ///
    /// Configured rules are registered after the defaults and baselines, so
    /// built-ins keep match priority just as with programmatic registration.
    pub fn build(&self) -> std::result::Result<BbcodeConverter, ConfigError> {
        self.validate()?;

        let mut conv = BbcodeConverter::new(self.include_defaults);
        for rule in &self.simple {
            conv.add_simple_rule(rule.pattern.clone(), rule.replacement.clone());
        }
        for rule in &self.complex {
            conv.add_complex_rule(
                rule.open.clone(),
                rule.open_replacement.clone(),
                rule.middle.clone(),
                rule.middle_replacement.clone(),
                rule.close.clone(),
                rule.close_replacement.clone(),
            );
        }
        for escape in &self.url_escapes {
            conv.add_url_escape(escape.character, escape.replacement.clone());
        }

        info!(
            simple = self.simple.len(),
            complex = self.complex.len(),
            url_escapes = self.url_escapes.len(),
            include_defaults = self.include_defaults,
            "built converter from rules config"
        );
        Ok(conv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_YAML: &str = r#"
include_defaults: false
simple:
  - pattern: "[UL]"
    replacement: "<ul>"
  - pattern: "[/UL]"
    replacement: "</ul>"
complex:
  - open: "[IMG]"
    open_replacement: "<img src=\""
    middle: "[/IMG]"
    middle_replacement: "\">"
    close: ""
    close_replacement: ""
url_escapes:
  - character: "("
    replacement: "%28"
"#;

    #[test]
    fn yaml_parses_and_builds() {
        let config = RulesConfig::from_yaml_str(SAMPLE_YAML).unwrap();
        assert!(!config.include_defaults);
        assert_eq!(config.simple.len(), 2);

        let conv = config.build().unwrap();
        assert_eq!(conv.to_html("[UL]x[/UL]"), "<ul>x</ul>");
        assert_eq!(conv.to_html("[IMG]a(b[/IMG]"), "<img src=\"a%28b\">");
        // include_defaults: false leaves [B] unrecognized.
        assert_eq!(conv.to_html("[B]x[/B]"), "[B]x[/B]");
    }

    #[test]
    fn include_defaults_defaults_to_true() {
        let config = RulesConfig::from_yaml_str("simple: []").unwrap();
        assert!(config.include_defaults);
        let conv = config.build().unwrap();
        assert_eq!(conv.to_html("[B]x[/B]"), "<b>x</b>");
    }

    #[test]
    fn json_parses() {
        let config = RulesConfig::from_json_str(
            r#"{"include_defaults": true, "simple": [{"pattern": "[Q]", "replacement": "<q>"}]}"#,
        )
        .unwrap();
        let conv = config.build().unwrap();
        assert_eq!(conv.to_html("[Q]quoted"), "<q>quoted");
    }

    #[test]
    fn empty_simple_pattern_is_rejected() {
        let config = RulesConfig::from_yaml_str(
            r#"
simple:
  - pattern: ""
    replacement: "x"
"#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyPattern {
                table: "simple",
                index: 0,
                field: "pattern",
            })
        );
        assert!(config.build().is_err());
    }

    #[test]
    fn empty_complex_markers_are_rejected() {
        let config = RulesConfig::from_yaml_str(
            r#"
complex:
  - open: "[X]"
    open_replacement: "<x>"
    middle: ""
    middle_replacement: ""
    close: ""
    close_replacement: ""
"#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyPattern {
                table: "complex",
                index: 0,
                field: "middle",
            })
        );
    }

    #[test]
    fn dangling_close_replacement_is_rejected() {
        let config = RulesConfig::from_yaml_str(
            r#"
complex:
  - open: "[X]"
    open_replacement: "<x>"
    middle: "[/X]"
    middle_replacement: "</x>"
    close: ""
    close_replacement: "</leftover>"
"#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DanglingCloseReplacement { index: 0 })
        );
    }

    #[test]
    fn yaml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, SAMPLE_YAML).unwrap();

        let config = RulesConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.complex.len(), 1);
    }

    #[test]
    fn missing_file_carries_path_context() {
        let err = RulesConfig::from_yaml_file("/nonexistent/rules.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/rules.yaml"));
    }
}
