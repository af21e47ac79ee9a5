//! bbcode-core: Single-pass BBCode to HTML conversion engine
//!
//! This crate contains the pure conversion logic with NO I/O dependencies:
//! - Rule record types (SimpleRule, ComplexRule, UrlEscape)
//! - The BbcodeConverter scanning engine with an explicit scan state machine
//! - YAML/JSON rule-set configuration and loader
//! - Config validation errors
//!
//! The converter owns three ordered rule tables. Registration order is
//! semantically load-bearing: rules are tried in order and the first match
//! wins, so built-in defaults always precede caller-added rules.
//!
//! ```
//! use bbcode_core::BbcodeConverter;
//!
//! let conv = BbcodeConverter::new(true);
//! assert_eq!(conv.to_html("[B]hi[/B]"), "<b>hi</b>");
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod rules;

// Re-export commonly used types
pub use config::RulesConfig;
pub use converter::{to_html, BbcodeConverter};
pub use error::ConfigError;
pub use rules::{ComplexRule, SimpleRule, UrlEscape};
