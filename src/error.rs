//! Configuration validation errors.

use thiserror::Error;

/// Why a [`RulesConfig`](crate::RulesConfig) was rejected.
///
/// The conversion engine itself is infallible; validation only guards the
/// configuration path, where rule tables arrive from files rather than code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A rule carries an empty match fragment. An empty pattern would match
    /// at every scan position without advancing, so it is never valid.
    #[error("{table} rule #{index} has an empty `{field}` pattern")]
    EmptyPattern {
        /// Which table the rule belongs to ("simple" or "complex").
        table: &'static str,
        /// Zero-based position within that table in the config.
        index: usize,
        /// The offending field name.
        field: &'static str,
    },

    /// A complex rule pairs a non-empty close replacement with an empty
    /// close marker. An empty close marker means a two-part rule, so the
    /// close replacement could only ever surface through the end-of-input
    /// closure path; almost certainly a mistake in the rule file.
    #[error("complex rule #{index} has a close replacement but no close marker")]
    DanglingCloseReplacement { index: usize },
}
