//! Rule record types and the built-in rule tables.
//!
//! Three kinds of rules drive the converter:
//! - `SimpleRule`: direct one-fragment-to-one-fragment substitution
//! - `ComplexRule`: up to three ordered marker fragments spanning a region
//! - `UrlEscape`: single-character escape applied only inside a region
//!
//! The built-in tables come in two tiers. The *default* tags ([B], [URL=...],
//! [COLOR=...], ...) are optional. The *baseline* escapes (HTML entities and
//! percent-encoded URL characters) are always registered because emitted
//! output must be structurally safe regardless of configuration.

use serde::{Deserialize, Serialize};

/// Direct one-for-one text substitution, e.g. `[B]` -> `<b>`.
///
/// Rules are tried in registration order; the first whose `pattern` matches
/// at the current scan position wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRule {
    /// Text to recognize in the source. Must be non-empty.
    pub pattern: String,
    /// Text emitted in place of `pattern`.
    pub replacement: String,
}

impl SimpleRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// A substitution keyed on up to three ordered marker fragments.
///
/// Between `open` and `middle` the scanner is in region mode: characters are
/// escaped via the `UrlEscape` table instead of being copied verbatim or
/// matched against simple rules. An empty `close` marks a two-part rule that
/// deactivates as soon as `middle` is consumed.
///
/// Two-part example: `[IMG]` / `<img src="` plus `[/IMG]` / `">` turns
/// `[IMG]https://example.com/a.png[/IMG]` into
/// `<img src="https://example.com/a.png">`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexRule {
    /// First marker fragment. Must be non-empty.
    pub open: String,
    /// Replacement for `open`.
    pub open_replacement: String,
    /// Second marker fragment, ends the region. Must be non-empty.
    pub middle: String,
    /// Replacement for `middle`.
    pub middle_replacement: String,
    /// Optional third marker fragment; empty means a two-part rule.
    pub close: String,
    /// Replacement for `close` (synthesized on truncated input).
    pub close_replacement: String,
}

impl ComplexRule {
    pub fn new(
        open: impl Into<String>,
        open_replacement: impl Into<String>,
        middle: impl Into<String>,
        middle_replacement: impl Into<String>,
        close: impl Into<String>,
        close_replacement: impl Into<String>,
    ) -> Self {
        Self {
            open: open.into(),
            open_replacement: open_replacement.into(),
            middle: middle.into(),
            middle_replacement: middle_replacement.into(),
            close: close.into(),
            close_replacement: close_replacement.into(),
        }
    }

    /// A rule with only open and middle markers (empty close fragment).
    pub fn is_two_part(&self) -> bool {
        self.close.is_empty()
    }
}

/// Single-character escape applied only between a complex rule's open and
/// middle markers, e.g. `"` -> `%22` so the character is safe inside an href.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEscape {
    /// The character to escape.
    pub character: char,
    /// Text emitted in its place.
    pub replacement: String,
}

impl UrlEscape {
    pub fn new(character: char, replacement: impl Into<String>) -> Self {
        Self {
            character,
            replacement: replacement.into(),
        }
    }
}

/// Default simple tag set: bold, italic, underline, strikethrough.
pub fn default_simple_rules() -> Vec<SimpleRule> {
    vec![
        SimpleRule::new("[B]", "<b>"),
        SimpleRule::new("[/B]", "</b>"),
        SimpleRule::new("[I]", "<i>"),
        SimpleRule::new("[/I]", "</i>"),
        SimpleRule::new("[U]", "<u>"),
        SimpleRule::new("[/U]", "</u>"),
        SimpleRule::new("[S]", "<s>"),
        SimpleRule::new("[/S]", "</s>"),
    ]
}

/// Default complex rule set: http/https links and colored spans.
///
/// All three are genuine three-part rules; the two-part shape is only
/// reachable through caller-added rules.
pub fn default_complex_rules() -> Vec<ComplexRule> {
    vec![
        ComplexRule::new(
            "[URL=\"http://",
            "<a href=\"http://",
            "\"]",
            "\">",
            "[/URL]",
            "</a>",
        ),
        ComplexRule::new(
            "[URL=\"https://",
            "<a href=\"https://",
            "\"]",
            "\">",
            "[/URL]",
            "</a>",
        ),
        ComplexRule::new(
            "[COLOR=\"",
            "<span style=\"color: ",
            "\"]",
            ";\">",
            "[/COLOR]",
            "</span>",
        ),
    ]
}

/// Baseline HTML entity escapes, always registered after the defaults so a
/// default tag at the same position still wins.
pub fn baseline_simple_escapes() -> Vec<SimpleRule> {
    vec![
        SimpleRule::new("\"", "&quot;"),
        SimpleRule::new("'", "&apos;"),
        SimpleRule::new("<", "&lt;"),
        SimpleRule::new(">", "&gt;"),
    ]
}

/// Baseline percent-encoded escapes for characters inside a URL region.
pub fn baseline_url_escapes() -> Vec<UrlEscape> {
    vec![
        UrlEscape::new('"', "%22"),
        UrlEscape::new('\'', "%27"),
        UrlEscape::new(';', "%3B"),
        UrlEscape::new('<', "%3C"),
        UrlEscape::new('>', "%3E"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_have_expected_shape() {
        assert_eq!(default_simple_rules().len(), 8);
        assert_eq!(default_complex_rules().len(), 3);
        assert_eq!(baseline_simple_escapes().len(), 4);
        assert_eq!(baseline_url_escapes().len(), 5);
    }

    #[test]
    fn default_complex_rules_are_three_part() {
        for rule in default_complex_rules() {
            assert!(!rule.is_two_part(), "default rule {:?} should carry a close marker", rule.open);
        }
    }

    #[test]
    fn two_part_detection() {
        let img = ComplexRule::new("[IMG]", "<img src=\"", "[/IMG]", "\">", "", "");
        assert!(img.is_two_part());
    }

    #[test]
    fn rule_serde_round_trip() {
        let rule = SimpleRule::new("[B]", "<b>");
        let json = serde_json::to_string(&rule).unwrap();
        let back: SimpleRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
