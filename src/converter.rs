//! The BBCode conversion engine.
//!
//! `BbcodeConverter` owns three ordered rule tables and performs a single
//! left-to-right scan over the input:
//! 1. With no active complex rule, try complex-rule open markers in order
//! 2. With an active rule, try its middle marker (region end)
//! 3. With middle consumed, try its close marker
//! 4. Inside a region, try the URL-escape table; unmatched region characters
//!    are copied verbatim (simple rules never apply inside a region)
//! 5. Otherwise try the simple-rule table in order
//! 6. Otherwise copy the character
//!
//! Every replacement advances the scan past the matched fragment, so
//! replacement text is never re-scanned and the scan always terminates.
//! If the input ends while a complex rule is still active, the missing
//! replacements are appended so every opened construct is closed.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::rules::{
    baseline_simple_escapes, baseline_url_escapes, default_complex_rules, default_simple_rules,
    ComplexRule, SimpleRule, UrlEscape,
};

/// Where the scan currently stands relative to complex-rule markers.
///
/// The index points into the complex-rule table at the rule whose open
/// marker was consumed. Making the state a tagged variant (rather than an
/// index plus two booleans) keeps the transitions exhaustive: there is no
/// representable "middle seen but open not seen" state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// No complex rule active; open markers are eligible.
    Idle,
    /// Open marker consumed; scanning the region for the middle marker.
    InRegion(usize),
    /// Middle marker consumed; scanning for the close marker.
    AfterRegion(usize),
}

/// Converts BBCode to HTML via ordered substitution rule tables.
///
/// Registration order is first-match-wins. `new(true)` registers the default
/// tag set before anything else; the baseline HTML-entity and URL escapes
/// are always registered so output is structurally safe either way. Caller
/// rules land after both tiers.
///
/// Registration and conversion are separate phases: `add_*` methods take
/// `&mut self`, while `to_html` takes `&self` and never mutates the tables,
/// so a fully configured converter can serve concurrent conversions.
#[derive(Clone, Debug)]
pub struct BbcodeConverter {
    complex_rules: Vec<ComplexRule>,
    simple_rules: Vec<SimpleRule>,
    url_escapes: Vec<UrlEscape>,
}

impl BbcodeConverter {
    /// Create a converter. When `include_defaults` is true the built-in tag
    /// set ([B], [I], [URL=...], [COLOR=...], ...) is registered first;
    /// the baseline escapes are registered regardless.
    pub fn new(include_defaults: bool) -> Self {
        let mut conv = Self {
            complex_rules: Vec::new(),
            simple_rules: Vec::new(),
            url_escapes: Vec::new(),
        };

        if include_defaults {
            conv.complex_rules = default_complex_rules();
            conv.simple_rules = default_simple_rules();
        }

        conv.simple_rules.extend(baseline_simple_escapes());
        conv.url_escapes.extend(baseline_url_escapes());

        debug!(
            simple = conv.simple_rules.len(),
            complex = conv.complex_rules.len(),
            url_escapes = conv.url_escapes.len(),
            "constructed BBCode converter"
        );
        conv
    }

    /// Append a simple substitution rule, e.g. `[UL]` -> `<ul>`.
    ///
    /// No validation is performed; overlapping patterns are resolved by
    /// registration order. `pattern` must be non-empty (an empty pattern
    /// would match at every position without advancing the scan).
    pub fn add_simple_rule(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        self.simple_rules.push(SimpleRule::new(pattern, replacement));
    }

    /// Append a complex rule from its marker/replacement fragments, in the
    /// order open, open replacement, middle, middle replacement, close,
    /// close replacement. Pass empty strings for the close pair to register
    /// a two-part rule. Text between the open and middle markers is treated
    /// as a URL and escaped via the URL-escape table.
    pub fn add_complex_rule(
        &mut self,
        open: impl Into<String>,
        open_replacement: impl Into<String>,
        middle: impl Into<String>,
        middle_replacement: impl Into<String>,
        close: impl Into<String>,
        close_replacement: impl Into<String>,
    ) {
        self.complex_rules.push(ComplexRule::new(
            open,
            open_replacement,
            middle,
            middle_replacement,
            close,
            close_replacement,
        ));
    }

    /// Append a URL-escape rule, e.g. `(` -> `%28`. Applies only inside the
    /// region between a complex rule's open and middle markers.
    pub fn add_url_escape(&mut self, character: char, replacement: impl Into<String>) {
        self.url_escapes.push(UrlEscape::new(character, replacement));
    }

    /// Builder-style variant of [`add_simple_rule`](Self::add_simple_rule).
    pub fn with_simple_rule(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.add_simple_rule(pattern, replacement);
        self
    }

    /// Builder-style variant of [`add_complex_rule`](Self::add_complex_rule).
    pub fn with_complex_rule(
        mut self,
        open: impl Into<String>,
        open_replacement: impl Into<String>,
        middle: impl Into<String>,
        middle_replacement: impl Into<String>,
        close: impl Into<String>,
        close_replacement: impl Into<String>,
    ) -> Self {
        self.add_complex_rule(
            open,
            open_replacement,
            middle,
            middle_replacement,
            close,
            close_replacement,
        );
        self
    }

    /// Builder-style variant of [`add_url_escape`](Self::add_url_escape).
    pub fn with_url_escape(mut self, character: char, replacement: impl Into<String>) -> Self {
        self.add_url_escape(character, replacement);
        self
    }

    /// The simple-rule table, in match-priority order.
    pub fn simple_rules(&self) -> &[SimpleRule] {
        &self.simple_rules
    }

    /// The complex-rule table, in match-priority order.
    pub fn complex_rules(&self) -> &[ComplexRule] {
        &self.complex_rules
    }

    /// The URL-escape table, in match-priority order.
    pub fn url_escapes(&self) -> &[UrlEscape] {
        &self.url_escapes
    }

    /// Convert BBCode in `source` to an HTML fragment.
    ///
    /// Never fails: malformed or truncated input still produces output, with
    /// any unterminated complex rule closed off deterministically at end of
    /// input. The emitted text has the baseline reserved characters escaped;
    /// output it without escaping again.
    pub fn to_html(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + source.len() / 4);
        let mut state = ScanState::Idle;
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];

            match state {
                ScanState::Idle => {
                    if let Some((idx, rule)) = self
                        .complex_rules
                        .iter()
                        .enumerate()
                        .find(|(_, rule)| rest.starts_with(rule.open.as_str()))
                    {
                        out.push_str(&rule.open_replacement);
                        pos += rule.open.len();
                        state = ScanState::InRegion(idx);
                        continue;
                    }
                }
                ScanState::InRegion(idx) => {
                    let rule = &self.complex_rules[idx];
                    if rest.starts_with(rule.middle.as_str()) {
                        out.push_str(&rule.middle_replacement);
                        pos += rule.middle.len();
                        state = if rule.is_two_part() {
                            ScanState::Idle
                        } else {
                            ScanState::AfterRegion(idx)
                        };
                        continue;
                    }
                }
                ScanState::AfterRegion(idx) => {
                    let rule = &self.complex_rules[idx];
                    if rest.starts_with(rule.close.as_str()) {
                        out.push_str(&rule.close_replacement);
                        pos += rule.close.len();
                        state = ScanState::Idle;
                        continue;
                    }
                }
            }

            let Some(ch) = rest.chars().next() else { break };

            // Inside a region only URL escapes apply; simple rules are
            // reserved for regular text.
            if matches!(state, ScanState::InRegion(_)) {
                if let Some(escape) = self.url_escapes.iter().find(|e| e.character == ch) {
                    out.push_str(&escape.replacement);
                } else {
                    out.push(ch);
                }
                pos += ch.len_utf8();
                continue;
            }

            if let Some(rule) = self
                .simple_rules
                .iter()
                .find(|rule| rest.starts_with(rule.pattern.as_str()))
            {
                out.push_str(&rule.replacement);
                pos += rule.pattern.len();
                continue;
            }

            out.push(ch);
            pos += ch.len_utf8();
        }

        // Close off any complex rule left open by truncated input.
        match state {
            ScanState::Idle => {}
            ScanState::InRegion(idx) => {
                let rule = &self.complex_rules[idx];
                out.push_str(&rule.middle_replacement);
                out.push_str(&rule.close_replacement);
            }
            ScanState::AfterRegion(idx) => {
                out.push_str(&self.complex_rules[idx].close_replacement);
            }
        }

        out
    }
}

impl Default for BbcodeConverter {
    /// Equivalent to `BbcodeConverter::new(true)`.
    fn default() -> Self {
        Self::new(true)
    }
}

static DEFAULT_CONVERTER: Lazy<BbcodeConverter> = Lazy::new(|| BbcodeConverter::new(true));

/// Convert with a shared converter carrying the default rule set.
pub fn to_html(source: &str) -> String {
    DEFAULT_CONVERTER.to_html(source)
}
