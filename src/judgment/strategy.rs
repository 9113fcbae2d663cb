//! Extraction steps for free-text verdicts
//!
//! A verdict goes through `locate_fragment`, then `normalize_fragment`, then
//! each `DecisionStrategy` in order until one resolves a decision symbol.

use crate::types::Decision;

/// The two characters that name side A and side B of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionSymbols {
    a: char,
    b: char,
}

impl DecisionSymbols {
    /// Symbols are matched case-insensitively
    pub fn new(a: char, b: char) -> Option<Self> {
        let a = lower(a);
        let b = lower(b);
        if a == b || !a.is_alphanumeric() || !b.is_alphanumeric() {
            return None;
        }
        Some(Self { a, b })
    }

    pub fn decide(&self, symbol: char) -> Option<Decision> {
        let symbol = lower(symbol);
        if symbol == self.a {
            Some(Decision::A)
        } else if symbol == self.b {
            Some(Decision::B)
        } else {
            None
        }
    }
}

impl Default for DecisionSymbols {
    fn default() -> Self {
        Self { a: 'a', b: 'b' }
    }
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Take the lowercased text after the first marker occurrence, up to the next
/// one. Without a marker the whole lowercased text is used.
pub fn locate_fragment(text: &str, marker: &str) -> String {
    let text = text.to_lowercase();
    let marker = marker.to_lowercase();
    if marker.is_empty() {
        return text;
    }

    let mut parts = text.split(marker.as_str());
    let head = parts.next().unwrap_or_default();
    match parts.next() {
        Some(after) => after.to_string(),
        None => head.to_string(),
    }
}

/// Lowercase, drop punctuation and whitespace, then remove the strip word
pub fn normalize_fragment(fragment: &str, strip_word: &str) -> String {
    let compact: String = fragment
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    if strip_word.is_empty() {
        compact
    } else {
        compact.replace(&strip_word.to_lowercase(), "")
    }
}

/// One way of reading a decision symbol out of a normalized token
pub trait DecisionStrategy: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, token: &str, symbols: &DecisionSymbols) -> Option<Decision>;
}

/// First character of the token
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingSymbol;

impl DecisionStrategy for LeadingSymbol {
    fn name(&self) -> &'static str {
        "leading"
    }

    fn extract(&self, token: &str, symbols: &DecisionSymbols) -> Option<Decision> {
        token.chars().next().and_then(|c| symbols.decide(c))
    }
}

/// Last character of the token
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingSymbol;

impl DecisionStrategy for TrailingSymbol {
    fn name(&self) -> &'static str {
        "trailing"
    }

    fn extract(&self, token: &str, symbols: &DecisionSymbols) -> Option<Decision> {
        token.chars().next_back().and_then(|c| symbols.decide(c))
    }
}

/// Leading, then trailing
pub fn default_strategies() -> Vec<Box<dyn DecisionStrategy>> {
    vec![Box::new(LeadingSymbol), Box::new(TrailingSymbol)]
}
