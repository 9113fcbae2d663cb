//! Judgment parser configuration

use serde::{Deserialize, Serialize};

/// How verdict text is searched for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Phrase preceding the decision, matched case-insensitively
    pub marker: String,
    /// Word removed from the normalized decision token
    pub strip_word: String,
    /// Symbol naming the first translation of the pair
    pub symbol_a: char,
    /// Symbol naming the second translation of the pair
    pub symbol_b: char,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            marker: "chosen translation:".to_string(),
            strip_word: "translation".to_string(),
            symbol_a: 'a',
            symbol_b: 'b',
        }
    }
}
