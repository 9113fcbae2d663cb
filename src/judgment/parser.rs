//! Judgment parser
//!
//! Turns one free-text verdict plus the pair it was asked about into a
//! winner/loser outcome. A verdict that cannot be resolved is reported as a
//! `JudgeError::ParseFailure`; callers log it and drop the record.

use crate::config::ParserSettings;
use crate::error::JudgeError;
use crate::judgment::strategy::{
    default_strategies, locate_fragment, normalize_fragment, DecisionStrategy, DecisionSymbols,
};
use crate::types::{Decision, JudgmentRecord, ParsedOutcome};

/// Longest fragment carried in a parse failure
const MAX_FRAGMENT_CHARS: usize = 200;

/// Intermediate result of reading a verdict
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Text the decision was searched in
    pub fragment: String,
    /// Normalized token the strategies saw
    pub token: String,
    /// Resolved decision and the strategy that found it
    pub decision: Option<(Decision, &'static str)>,
}

#[derive(Debug)]
pub struct JudgmentParser {
    marker: String,
    strip_word: String,
    symbols: DecisionSymbols,
    strategies: Vec<Box<dyn DecisionStrategy>>,
}

impl JudgmentParser {
    /// Create a parser using the default strategy order
    pub fn new(settings: &ParserSettings) -> crate::error::Result<Self> {
        let symbols = DecisionSymbols::new(settings.symbol_a, settings.symbol_b).ok_or_else(|| {
            JudgeError::ConfigurationError {
                message: format!(
                    "Decision symbols must be two distinct alphanumeric characters, got {:?} and {:?}",
                    settings.symbol_a, settings.symbol_b
                ),
            }
        })?;

        Ok(Self {
            marker: settings.marker.clone(),
            strip_word: settings.strip_word.clone(),
            symbols,
            strategies: default_strategies(),
        })
    }

    /// Replace the ordered strategy list
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn DecisionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Run the extraction pipeline on a raw verdict
    pub fn extract(&self, raw_text: &str) -> Extraction {
        let fragment = locate_fragment(raw_text, &self.marker);
        let token = normalize_fragment(&fragment, &self.strip_word);

        let decision = self.strategies.iter().find_map(|strategy| {
            strategy
                .extract(&token, &self.symbols)
                .map(|decision| (decision, strategy.name()))
        });

        Extraction {
            fragment,
            token,
            decision,
        }
    }

    /// Resolve a record to its winner and loser
    pub fn parse(&self, record: &JudgmentRecord) -> std::result::Result<ParsedOutcome, JudgeError> {
        let extraction = self.extract(&record.raw_text);
        let (first, second) = &record.competitors;

        let (winner, loser) = match extraction.decision {
            Some((Decision::A, _)) => (first, second),
            Some((Decision::B, _)) => (second, first),
            None => {
                return Err(JudgeError::ParseFailure {
                    item_id: record.item_id.clone(),
                    fragment: truncate(extraction.fragment.trim()),
                })
            }
        };

        Ok(ParsedOutcome {
            winner: winner.clone(),
            loser: loser.clone(),
            source_item_id: record.item_id.clone(),
        })
    }
}

impl Default for JudgmentParser {
    fn default() -> Self {
        Self {
            marker: ParserSettings::default().marker,
            strip_word: ParserSettings::default().strip_word,
            symbols: DecisionSymbols::default(),
            strategies: default_strategies(),
        }
    }
}

fn truncate(fragment: &str) -> String {
    fragment.chars().take(MAX_FRAGMENT_CHARS).collect()
}
