//! Free-text judgment parsing
//!
//! This module turns raw verdicts from the upstream judge into winner/loser
//! outcomes through an ordered list of extraction strategies.

pub mod parser;
pub mod strategy;

// Re-export commonly used types
pub use parser::{Extraction, JudgmentParser};
pub use strategy::{DecisionStrategy, DecisionSymbols, LeadingSymbol, TrailingSymbol};
