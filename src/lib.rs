//! Pairwise Judge - consensus ranking of translation systems
//!
//! This crate turns free-text pairwise verdicts from an automated judge into
//! per-group and overall rankings (win counts and TrueSkill means), measures
//! agreement between two human annotators with Krippendorff's alpha, and
//! builds the seeded comparison schedule sent to the judge.

pub mod agreement;
pub mod config;
pub mod error;
pub mod io;
pub mod judgment;
pub mod pairing;
pub mod ranking;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{JudgeError, Result};
pub use types::*;

// Re-export key components
pub use agreement::{AgreementCalculator, MeasurementLevel, ReliabilityUnit};
pub use judgment::JudgmentParser;
pub use pairing::PairScheduler;
pub use ranking::{RankingAggregator, RankingReport};
pub use rating::{SkillRater, TrueSkillRater};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
