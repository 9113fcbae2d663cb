//! Consensus ranking from pairwise judgments
//!
//! This module groups judgment records, drives one skill rater per group,
//! tallies wins, and assembles the ranking report.

pub mod aggregator;
pub mod grouping;
pub mod report;

// Re-export commonly used types
pub use aggregator::{AggregationStats, GroupStats, RankingAggregator, WinTally};
pub use grouping::{partition, GroupBy, OVERALL_GROUP};
pub use report::{GroupRanking, RankEntry, RankedScores, RankingReport};
