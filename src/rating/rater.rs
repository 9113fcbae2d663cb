//! Skill rater trait
//!
//! This module defines the interface for sequential 1-vs-1 skill updates.
//! Implementations own their competitors' beliefs and are not shared across
//! aggregation groups.

use crate::rating::table::BeliefEntry;
use crate::types::{BeliefChange, Competitor, SkillBelief};
use serde::{Deserialize, Serialize};

/// Result of applying one win/loss outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub winner: BeliefChange,
    pub loser: BeliefChange,
}

/// Trait for maintaining skill beliefs from pairwise outcomes
pub trait SkillRater {
    /// Current belief for a registered competitor
    fn current_belief(&self, competitor: &str) -> crate::error::Result<SkillBelief>;

    /// Apply a single outcome. Order of calls affects the final beliefs.
    ///
    /// # Errors
    /// Fails when either side is not registered or both sides are the same
    /// competitor.
    fn update(&mut self, winner: &str, loser: &str) -> crate::error::Result<RatingUpdate>;

    /// All entries in registration order
    fn entries(&self) -> &[BeliefEntry];

    /// Belief every competitor starts from
    fn initial_belief(&self) -> SkillBelief;

    /// Registered competitors in registration order
    fn competitors(&self) -> Vec<Competitor> {
        self.entries().iter().map(|e| e.competitor.clone()).collect()
    }
}
