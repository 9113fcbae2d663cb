//! Skill rating for pairwise outcomes using TrueSkill
//!
//! This module provides the rater interface, the per-competitor belief table,
//! and the integration with the skillratings crate for 1-vs-1 updates.

pub mod rater;
pub mod table;
pub mod trueskill;

// Re-export commonly used types
pub use rater::{RatingUpdate, SkillRater};
pub use table::{BeliefEntry, BeliefTable};
pub use trueskill::{ExtendedTrueSkillConfig, TrueSkillRater};
