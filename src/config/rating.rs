//! Rating system configuration

use crate::rating::ExtendedTrueSkillConfig;
use crate::types::Competitor;
use serde::{Deserialize, Serialize};

/// Competitor set and TrueSkill parameters for one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Closed competitor set, in registration order
    pub competitors: Vec<Competitor>,
    pub trueskill: ExtendedTrueSkillConfig,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            competitors: vec![
                "nllb".to_string(),
                "upv-cmbt".to_string(),
                "itzuli".to_string(),
            ],
            trueskill: ExtendedTrueSkillConfig::default(),
        }
    }
}
