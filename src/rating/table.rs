//! Owned per-competitor belief table
//!
//! Each rater owns one table; tables are never shared between groups, so no
//! locking is involved. Entries keep registration order so that rankings
//! built from them break ties deterministically.

use crate::error::JudgeError;
use crate::types::{Competitor, SkillBelief};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table entry for one competitor's belief with bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefEntry {
    pub competitor: Competitor,
    pub belief: SkillBelief,
    pub comparisons: u64,
    pub wins: u64,
}

impl BeliefEntry {
    /// Create a new entry for a competitor that has not been compared yet
    pub fn new(competitor: Competitor, initial_belief: SkillBelief) -> Self {
        Self {
            competitor,
            belief: initial_belief,
            comparisons: 0,
            wins: 0,
        }
    }

    /// Replace the belief after a comparison
    pub fn record(&mut self, new_belief: SkillBelief, won: bool) {
        self.belief = new_belief;
        self.comparisons += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Whether the competitor took part in at least one comparison
    pub fn participated(&self) -> bool {
        self.comparisons > 0
    }
}

/// Closed set of competitors with their current beliefs
#[derive(Debug, Clone)]
pub struct BeliefTable {
    entries: Vec<BeliefEntry>,
    index: HashMap<Competitor, usize>,
}

impl BeliefTable {
    /// Register every competitor with the same initial belief
    pub fn new(
        competitors: &[Competitor],
        initial_belief: SkillBelief,
    ) -> crate::error::Result<Self> {
        if competitors.is_empty() {
            return Err(JudgeError::ConfigurationError {
                message: "At least one competitor must be registered".to_string(),
            }
            .into());
        }

        let mut entries = Vec::with_capacity(competitors.len());
        let mut index = HashMap::with_capacity(competitors.len());
        for competitor in competitors {
            if index.insert(competitor.clone(), entries.len()).is_some() {
                return Err(JudgeError::ConfigurationError {
                    message: format!("Competitor registered twice: {}", competitor),
                }
                .into());
            }
            entries.push(BeliefEntry::new(competitor.clone(), initial_belief));
        }

        Ok(Self { entries, index })
    }

    pub fn contains(&self, competitor: &str) -> bool {
        self.index.contains_key(competitor)
    }

    /// Look up a registered competitor
    pub fn get(&self, competitor: &str) -> crate::error::Result<&BeliefEntry> {
        self.index
            .get(competitor)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| unknown(competitor))
    }

    /// Mutable lookup of a registered competitor
    pub fn get_mut(&mut self, competitor: &str) -> crate::error::Result<&mut BeliefEntry> {
        match self.index.get(competitor) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(unknown(competitor)),
        }
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[BeliefEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unknown(competitor: &str) -> anyhow::Error {
    JudgeError::UnknownCompetitor {
        competitor: competitor.to_string(),
    }
    .into()
}
