//! Ranking report structures
//!
//! Scores are kept in rank order and serialized as ordered JSON maps:
//! `{ "Overall": { "winner_count": {..}, "skill_score": {..} }, "<group>": {..} }`.

use crate::ranking::grouping::OVERALL_GROUP;
use crate::types::Competitor;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// A competitor's score in one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub competitor: Competitor,
    pub score: f64,
}

impl RankEntry {
    pub fn new(competitor: impl Into<Competitor>, score: f64) -> Self {
        Self {
            competitor: competitor.into(),
            score,
        }
    }
}

/// Scores ordered from best to worst
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedScores(Vec<RankEntry>);

impl RankedScores {
    /// Sort descending by score. Ties keep their input order.
    pub fn from_unsorted(mut entries: Vec<RankEntry>) -> Self {
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self(entries)
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.0
    }

    pub fn get(&self, competitor: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|e| e.competitor == competitor)
            .map(|e| e.score)
    }

    /// Zero-based rank of a competitor
    pub fn position(&self, competitor: &str) -> Option<usize> {
        self.0.iter().position(|e| e.competitor == competitor)
    }

    pub fn leader(&self) -> Option<&RankEntry> {
        self.0.first()
    }

    pub fn competitors(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.competitor.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RankedScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.competitor, &entry.score)?;
        }
        map.end()
    }
}

/// Both views for one group
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GroupRanking {
    pub winner_count: RankedScores,
    pub skill_score: RankedScores,
}

/// Per-group rankings plus the averaged overall ranking
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankingReport {
    pub overall: GroupRanking,
    pub groups: BTreeMap<String, GroupRanking>,
}

impl RankingReport {
    /// Look up a group; `"Overall"` returns the averaged ranking
    pub fn group(&self, name: &str) -> Option<&GroupRanking> {
        if name == OVERALL_GROUP {
            Some(&self.overall)
        } else {
            self.groups.get(name)
        }
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }
}

impl Serialize for RankingReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        map.serialize_entry(OVERALL_GROUP, &self.overall)?;
        for (name, ranking) in &self.groups {
            map.serialize_entry(name, ranking)?;
        }
        map.end()
    }
}
