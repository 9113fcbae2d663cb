//! Record grouping for per-group rankings

use crate::error::JudgeError;
use crate::types::JudgmentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Name of the averaged group in every report
pub const OVERALL_GROUP: &str = "Overall";

/// Built-in grouping keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One group per language tag
    Language,
    /// A single group holding every record
    All,
}

impl GroupBy {
    pub fn key(&self, record: &JudgmentRecord) -> String {
        match self {
            GroupBy::Language => record.language.clone(),
            GroupBy::All => "all".to_string(),
        }
    }
}

impl FromStr for GroupBy {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "language" | "lang" => Ok(GroupBy::Language),
            "all" => Ok(GroupBy::All),
            other => Err(JudgeError::ConfigurationError {
                message: format!("Unknown grouping: {}", other),
            }),
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupBy::Language => write!(f, "language"),
            GroupBy::All => write!(f, "all"),
        }
    }
}

/// Split records by key, keeping input order inside each group
pub fn partition<'a, F>(
    records: &'a [JudgmentRecord],
    group_key: F,
) -> BTreeMap<String, Vec<&'a JudgmentRecord>>
where
    F: Fn(&JudgmentRecord) -> String,
{
    let mut groups: BTreeMap<String, Vec<&JudgmentRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(group_key(record)).or_default().push(record);
    }
    groups
}
