//! Common types used throughout judgment ranking

use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;

/// Identifier of one translation system under comparison
pub type Competitor = String;

/// Which side of a presented pair the judge preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    A,
    B,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::A => write!(f, "A"),
            Decision::B => write!(f, "B"),
        }
    }
}

/// One pairwise comparison as produced by the upstream judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRecord {
    #[serde(alias = "id", deserialize_with = "deserialize_item_id")]
    pub item_id: String,
    pub language: String,
    /// The pair as presented: `.0` was shown as A, `.1` as B
    #[serde(alias = "combination")]
    pub competitors: (Competitor, Competitor),
    #[serde(alias = "model_evaluation")]
    pub raw_text: String,
}

impl JudgmentRecord {
    pub fn new(
        item_id: impl Into<String>,
        language: impl Into<String>,
        competitors: (&str, &str),
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            language: language.into(),
            competitors: (competitors.0.to_string(), competitors.1.to_string()),
            raw_text: raw_text.into(),
        }
    }
}

/// Upstream ids are sometimes numeric, sometimes strings
pub(crate) fn deserialize_item_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for item id, got {}",
            other
        ))),
    }
}

/// Winner/loser extracted from a single judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutcome {
    pub winner: Competitor,
    pub loser: Competitor,
    pub source_item_id: String,
}

/// Gaussian belief over a competitor's latent skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillBelief {
    pub mean: f64,
    pub std_dev: f64,
}

impl SkillBelief {
    /// Conservative skill estimate (mean minus three standard deviations)
    pub fn conservative(&self) -> f64 {
        self.mean - 3.0 * self.std_dev
    }
}

impl From<TrueSkillRating> for SkillBelief {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mean: rating.rating,
            std_dev: rating.uncertainty,
        }
    }
}

impl From<SkillBelief> for TrueSkillRating {
    fn from(belief: SkillBelief) -> Self {
        Self {
            rating: belief.mean,
            uncertainty: belief.std_dev,
        }
    }
}

/// Belief change produced by a single rating update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefChange {
    pub competitor: Competitor,
    pub before: SkillBelief,
    pub after: SkillBelief,
}

impl BeliefChange {
    pub fn mean_delta(&self) -> f64 {
        self.after.mean - self.before.mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_upstream_shape() {
        let raw = r#"{
            "id": 42,
            "language": "es",
            "combination": ["nllb", "itzuli"],
            "model_evaluation": "Chosen translation: B"
        }"#;

        let record: JudgmentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.item_id, "42");
        assert_eq!(record.language, "es");
        assert_eq!(
            record.competitors,
            ("nllb".to_string(), "itzuli".to_string())
        );
        assert_eq!(record.raw_text, "Chosen translation: B");
    }

    #[test]
    fn test_record_rejects_object_id() {
        let raw = r#"{
            "id": {"nested": 1},
            "language": "es",
            "combination": ["nllb", "itzuli"],
            "model_evaluation": "A"
        }"#;

        assert!(serde_json::from_str::<JudgmentRecord>(raw).is_err());
    }

    #[test]
    fn test_belief_trueskill_conversion() {
        let belief = SkillBelief {
            mean: 27.5,
            std_dev: 6.1,
        };
        let rating: TrueSkillRating = belief.into();
        assert_eq!(rating.rating, 27.5);
        assert_eq!(rating.uncertainty, 6.1);
        assert_eq!(SkillBelief::from(rating), belief);
    }

    #[test]
    fn test_conservative_estimate() {
        let belief = SkillBelief {
            mean: 25.0,
            std_dev: 25.0 / 3.0,
        };
        assert!(belief.conservative().abs() < 1e-9);
    }
}
