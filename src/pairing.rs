//! Comparison scheduling for source items
//!
//! Every item's non-empty translations are shuffled with a seeded RNG and
//! every unordered pair is emitted once, in shuffled order. The same seed
//! and input always give the same schedule.

use crate::types::{deserialize_item_id, Competitor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One source text with the candidate translations keyed by competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    #[serde(deserialize_with = "deserialize_item_id")]
    pub id: String,
    pub language: String,
    #[serde(alias = "og_text")]
    pub source_text: String,
    /// Remaining fields; competitor translations live here
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl SourceItem {
    /// Non-empty translations, in the order of `competitors`
    pub fn translations<'a>(&'a self, competitors: &'a [Competitor]) -> Vec<(&'a str, &'a str)> {
        competitors
            .iter()
            .filter_map(|competitor| {
                self.fields
                    .get(competitor)
                    .and_then(serde_json::Value::as_str)
                    .filter(|text| !text.is_empty())
                    .map(|text| (competitor.as_str(), text))
            })
            .collect()
    }
}

/// A pair of translations to put in front of the judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub id: String,
    pub language: String,
    /// `.0` is shown as translation A, `.1` as translation B
    pub combination: (Competitor, Competitor),
    pub source_text: String,
    pub translation_a: String,
    pub translation_b: String,
}

/// Builds seeded, reproducible comparison schedules
#[derive(Debug, Clone)]
pub struct PairScheduler {
    seed: u64,
    competitors: Vec<Competitor>,
}

impl PairScheduler {
    pub fn new(seed: u64, competitors: Vec<Competitor>) -> Self {
        Self { seed, competitors }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// All comparisons for the dataset; one RNG stream spans every item
    pub fn schedule(&self, items: &[SourceItem]) -> Vec<ComparisonRequest> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut requests = Vec::new();

        for item in items {
            let mut translations = item.translations(&self.competitors);
            if translations.len() < 2 {
                debug!(
                    item = %item.id,
                    available = translations.len(),
                    "Not enough translations to pair"
                );
            }
            translations.shuffle(&mut rng);

            for (i, (name_a, text_a)) in translations.iter().enumerate() {
                for (name_b, text_b) in &translations[i + 1..] {
                    requests.push(ComparisonRequest {
                        id: item.id.clone(),
                        language: item.language.clone(),
                        combination: (name_a.to_string(), name_b.to_string()),
                        source_text: item.source_text.clone(),
                        translation_a: text_a.to_string(),
                        translation_b: text_b.to_string(),
                    });
                }
            }
        }

        info!(
            items = items.len(),
            comparisons = requests.len(),
            seed = self.seed,
            "Built comparison schedule"
        );
        requests
    }
}
