//! Ranking aggregation over parsed judgments
//!
//! Each group is ranked independently with its own fresh rater, processing
//! records in input order. The overall ranking averages per-group scores for
//! each competitor over the groups it appears in; it is not recomputed from
//! the pooled records.

use crate::config::{AppConfig, ParserSettings, RankingSettings, RatingSettings};
use crate::error::JudgeError;
use crate::judgment::JudgmentParser;
use crate::ranking::grouping::{partition, OVERALL_GROUP};
use crate::ranking::report::{GroupRanking, RankEntry, RankedScores, RankingReport};
use crate::rating::{ExtendedTrueSkillConfig, SkillRater, TrueSkillRater};
use crate::types::{Competitor, JudgmentRecord};
use crate::utils::{mean, round_to};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Per-competitor win counts for one group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinTally {
    counts: HashMap<Competitor, u64>,
}

impl WinTally {
    pub fn increment(&mut self, competitor: &str) {
        *self.counts.entry(competitor.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, competitor: &str) -> u64 {
        self.counts.get(competitor).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Parse bookkeeping for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub parsed: usize,
    pub failed: usize,
}

/// Parse bookkeeping for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    pub groups: BTreeMap<String, GroupStats>,
}

impl AggregationStats {
    pub fn parsed(&self) -> usize {
        self.groups.values().map(|s| s.parsed).sum()
    }

    pub fn failed(&self) -> usize {
        self.groups.values().map(|s| s.failed).sum()
    }
}

/// Builds ranking reports from judgment records
#[derive(Debug)]
pub struct RankingAggregator {
    competitors: Vec<Competitor>,
    trueskill: ExtendedTrueSkillConfig,
    parser: JudgmentParser,
    settings: RankingSettings,
}

impl RankingAggregator {
    pub fn new(
        rating: &RatingSettings,
        parsing: &ParserSettings,
        settings: &RankingSettings,
    ) -> crate::error::Result<Self> {
        rating.trueskill.validate()?;
        if rating.competitors.is_empty() {
            return Err(JudgeError::ConfigurationError {
                message: "No competitors configured".to_string(),
            }
            .into());
        }

        Ok(Self {
            competitors: rating.competitors.clone(),
            trueskill: rating.trueskill.clone(),
            parser: JudgmentParser::new(parsing)?,
            settings: settings.clone(),
        })
    }

    pub fn from_config(config: &AppConfig) -> crate::error::Result<Self> {
        Self::new(&config.rating, &config.parsing, &config.ranking)
    }

    /// Rank every group produced by `group_key`
    pub fn aggregate<F>(
        &self,
        records: &[JudgmentRecord],
        group_key: F,
    ) -> crate::error::Result<RankingReport>
    where
        F: Fn(&JudgmentRecord) -> String,
    {
        self.aggregate_with_stats(records, group_key)
            .map(|(report, _)| report)
    }

    /// Rank every group and return parse bookkeeping alongside
    pub fn aggregate_with_stats<F>(
        &self,
        records: &[JudgmentRecord],
        group_key: F,
    ) -> crate::error::Result<(RankingReport, AggregationStats)>
    where
        F: Fn(&JudgmentRecord) -> String,
    {
        let mut partitions = partition(records, group_key);

        if let Some(requested) = &self.settings.groups {
            partitions.retain(|name, _| requested.contains(name));
            for name in requested {
                if !partitions.contains_key(name) {
                    warn!(group = %name, "Requested group has no records");
                    partitions.insert(name.clone(), Vec::new());
                }
            }
        }

        let mut groups = BTreeMap::new();
        let mut stats = AggregationStats::default();
        for (name, group_records) in partitions {
            if name == OVERALL_GROUP {
                return Err(JudgeError::ConfigurationError {
                    message: format!("Group name {} is reserved", OVERALL_GROUP),
                }
                .into());
            }

            let (ranking, group_stats) = self.rank_group(&group_records)?;
            info!(
                group = %name,
                parsed = group_stats.parsed,
                failed = group_stats.failed,
                leader = ranking
                    .skill_score
                    .leader()
                    .map(|e| e.competitor.as_str())
                    .unwrap_or("-"),
                "Ranked group"
            );

            stats.groups.insert(name.clone(), group_stats);
            groups.insert(name, ranking);
        }

        let overall = self.average_groups(&groups);
        Ok((RankingReport { overall, groups }, stats))
    }

    /// Rank one group's records in order with a fresh rater
    pub fn rank_group(
        &self,
        records: &[&JudgmentRecord],
    ) -> crate::error::Result<(GroupRanking, GroupStats)> {
        let mut rater = TrueSkillRater::new(self.trueskill.clone(), &self.competitors)?;
        let mut tally = WinTally::default();
        let mut stats = GroupStats::default();

        for record in records {
            for competitor in [&record.competitors.0, &record.competitors.1] {
                if !self.competitors.contains(competitor) {
                    return Err(JudgeError::UnknownCompetitor {
                        competitor: competitor.clone(),
                    }
                    .into());
                }
            }

            match self.parser.parse(record) {
                Ok(outcome) => {
                    rater.update(&outcome.winner, &outcome.loser)?;
                    tally.increment(&outcome.winner);
                    stats.parsed += 1;
                }
                Err(JudgeError::ParseFailure { item_id, fragment }) => {
                    warn!(
                        item_id = %item_id,
                        fragment = %fragment,
                        "Could not parse winner, record skipped"
                    );
                    stats.failed += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok((self.group_views(&rater, &tally), stats))
    }

    fn group_views(&self, rater: &TrueSkillRater, tally: &WinTally) -> GroupRanking {
        let include_absent = self.settings.include_absent_competitors;
        let precision = self.settings.report_precision;

        let winner_count = self
            .competitors
            .iter()
            .filter(|c| include_absent || tally.count(c) > 0)
            .map(|c| RankEntry::new(c.clone(), tally.count(c) as f64))
            .collect();

        let skill_score = rater
            .entries()
            .iter()
            .filter(|e| include_absent || e.participated())
            .map(|e| RankEntry::new(e.competitor.clone(), round_to(e.belief.mean, precision)))
            .collect();

        GroupRanking {
            winner_count: RankedScores::from_unsorted(winner_count),
            skill_score: RankedScores::from_unsorted(skill_score),
        }
    }

    fn average_groups(&self, groups: &BTreeMap<String, GroupRanking>) -> GroupRanking {
        let wins: Vec<&RankedScores> = groups.values().map(|g| &g.winner_count).collect();
        let skills: Vec<&RankedScores> = groups.values().map(|g| &g.skill_score).collect();

        GroupRanking {
            winner_count: self.average_scores(&wins),
            skill_score: self.average_scores(&skills),
        }
    }

    /// Mean score per competitor over the views it appears in
    fn average_scores(&self, views: &[&RankedScores]) -> RankedScores {
        let precision = self.settings.report_precision;
        let entries = self
            .competitors
            .iter()
            .filter_map(|competitor| {
                let scores: Vec<f64> = views.iter().filter_map(|v| v.get(competitor)).collect();
                mean(&scores).map(|m| RankEntry::new(competitor.clone(), round_to(m, precision)))
            })
            .collect();

        RankedScores::from_unsorted(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::GroupBy;

    fn aggregator() -> RankingAggregator {
        RankingAggregator::from_config(&AppConfig::default()).unwrap()
    }

    fn verdict(id: &str, lang: &str, pair: (&str, &str), symbol: &str) -> JudgmentRecord {
        JudgmentRecord::new(
            id,
            lang,
            pair,
            format!("Evaluation: ...\nChosen translation: {}", symbol),
        )
    }

    #[test]
    fn test_two_to_one_series() {
        let records = vec![
            verdict("1", "es", ("nllb", "itzuli"), "A"),
            verdict("2", "es", ("nllb", "itzuli"), "B"),
            verdict("3", "es", ("nllb", "itzuli"), "A"),
        ];

        let report = aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();
        let es = report.group("es").unwrap();

        assert_eq!(es.winner_count.get("nllb"), Some(2.0));
        assert_eq!(es.winner_count.get("itzuli"), Some(1.0));
        assert_eq!(es.winner_count.competitors(), vec!["nllb", "itzuli"]);
        assert_eq!(es.skill_score.competitors(), vec!["nllb", "itzuli"]);

        // upv-cmbt never played
        assert_eq!(es.skill_score.get("upv-cmbt"), None);
        assert_eq!(es.winner_count.get("upv-cmbt"), None);
    }

    #[test]
    fn test_loser_without_wins_absent_from_win_view() {
        let records = vec![verdict("1", "es", ("nllb", "itzuli"), "A")];
        let report = aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();
        let es = report.group("es").unwrap();

        assert_eq!(es.winner_count.competitors(), vec!["nllb"]);
        assert_eq!(es.skill_score.competitors(), vec!["nllb", "itzuli"]);
    }

    #[test]
    fn test_include_absent_competitors() {
        let mut config = AppConfig::default();
        config.ranking.include_absent_competitors = true;
        let aggregator = RankingAggregator::from_config(&config).unwrap();

        let records = vec![verdict("1", "es", ("nllb", "itzuli"), "A")];
        let report = aggregator
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();
        let es = report.group("es").unwrap();

        assert_eq!(es.winner_count.len(), 3);
        assert_eq!(es.winner_count.get("upv-cmbt"), Some(0.0));
        assert_eq!(es.skill_score.get("upv-cmbt"), Some(25.0));
    }

    #[test]
    fn test_parse_failures_are_skipped() {
        let records = vec![
            verdict("1", "es", ("nllb", "itzuli"), "A"),
            verdict("2", "es", ("nllb", "itzuli"), "neither"),
            verdict("3", "es", ("upv-cmbt", "itzuli"), "B"),
        ];

        let (report, stats) = aggregator()
            .aggregate_with_stats(&records, |r| GroupBy::Language.key(r))
            .unwrap();

        assert_eq!(stats.parsed(), 2);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.groups["es"], GroupStats { parsed: 2, failed: 1 });
        assert_eq!(report.group("es").unwrap().winner_count.get("nllb"), Some(1.0));
        assert_eq!(report.group("es").unwrap().winner_count.get("itzuli"), Some(1.0));
    }

    #[test]
    fn test_unknown_competitor_is_fatal() {
        let records = vec![verdict("1", "es", ("nllb", "deepl"), "A")];
        let err = aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<JudgeError>(),
            Some(&JudgeError::UnknownCompetitor {
                competitor: "deepl".to_string()
            })
        );
    }

    #[test]
    fn test_groups_do_not_share_state() {
        let records = vec![
            verdict("1", "es", ("nllb", "itzuli"), "A"),
            verdict("2", "es", ("nllb", "itzuli"), "A"),
            verdict("1", "en", ("nllb", "itzuli"), "A"),
        ];

        let report = aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();

        let single = aggregator()
            .aggregate(&records[2..], |r| GroupBy::Language.key(r))
            .unwrap();

        assert_eq!(report.group("en"), single.group("en"));
    }

    #[test]
    fn test_overall_averages_groups() {
        let records = vec![
            // es: nllb 2 wins, itzuli 0
            verdict("1", "es", ("nllb", "itzuli"), "A"),
            verdict("2", "es", ("itzuli", "nllb"), "B"),
            // en: nllb 1, itzuli 2
            verdict("1", "en", ("nllb", "itzuli"), "A"),
            verdict("2", "en", ("nllb", "itzuli"), "B"),
            verdict("3", "en", ("nllb", "itzuli"), "B"),
            // eu: only upv-cmbt and itzuli, upv-cmbt wins once
            verdict("1", "eu", ("upv-cmbt", "itzuli"), "A"),
        ];

        let report = aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();

        // nllb appears in es (2) and en (1)
        assert_eq!(report.overall.winner_count.get("nllb"), Some(1.5));
        // itzuli wins only in en; absent elsewhere rather than zero
        assert_eq!(report.overall.winner_count.get("itzuli"), Some(2.0));
        assert_eq!(report.overall.winner_count.get("upv-cmbt"), Some(1.0));
        assert_eq!(
            report.overall.winner_count.competitors(),
            vec!["itzuli", "nllb", "upv-cmbt"]
        );

        // Skill means average the rounded per-group means
        let per_group: Vec<f64> = ["en", "es", "eu"]
            .iter()
            .map(|g| report.group(g).unwrap().skill_score.get("itzuli").unwrap())
            .collect();
        let expected = round_to(per_group.iter().sum::<f64>() / 3.0, 2);
        assert_eq!(report.overall.skill_score.get("itzuli"), Some(expected));
    }

    #[test]
    fn test_requested_groups_filter() {
        let mut config = AppConfig::default();
        config.ranking.groups = Some(vec!["es".to_string(), "fr".to_string()]);
        let aggregator = RankingAggregator::from_config(&config).unwrap();

        let records = vec![
            verdict("1", "es", ("nllb", "itzuli"), "A"),
            verdict("2", "en", ("nllb", "itzuli"), "B"),
        ];
        let report = aggregator
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .unwrap();

        assert_eq!(report.group_names(), vec!["es", "fr"]);
        assert!(report.group("fr").unwrap().winner_count.is_empty());
        assert_eq!(report.overall.winner_count.competitors(), vec!["nllb"]);
    }

    #[test]
    fn test_reserved_group_name() {
        let records = vec![verdict("1", "Overall", ("nllb", "itzuli"), "A")];
        assert!(aggregator()
            .aggregate(&records, |r| GroupBy::Language.key(r))
            .is_err());
    }

    #[test]
    fn test_win_tally() {
        let mut tally = WinTally::default();
        tally.increment("nllb");
        tally.increment("nllb");
        tally.increment("itzuli");
        assert_eq!(tally.count("nllb"), 2);
        assert_eq!(tally.count("upv-cmbt"), 0);
        assert_eq!(tally.total(), 3);
    }
}
