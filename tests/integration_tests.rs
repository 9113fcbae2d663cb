//! Integration tests for pairwise-judge
//!
//! These tests drive the library end to end:
//! - Judge output files to ranking reports on disk
//! - Annotation tables with different delimiters to Krippendorff's alpha
//! - Seeded pair schedules feeding back into the aggregator
//! - Configuration files shaping a run

mod fixtures;

use pairwise_judge::agreement::{AgreementCalculator, MeasurementLevel};
use pairwise_judge::config::AppConfig;
use pairwise_judge::error::JudgeError;
use pairwise_judge::io;
use pairwise_judge::pairing::{PairScheduler, SourceItem};
use pairwise_judge::ranking::{GroupBy, RankingAggregator};
use pairwise_judge::types::JudgmentRecord;
use pairwise_judge::utils::approx_eq;
use std::fs;
use tempfile::TempDir;

use fixtures::{
    annotation_csv, annotation_rows, mixed_language_judgments, mixed_language_json, verdict,
    write_file, COMPETITORS,
};

fn by_language(record: &JudgmentRecord) -> String {
    GroupBy::Language.key(record)
}

fn default_aggregator() -> RankingAggregator {
    RankingAggregator::from_config(&AppConfig::default()).unwrap()
}

#[test]
fn test_repeated_runs_are_identical() {
    let records = mixed_language_judgments();
    let aggregator = default_aggregator();

    let first = aggregator.aggregate(&records, by_language).unwrap();
    let second = aggregator.aggregate(&records, by_language).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_two_wins_to_one() {
    let records = vec![
        verdict("1", "es", ("nllb", "upv-cmbt"), "A"),
        verdict("2", "es", ("nllb", "upv-cmbt"), "B"),
        verdict("3", "es", ("nllb", "upv-cmbt"), "A"),
    ];

    let report = default_aggregator().aggregate(&records, by_language).unwrap();
    let es = report.group("es").unwrap();

    assert_eq!(es.winner_count.get("nllb"), Some(2.0));
    assert_eq!(es.winner_count.get("upv-cmbt"), Some(1.0));
    assert_eq!(es.skill_score.competitors(), vec!["nllb", "upv-cmbt"]);

    let nllb = es.skill_score.get("nllb").unwrap();
    let upv = es.skill_score.get("upv-cmbt").unwrap();
    assert!(nllb > 25.0 && upv < 25.0);
    // reported with two decimals
    assert!(((nllb * 100.0).round() - nllb * 100.0).abs() < 1e-6);

    // a single group averages to itself
    assert_eq!(report.overall, *es);
}

#[test]
fn test_overall_averages_groups() {
    let report = default_aggregator()
        .aggregate(&mixed_language_judgments(), by_language)
        .unwrap();

    assert_eq!(report.group_names(), vec!["en", "es"]);

    let es = report.group("es").unwrap();
    let en = report.group("en").unwrap();
    assert_eq!(es.winner_count.get("nllb"), Some(1.0));
    assert_eq!(es.winner_count.get("itzuli"), Some(1.0));
    assert_eq!(en.winner_count.get("itzuli"), Some(2.0));
    assert_eq!(en.winner_count.get("upv-cmbt"), Some(1.0));
    assert_eq!(en.winner_count.get("nllb"), None);

    let overall = &report.overall;
    assert_eq!(overall.winner_count.competitors(), vec!["itzuli", "nllb", "upv-cmbt"]);
    assert_eq!(overall.winner_count.get("itzuli"), Some(1.5));
    assert_eq!(overall.winner_count.get("nllb"), Some(1.0));

    for competitor in COMPETITORS {
        let expected = (es.skill_score.get(competitor).unwrap()
            + en.skill_score.get(competitor).unwrap())
            / 2.0;
        let actual = overall.skill_score.get(competitor).unwrap();
        assert!(
            approx_eq(actual, expected, 0.005 + 1e-9),
            "{}: {} vs {}",
            competitor,
            actual,
            expected
        );
    }
    assert_eq!(overall.skill_score.leader().unwrap().competitor, "itzuli");
}

#[test]
fn test_rank_file_to_report() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "outputs/latxa.json", &mixed_language_json());

    let records = io::load_judgments(&input).unwrap();
    assert_eq!(records, mixed_language_judgments());

    let report = default_aggregator().aggregate(&records, by_language).unwrap();
    let output = io::default_report_path(&input);
    assert_eq!(output, dir.path().join("ranking").join("latxa_ranking.json"));
    io::write_report(&output, &report).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let overall_at = written.find("\"Overall\"").unwrap();
    let en_at = written.find("\"en\"").unwrap();
    let es_at = written.find("\"es\"").unwrap();
    assert!(overall_at < en_at && en_at < es_at);

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["Overall"]["winner_count"]["itzuli"], 1.5);
    assert!(value["es"]["skill_score"]["nllb"].is_number());
    assert!(value["en"]["winner_count"].get("nllb").is_none());
}

#[test]
fn test_unknown_competitor_aborts_run() {
    let mut records = mixed_language_judgments();
    records.push(verdict("9", "es", ("nllb", "deepl"), "B"));

    let err = default_aggregator().aggregate(&records, by_language).unwrap_err();
    assert_eq!(
        err.downcast_ref::<JudgeError>(),
        Some(&JudgeError::UnknownCompetitor {
            competitor: "deepl".to_string()
        })
    );
}

#[test]
fn test_alpha_identical_annotators_across_delimiters() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default().agreement;
    let rows = annotation_rows();
    let first = write_file(dir.path(), "a1.csv", &annotation_csv(&rows, ';'));
    let second = write_file(dir.path(), "a2.csv", &annotation_csv(&rows, ','));

    let first = io::load_annotation_table(&first, ';', &config.key_columns, &config.dimensions)
        .unwrap();
    let second = io::load_annotation_table(&second, ',', &config.key_columns, &config.dimensions)
        .unwrap();
    let joined = first.join(&second, &config.dimensions).unwrap();
    assert_eq!(joined.len(), 5);

    let summary = AgreementCalculator::new(MeasurementLevel::Ordinal)
        .compute(&joined.reliability_units())
        .unwrap();
    assert!((summary.alpha - 1.0).abs() < 1e-12);
    // blank cells drop out of their units
    assert_eq!(summary.pairable_units, 25 - 5);
}

#[test]
fn test_alpha_disagreement_and_merged_export() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default().agreement;
    let rows = annotation_rows();
    let mut disagreeing = rows.clone();
    disagreeing[0] = ["medical", "101", "es", "4", "2", "", "1", "3"];
    disagreeing[3] = ["legal", "201", "es", "1", "2", "", "4", "3"];
    // only annotated by the second annotator
    disagreeing.push(["legal", "203", "es", "1", "2", "", "3", "4"]);

    let first = write_file(dir.path(), "a1.csv", &annotation_csv(&rows, ';'));
    let second = write_file(dir.path(), "a2.csv", &annotation_csv(&disagreeing, ','));
    let first = io::load_annotation_table(&first, ';', &config.key_columns, &config.dimensions)
        .unwrap();
    let second = io::load_annotation_table(&second, ',', &config.key_columns, &config.dimensions)
        .unwrap();

    let joined = first.join(&second, &config.dimensions).unwrap();
    assert_eq!(joined.len(), 5);

    let alpha = AgreementCalculator::default()
        .compute_alpha(&joined.reliability_units())
        .unwrap();
    assert!(alpha < 1.0);

    let merged = dir.path().join("merged.csv");
    io::write_joined_csv(&merged, &joined, &config.key_columns, ';').unwrap();
    let written = fs::read_to_string(&merged).unwrap();
    assert_eq!(written.lines().count(), 6);
    assert!(written.starts_with("corpus;code;ita;enes-eu_a1;"));
}

#[test]
fn test_alpha_without_common_items() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default().agreement;
    let rows = annotation_rows();
    let others: Vec<[&str; 8]> = rows
        .iter()
        .map(|r| {
            let mut r = *r;
            r[0] = "news";
            r
        })
        .collect();

    let first = write_file(dir.path(), "a1.csv", &annotation_csv(&rows, ';'));
    let second = write_file(dir.path(), "a2.csv", &annotation_csv(&others, ','));
    let first = io::load_annotation_table(&first, ';', &config.key_columns, &config.dimensions)
        .unwrap();
    let second = io::load_annotation_table(&second, ',', &config.key_columns, &config.dimensions)
        .unwrap();

    let err = first.join(&second, &config.dimensions).unwrap_err();
    assert_eq!(
        err.downcast_ref::<JudgeError>(),
        Some(&JudgeError::EmptyJoin {
            left_rows: 5,
            right_rows: 5
        })
    );
    assert!(err
        .downcast_ref::<JudgeError>()
        .is_some_and(JudgeError::is_configuration_error));
}

#[test]
fn test_schedule_feeds_aggregator() {
    let items: Vec<SourceItem> = serde_json::from_value(serde_json::json!([
        {
            "id": 1, "language": "es", "og_text": "Hola",
            "nllb": "Kaixo", "upv-cmbt": "Kaixo!", "itzuli": "Aupa"
        },
        {
            "id": 2, "language": "en", "og_text": "Hi",
            "nllb": "Kaixo", "upv-cmbt": "", "itzuli": "Aupa"
        },
    ]))
    .unwrap();

    let config = AppConfig::default();
    let requests = PairScheduler::new(config.pairing.seed, config.rating.competitors.clone())
        .schedule(&items);
    assert_eq!(requests.len(), 3 + 1);

    // a judge that always prefers the first translation shown
    let records: Vec<JudgmentRecord> = requests
        .iter()
        .map(|r| {
            verdict(
                &r.id,
                &r.language,
                (r.combination.0.as_str(), r.combination.1.as_str()),
                "A",
            )
        })
        .collect();

    let (report, stats) = RankingAggregator::from_config(&config)
        .unwrap()
        .aggregate_with_stats(&records, by_language)
        .unwrap();
    assert_eq!(stats.parsed(), 4);
    assert_eq!(stats.failed(), 0);

    let es_wins: f64 = report
        .group("es")
        .unwrap()
        .winner_count
        .entries()
        .iter()
        .map(|e| e.score)
        .sum();
    assert_eq!(es_wins, 3.0);
    assert_eq!(report.group("en").unwrap().skill_score.len(), 2);
}

#[test]
fn test_config_file_shapes_run() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "judge.toml",
        r#"
[rating]
competitors = ["nllb", "itzuli"]

[rating.trueskill]
draw_probability = 0.1

[ranking]
group_by = "all"
report_precision = 1
"#,
    );

    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(config.ranking.group_by, GroupBy::All);
    assert_eq!(config.rating.trueskill.initial_mean, 25.0);

    let records = vec![
        verdict("1", "es", ("nllb", "itzuli"), "B"),
        verdict("2", "en", ("itzuli", "nllb"), "A"),
    ];
    let group_by = config.ranking.group_by;
    let report = RankingAggregator::from_config(&config)
        .unwrap()
        .aggregate(&records, |r| group_by.key(r))
        .unwrap();

    assert_eq!(report.group_names(), vec!["all"]);
    let all = report.group("all").unwrap();
    assert_eq!(all.winner_count.get("itzuli"), Some(2.0));
    let score = all.skill_score.get("itzuli").unwrap();
    assert!(((score * 10.0).round() - score * 10.0).abs() < 1e-6);
}
