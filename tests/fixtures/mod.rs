//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use pairwise_judge::types::JudgmentRecord;
use std::fs;
use std::path::{Path, PathBuf};

pub const COMPETITORS: [&str; 3] = ["nllb", "upv-cmbt", "itzuli"];

/// A judgment in the shape the upstream judge writes
pub fn verdict(id: &str, language: &str, pair: (&str, &str), symbol: &str) -> JudgmentRecord {
    JudgmentRecord::new(
        id,
        language,
        pair,
        format!(
            "Feedback:::\nEvaluation: Both keep the meaning, one reads better.\nChosen translation: {}",
            symbol
        ),
    )
}

/// Two languages, every pair judged at least once
pub fn mixed_language_judgments() -> Vec<JudgmentRecord> {
    vec![
        verdict("1", "es", ("nllb", "itzuli"), "A"),
        verdict("1", "es", ("itzuli", "upv-cmbt"), "A"),
        verdict("2", "en", ("itzuli", "nllb"), "Translation A"),
        verdict("2", "en", ("upv-cmbt", "itzuli"), "B."),
        verdict("3", "en", ("nllb", "upv-cmbt"), "**B**"),
    ]
}

/// Same judgments as `mixed_language_judgments` in upstream JSON
pub fn mixed_language_json() -> String {
    let records: Vec<serde_json::Value> = mixed_language_judgments()
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "id": r.item_id.parse::<u64>().unwrap(),
                "language": r.language,
                "combination": [r.competitors.0, r.competitors.1],
                "model_evaluation": r.raw_text,
            })
        })
        .collect();
    serde_json::to_string_pretty(&records).unwrap()
}

pub const ANNOTATION_HEADER: [&str; 8] =
    ["corpus", "code", "ita", "enes-eu", "gt", "en-eu", "latxa", "es-eu"];

/// Annotation rows: key columns followed by the five dimension ranks
pub fn annotation_rows() -> Vec<[&'static str; 8]> {
    vec![
        ["medical", "101", "es", "1", "3", "", "2", "4"],
        ["medical", "102", "es", "2", "1", "", "3", "4"],
        ["medical", "103", "en", "1", "2", "3", "4", ""],
        ["legal", "201", "es", "4", "3", "", "1", "2"],
        ["legal", "202", "en", "2", "4", "1", "3", ""],
    ]
}

/// Render rows as delimited text with a header
pub fn annotation_csv(rows: &[[&str; 8]], delimiter: char) -> String {
    let sep = delimiter.to_string();
    let mut out = ANNOTATION_HEADER.join(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(&sep));
        out.push('\n');
    }
    out
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
