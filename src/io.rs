//! File input and output
//!
//! Judgments and source datasets are JSON arrays; annotation tables are
//! delimited text with a header row. Reports are written as pretty JSON.

use crate::agreement::{AnnotationKey, AnnotationTable, JoinedAnnotationSet};
use crate::error::{JudgeError, Result};
use crate::pairing::SourceItem;
use crate::ranking::RankingReport;
use crate::types::JudgmentRecord;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cells treated as a missing rating
const MISSING_MARKERS: [&str; 4] = ["", "nan", "na", "null"];

fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the judge's output records
pub fn load_judgments(path: &Path) -> Result<Vec<JudgmentRecord>> {
    let records: Vec<JudgmentRecord> = load_json_array(path)?;
    info!(path = %path.display(), records = records.len(), "Loaded judgments");
    Ok(records)
}

/// Load source items for pair scheduling
pub fn load_source_items(path: &Path) -> Result<Vec<SourceItem>> {
    let items: Vec<SourceItem> = load_json_array(path)?;
    info!(path = %path.display(), items = items.len(), "Loaded source items");
    Ok(items)
}

/// Write any serializable value as pretty JSON, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_report(path: &Path, report: &RankingReport) -> Result<()> {
    write_json(path, report)?;
    info!(path = %path.display(), groups = report.groups.len(), "Ranking saved");
    Ok(())
}

/// `<dir>/outputs/run.json` ranks into `<dir>/ranking/run_ranking.json`
pub fn default_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "judgments".to_string());
    input
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""))
        .join("ranking")
        .join(format!("{}_ranking.json", stem))
}

pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            JudgeError::ConfigurationError {
                message: format!("Delimiter must be a single ASCII character, got {:?}", delimiter),
            }
            .into()
        })
}

fn parse_cell(cell: &str, column: &str, row: usize, table: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if MISSING_MARKERS.contains(&cell.to_lowercase().as_str()) {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        JudgeError::InvalidInput {
            reason: format!(
                "{}: row {} column '{}' is not a number: {:?}",
                table, row, column, cell
            ),
        }
        .into()
    })
}

/// Load one annotator's table
///
/// `key_columns` names the corpus, item code and source language columns,
/// in that order. Only `dimensions` are read from the remaining columns.
pub fn load_annotation_table(
    path: &Path,
    delimiter: char,
    key_columns: &[String],
    dimensions: &[String],
) -> Result<AnnotationTable> {
    let table_name = path.display().to_string();
    if key_columns.len() != 3 {
        return Err(JudgeError::ConfigurationError {
            message: format!("Expected 3 key columns, got {}", key_columns.len()),
        }
        .into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter_byte(delimiter)?)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", table_name))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", table_name))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut key_index = Vec::with_capacity(3);
    for name in key_columns {
        let index = column(name).ok_or_else(|| JudgeError::InvalidInput {
            reason: format!("{}: missing key column '{}'", table_name, name),
        })?;
        key_index.push(index);
    }

    let mut dimension_index = Vec::with_capacity(dimensions.len());
    for name in dimensions {
        let index = column(name).ok_or_else(|| JudgeError::MissingDimension {
            dimension: name.clone(),
            table: table_name.clone(),
        })?;
        dimension_index.push(index);
    }

    let mut table = AnnotationTable::new(table_name.clone(), dimensions.to_vec());
    for (idx, result) in reader.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = result.with_context(|| format!("{}: malformed row {}", table_name, line))?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let key = AnnotationKey::new(field(key_index[0]), field(key_index[1]), field(key_index[2]));
        let values = dimension_index
            .iter()
            .zip(dimensions)
            .map(|(&i, name)| parse_cell(record.get(i).unwrap_or(""), name, line, &table_name))
            .collect::<Result<Vec<_>>>()?;

        table.insert(key, values)?;
    }

    debug!(table = %table_name, rows = table.len(), "Loaded annotation table");
    Ok(table)
}

/// Export the joined set with `_a1`/`_a2` suffixed rating columns
pub fn write_joined_csv(
    path: &Path,
    joined: &JoinedAnnotationSet,
    key_columns: &[String],
    delimiter: char,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header: Vec<String> = key_columns.to_vec();
    for dimension in joined.dimensions() {
        header.push(format!("{}_a1", dimension));
    }
    for dimension in joined.dimensions() {
        header.push(format!("{}_a2", dimension));
    }
    writer.write_record(&header)?;

    let cell = |v: &Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for row in joined.rows() {
        let mut record = vec![
            row.key.corpus.clone(),
            row.key.code.clone(),
            row.key.source_language.clone(),
        ];
        record.extend(row.first.iter().map(cell));
        record.extend(row.second.iter().map(cell));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = joined.len(), "Joined annotations saved");
    Ok(())
}
