//! Annotation tables and their inner join
//!
//! Two annotators rate the same items on a shared, ordered list of
//! dimensions. Rows are matched on corpus, item code and source language;
//! a key present in only one table is dropped with all of its dimensions.

use crate::agreement::alpha::ReliabilityUnit;
use crate::error::JudgeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Join key of an annotated item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub corpus: String,
    pub code: String,
    pub source_language: String,
}

impl AnnotationKey {
    pub fn new(
        corpus: impl Into<String>,
        code: impl Into<String>,
        source_language: impl Into<String>,
    ) -> Self {
        Self {
            corpus: corpus.into(),
            code: code.into(),
            source_language: source_language.into(),
        }
    }
}

/// One annotator's ratings
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTable {
    name: String,
    dimensions: Vec<String>,
    rows: BTreeMap<AnnotationKey, Vec<Option<f64>>>,
}

impl AnnotationTable {
    pub fn new(name: impl Into<String>, dimensions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dimensions,
            rows: BTreeMap::new(),
        }
    }

    /// Add a row; values follow the table's dimension order
    pub fn insert(
        &mut self,
        key: AnnotationKey,
        values: Vec<Option<f64>>,
    ) -> crate::error::Result<()> {
        if values.len() != self.dimensions.len() {
            return Err(JudgeError::InvalidInput {
                reason: format!(
                    "{}: row {:?} has {} values for {} dimensions",
                    self.name,
                    key,
                    values.len(),
                    self.dimensions.len()
                ),
            }
            .into());
        }

        if self.rows.contains_key(&key) {
            return Err(JudgeError::InvalidInput {
                reason: format!("{}: duplicate row {:?}", self.name, key),
            }
            .into());
        }

        self.rows.insert(key, values);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn get(&self, key: &AnnotationKey) -> Option<&[Option<f64>]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn dimension_index(&self, dimension: &str) -> crate::error::Result<usize> {
        self.dimensions
            .iter()
            .position(|d| d == dimension)
            .ok_or_else(|| {
                JudgeError::MissingDimension {
                    dimension: dimension.to_string(),
                    table: self.name.clone(),
                }
                .into()
            })
    }

    /// Inner join with another table over the requested dimensions
    pub fn join(
        &self,
        other: &AnnotationTable,
        dimensions: &[String],
    ) -> crate::error::Result<JoinedAnnotationSet> {
        let mut left_columns = Vec::with_capacity(dimensions.len());
        let mut right_columns = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            left_columns.push(self.dimension_index(dimension)?);
            right_columns.push(other.dimension_index(dimension)?);
        }

        let rows: Vec<JoinedRow> = self
            .rows
            .iter()
            .filter_map(|(key, left)| {
                other.rows.get(key).map(|right| JoinedRow {
                    key: key.clone(),
                    first: left_columns.iter().map(|&i| left[i]).collect(),
                    second: right_columns.iter().map(|&i| right[i]).collect(),
                })
            })
            .collect();

        if rows.is_empty() {
            return Err(JudgeError::EmptyJoin {
                left_rows: self.len(),
                right_rows: other.len(),
            }
            .into());
        }

        Ok(JoinedAnnotationSet {
            dimensions: dimensions.to_vec(),
            rows,
        })
    }
}

/// One item rated by both annotators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub key: AnnotationKey,
    pub first: Vec<Option<f64>>,
    pub second: Vec<Option<f64>>,
}

/// Items present in both tables, values in dimension order
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedAnnotationSet {
    dimensions: Vec<String>,
    rows: Vec<JoinedRow>,
}

impl JoinedAnnotationSet {
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One unit per (item, dimension), item-major
    pub fn reliability_units(&self) -> Vec<ReliabilityUnit> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.first
                    .iter()
                    .zip(&row.second)
                    .map(|(a, b)| ReliabilityUnit::pair(*a, *b))
            })
            .collect()
    }

    /// Units of a single dimension
    pub fn units_for_dimension(&self, dimension: &str) -> Option<Vec<ReliabilityUnit>> {
        let index = self.dimensions.iter().position(|d| d == dimension)?;
        Some(
            self.rows
                .iter()
                .map(|row| ReliabilityUnit::pair(row.first[index], row.second[index]))
                .collect(),
        )
    }
}
