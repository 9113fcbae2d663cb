//! Inter-rater agreement configuration

use crate::agreement::MeasurementLevel;
use serde::{Deserialize, Serialize};

/// Annotation table layout and agreement metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementSettings {
    /// Rated dimensions, in the order units are flattened
    pub dimensions: Vec<String>,
    /// Columns forming the join key: corpus, item code, source language
    pub key_columns: Vec<String>,
    /// Field delimiter of the first annotator's table
    pub first_delimiter: char,
    /// Field delimiter of the second annotator's table
    pub second_delimiter: char,
    pub level: MeasurementLevel,
}

impl Default for AgreementSettings {
    fn default() -> Self {
        Self {
            dimensions: ["enes-eu", "gt", "en-eu", "latxa", "es-eu"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            key_columns: vec!["corpus".to_string(), "code".to_string(), "ita".to_string()],
            first_delimiter: ';',
            second_delimiter: ',',
            level: MeasurementLevel::Ordinal,
        }
    }
}
