//! Main application configuration
//!
//! This module defines the primary configuration structures for
//! pairwise-judge, including environment variable loading, TOML file loading
//! and validation.

use crate::agreement::MeasurementLevel;
use crate::config::{AgreementSettings, ParserSettings, RatingSettings};
use crate::judgment::DecisionSymbols;
use crate::ranking::GroupBy;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub parsing: ParserSettings,
    pub ranking: RankingSettings,
    pub agreement: AgreementSettings,
    pub pairing: PairingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Ranking report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    /// How records are split into groups
    pub group_by: GroupBy,
    /// Only these groups are ranked when set
    pub groups: Option<Vec<String>>,
    /// Decimal places kept for reported scores
    pub report_precision: u32,
    /// Report competitors that never won or never played in a group
    pub include_absent_competitors: bool,
}

/// Pair scheduling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingSettings {
    /// Seed for the translation shuffle
    pub seed: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "pairwise-judge".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Language,
            groups: None,
            report_precision: 2,
            include_absent_competitors: false,
        }
    }
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(competitors) = env::var("COMPETITORS") {
            self.rating.competitors = split_list(&competitors);
        }
        if let Ok(draw) = env::var("DRAW_PROBABILITY") {
            self.rating.trueskill.draw_probability = draw
                .parse()
                .map_err(|_| anyhow!("Invalid DRAW_PROBABILITY value: {}", draw))?;
        }
        if let Ok(floor) = env::var("MIN_STD_DEV") {
            self.rating.trueskill.min_std_dev = floor
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_STD_DEV value: {}", floor))?;
        }

        // Parser settings
        if let Ok(marker) = env::var("DECISION_MARKER") {
            self.parsing.marker = marker;
        }

        // Ranking settings
        if let Ok(precision) = env::var("REPORT_PRECISION") {
            self.ranking.report_precision = precision
                .parse()
                .map_err(|_| anyhow!("Invalid REPORT_PRECISION value: {}", precision))?;
        }
        if let Ok(groups) = env::var("RANKING_GROUPS") {
            self.ranking.groups = Some(split_list(&groups));
        }
        if let Ok(include) = env::var("INCLUDE_ABSENT_COMPETITORS") {
            self.ranking.include_absent_competitors = include
                .parse()
                .map_err(|_| anyhow!("Invalid INCLUDE_ABSENT_COMPETITORS value: {}", include))?;
        }

        // Agreement settings
        if let Ok(dimensions) = env::var("ANNOTATION_DIMENSIONS") {
            self.agreement.dimensions = split_list(&dimensions);
        }
        if let Ok(level) = env::var("MEASUREMENT_LEVEL") {
            self.agreement.level = level
                .parse::<MeasurementLevel>()
                .map_err(|_| anyhow!("Invalid MEASUREMENT_LEVEL value: {}", level))?;
        }

        // Pairing settings
        if let Ok(seed) = env::var("PAIRING_SEED") {
            self.pairing.seed = seed
                .parse()
                .map_err(|_| anyhow!("Invalid PAIRING_SEED value: {}", seed))?;
        }

        Ok(())
    }
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate rating settings
    if config.rating.competitors.len() < 2 {
        return Err(anyhow!("At least two competitors are required"));
    }
    let mut seen = std::collections::HashSet::new();
    for competitor in &config.rating.competitors {
        if !seen.insert(competitor) {
            return Err(anyhow!("Duplicate competitor: {}", competitor));
        }
    }
    config.rating.trueskill.validate()?;

    // Validate parser settings
    if DecisionSymbols::new(config.parsing.symbol_a, config.parsing.symbol_b).is_none() {
        return Err(anyhow!(
            "Decision symbols must be two distinct alphanumeric characters"
        ));
    }

    // Validate ranking settings
    if config.ranking.report_precision > 10 {
        return Err(anyhow!("Report precision must be at most 10 decimal places"));
    }
    if let Some(groups) = &config.ranking.groups {
        if groups.is_empty() {
            return Err(anyhow!("Requested group list cannot be empty"));
        }
    }

    // Validate agreement settings
    if config.agreement.dimensions.is_empty() {
        return Err(anyhow!("At least one annotation dimension is required"));
    }
    if config.agreement.key_columns.len() != 3 {
        return Err(anyhow!(
            "Exactly three join key columns are required (corpus, item code, source language)"
        ));
    }

    Ok(())
}
