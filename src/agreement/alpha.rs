//! Krippendorff's alpha
//!
//! Alpha is computed from the coincidence matrix of pairable values:
//! `alpha = 1 - (n - 1) * sum(o_ck * d_ck) / sum(n_c * n_k * d_ck)`.
//! The ordinal metric uses the marginals `n_g` of the categories lying
//! between two values, so distances depend on how the scale is populated
//! rather than on the numeric codes themselves.

use crate::error::JudgeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Level of measurement of the rated values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementLevel {
    Nominal,
    Ordinal,
    Interval,
}

impl FromStr for MeasurementLevel {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nominal" => Ok(MeasurementLevel::Nominal),
            "ordinal" => Ok(MeasurementLevel::Ordinal),
            "interval" => Ok(MeasurementLevel::Interval),
            other => Err(JudgeError::ConfigurationError {
                message: format!("Unknown measurement level: {}", other),
            }),
        }
    }
}

impl std::fmt::Display for MeasurementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementLevel::Nominal => write!(f, "nominal"),
            MeasurementLevel::Ordinal => write!(f, "ordinal"),
            MeasurementLevel::Interval => write!(f, "interval"),
        }
    }
}

/// Values given to one (item, dimension) by each rater; `None` is missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityUnit {
    pub values: Vec<Option<f64>>,
}

impl ReliabilityUnit {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// Unit rated by two raters
    pub fn pair(first: Option<f64>, second: Option<f64>) -> Self {
        Self {
            values: vec![first, second],
        }
    }

    fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied().filter(|v| v.is_finite())
    }

    /// A unit contributes only when at least two values are present
    pub fn is_pairable(&self) -> bool {
        self.present().count() >= 2
    }
}

/// Alpha with the quantities it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaSummary {
    pub alpha: f64,
    pub level: MeasurementLevel,
    /// Units with at least two values
    pub pairable_units: usize,
    /// Total values in pairable units
    pub pairable_values: usize,
    pub observed_disagreement: f64,
    pub expected_disagreement: f64,
}

/// Chance-corrected agreement for any number of raters
#[derive(Debug, Clone)]
pub struct AgreementCalculator {
    level: MeasurementLevel,
    value_domain: Option<Vec<f64>>,
}

impl AgreementCalculator {
    pub fn new(level: MeasurementLevel) -> Self {
        Self {
            level,
            value_domain: None,
        }
    }

    /// Use an explicit ordered scale instead of the observed values
    pub fn with_value_domain(mut self, domain: Vec<f64>) -> crate::error::Result<Self> {
        let mut sorted = domain.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        if sorted.len() != domain.len() || domain.iter().any(|v| !v.is_finite()) {
            return Err(JudgeError::ConfigurationError {
                message: "Value domain must contain distinct finite values".to_string(),
            }
            .into());
        }
        if sorted != domain {
            return Err(JudgeError::ConfigurationError {
                message: "Value domain must be in ascending order".to_string(),
            }
            .into());
        }

        self.value_domain = Some(domain);
        Ok(self)
    }

    pub fn level(&self) -> MeasurementLevel {
        self.level
    }

    /// Alpha over all units
    pub fn compute_alpha(&self, units: &[ReliabilityUnit]) -> crate::error::Result<f64> {
        self.compute(units).map(|summary| summary.alpha)
    }

    /// Alpha plus observed/expected disagreement
    pub fn compute(&self, units: &[ReliabilityUnit]) -> crate::error::Result<AlphaSummary> {
        let pairable: Vec<Vec<f64>> = units
            .iter()
            .filter(|u| u.is_pairable())
            .map(|u| u.present().collect())
            .collect();

        if pairable.len() < 2 {
            return Err(undefined(format!(
                "need at least 2 units rated by two or more raters, found {}",
                pairable.len()
            )));
        }

        let domain = match &self.value_domain {
            Some(domain) => domain.clone(),
            None => {
                let mut observed: Vec<f64> = pairable.iter().flatten().copied().collect();
                observed.sort_by(f64::total_cmp);
                observed.dedup();
                observed
            }
        };

        let coincidences = coincidence_matrix(&pairable, &domain)?;
        let marginals: Vec<f64> = coincidences.iter().map(|row| row.iter().sum()).collect();
        let n: f64 = marginals.iter().sum();
        let distances = self.distance_matrix(&domain, &marginals);

        let size = domain.len();
        let mut observed = 0.0;
        let mut expected = 0.0;
        for c in 0..size {
            for k in 0..size {
                observed += coincidences[c][k] * distances[c][k];
                expected += marginals[c] * marginals[k] * distances[c][k];
            }
        }

        if expected <= 0.0 {
            return Err(undefined(
                "expected disagreement is zero (all values identical)".to_string(),
            ));
        }

        let observed_disagreement = observed / n;
        let expected_disagreement = expected / (n * (n - 1.0));
        let alpha = 1.0 - observed_disagreement / expected_disagreement;

        if !alpha.is_finite() {
            return Err(undefined(format!("non-finite result {}", alpha)));
        }

        Ok(AlphaSummary {
            alpha,
            level: self.level,
            pairable_units: pairable.len(),
            pairable_values: pairable.iter().map(Vec::len).sum(),
            observed_disagreement,
            expected_disagreement,
        })
    }

    fn distance_matrix(&self, domain: &[f64], marginals: &[f64]) -> Vec<Vec<f64>> {
        let size = domain.len();
        let mut distances = vec![vec![0.0; size]; size];
        for c in 0..size {
            for k in (c + 1)..size {
                let d = match self.level {
                    MeasurementLevel::Nominal => 1.0,
                    MeasurementLevel::Ordinal => {
                        let between: f64 = marginals[c..=k].iter().sum();
                        (between - (marginals[c] + marginals[k]) / 2.0).powi(2)
                    }
                    MeasurementLevel::Interval => (domain[c] - domain[k]).powi(2),
                };
                distances[c][k] = d;
                distances[k][c] = d;
            }
        }
        distances
    }
}

impl Default for AgreementCalculator {
    fn default() -> Self {
        Self::new(MeasurementLevel::Ordinal)
    }
}

/// `o_ck = sum over units of (pairs of c and k within the unit) / (m_u - 1)`
fn coincidence_matrix(units: &[Vec<f64>], domain: &[f64]) -> crate::error::Result<Vec<Vec<f64>>> {
    let size = domain.len();
    let mut matrix = vec![vec![0.0; size]; size];

    for values in units {
        let mut counts = vec![0.0; size];
        for value in values {
            let index = domain
                .binary_search_by(|probe| probe.total_cmp(value))
                .map_err(|_| JudgeError::InvalidInput {
                    reason: format!("value {} is outside the configured scale", value),
                })?;
            counts[index] += 1.0;
        }

        let weight = 1.0 / (values.len() as f64 - 1.0);
        for c in 0..size {
            if counts[c] == 0.0 {
                continue;
            }
            for k in 0..size {
                let pairs = if c == k {
                    counts[c] * (counts[c] - 1.0)
                } else {
                    counts[c] * counts[k]
                };
                matrix[c][k] += pairs * weight;
            }
        }
    }

    Ok(matrix)
}

fn undefined(reason: String) -> anyhow::Error {
    JudgeError::UndefinedStatistic { reason }.into()
}
