//! Inter-rater agreement between two annotators
//!
//! This module joins two annotation tables on their shared items and
//! computes Krippendorff's alpha over the resulting reliability units.

pub mod alpha;
pub mod table;

// Re-export commonly used types
pub use alpha::{AgreementCalculator, AlphaSummary, MeasurementLevel, ReliabilityUnit};
pub use table::{AnnotationKey, AnnotationTable, JoinedAnnotationSet, JoinedRow};

use crate::error::JudgeError;

/// Alpha for each dimension on its own
pub fn alpha_by_dimension(
    calculator: &AgreementCalculator,
    joined: &JoinedAnnotationSet,
) -> Vec<(String, Result<f64, JudgeError>)> {
    joined
        .dimensions()
        .iter()
        .map(|dimension| {
            let units = joined.units_for_dimension(dimension).unwrap_or_default();
            let alpha = calculator.compute_alpha(&units).map_err(|e| {
                e.downcast::<JudgeError>()
                    .unwrap_or_else(|other| JudgeError::UndefinedStatistic {
                        reason: other.to_string(),
                    })
            });
            (dimension.clone(), alpha)
        })
        .collect()
}
