//! Error types for judgment ranking and agreement computation
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Specific failure kinds are expressed as `JudgeError`
//! variants so callers can `downcast_ref` when they need to branch on them.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking and agreement scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JudgeError {
    /// A judgment could not be resolved to a winner. Recoverable per record.
    #[error("Could not parse winner for item {item_id}: {fragment:?}")]
    ParseFailure { item_id: String, fragment: String },

    #[error("Unknown competitor: {competitor}")]
    UnknownCompetitor { competitor: String },

    #[error("Annotation tables share no items (left: {left_rows} rows, right: {right_rows} rows)")]
    EmptyJoin { left_rows: usize, right_rows: usize },

    #[error("Dimension {dimension} missing from {table}")]
    MissingDimension { dimension: String, table: String },

    #[error("Agreement coefficient undefined: {reason}")]
    UndefinedStatistic { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl JudgeError {
    /// Whether the error only affects a single record
    pub fn is_recoverable(&self) -> bool {
        matches!(self, JudgeError::ParseFailure { .. })
    }

    /// Inputs or settings that do not describe one consistent run
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            JudgeError::ConfigurationError { .. }
                | JudgeError::UnknownCompetitor { .. }
                | JudgeError::EmptyJoin { .. }
                | JudgeError::MissingDimension { .. }
        )
    }
}
