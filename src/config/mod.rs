//! Configuration management for pairwise-judge
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod agreement;
pub mod app;
pub mod parsing;
pub mod rating;

// Re-export commonly used types
pub use agreement::AgreementSettings;
pub use app::{
    split_list, validate_config, AppConfig, PairingSettings, RankingSettings, ServiceSettings,
};
pub use parsing::ParserSettings;
pub use rating::RatingSettings;
