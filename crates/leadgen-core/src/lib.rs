//! Shared types and configuration for the lead-generation pipeline.

pub mod app_config;
pub mod business;
pub mod config;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use business::BusinessRecord;
pub use config::{load_app_config, load_app_config_from_env};
pub use query::SearchQuery;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{field} must not be empty")]
    EmptyQueryField { field: &'static str },

    #[error("{field} is too long ({len} chars, max {max})")]
    QueryFieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
