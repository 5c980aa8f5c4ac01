//! Application error types

use folio_animation::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while driving the portfolio pages
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration text could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A page timeline could not be scheduled
    #[error("Scheduling failed: {0}")]
    Schedule(#[from] ConfigurationError),

    /// An operation needed a mounted page
    #[error("No page is mounted")]
    NotMounted,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, AppError>;
