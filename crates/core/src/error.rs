//! Error types for create-creator.
//!
//! This module defines a unified error enum covering every way a scaffold
//! run can fail: configuration, prompting, validation, filesystem writes,
//! template rendering and external commands.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for create-creator.
///
/// All fallible functions return `Result<T, AppError>`.
/// Apart from validation (handled by re-prompting), every variant aborts the run.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration and plan definition errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value was rejected by a question's validator
    #[error("Validation error: {0}")]
    Validation(String),

    /// Terminal I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reading or writing a file during materialization
    #[error("File error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External command errors (not found, spawn failure, non-zero exit)
    #[error("Command error: {0}")]
    Command(String),

    /// Template parse or render errors
    #[error("Template error: {0}")]
    Template(String),

    /// Prompt errors (input closed mid-question)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
