//! Application error types with proper error chaining.

use thiserror::Error;

/// Failures raised while resolving configuration from the environment.
///
/// An unset variable is never an error; it falls back to its default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot convert {key}='{value}' to {target}: {message}")]
    TypeConversion {
        key: String,
        value: String,
        target: &'static str,
        message: String,
    },
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn type_conversion(
        key: &str,
        value: &str,
        target: &'static str,
        err: impl std::fmt::Display,
    ) -> Self {
        ConfigError::TypeConversion {
            key: key.to_string(),
            value: value.to_string(),
            target,
            message: err.to_string(),
        }
    }
}

/// Driver errors are carried as-is; no classification happens here.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQL Server driver error: {0}")]
    Mssql(#[from] tiberius::error::Error),
    #[error("MariaDB driver error: {0}")]
    MariaDb(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Unsupported TDS protocol version '{0}' (driver speaks 7.4)")]
    UnsupportedProtocol(String),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Missing columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Invalid notebook configuration: {0}")]
    Invalid(String),
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Notebook server exited with status {0}")]
    Exited(i32),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Notebook(NotebookError::Invalid(err.to_string()))
    }
}

impl From<tiberius::error::Error> for AppError {
    fn from(err: tiberius::error::Error) -> Self {
        AppError::Database(DatabaseError::Mssql(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::MariaDb(err))
    }
}
