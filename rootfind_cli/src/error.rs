//! CLI error types

use rootfind_core::SolverError;
use thiserror::Error;

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown test case '{0}' (run `rootfind cases` for the list)")]
    UnknownCase(String),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The structured solver error behind this failure, if any.
    pub fn solver_error(&self) -> Option<&SolverError> {
        match self {
            CliError::Solver(err) => Some(err),
            _ => None,
        }
    }
}
