//! Error types for sprocgen-codegen

use thiserror::Error;

/// Result type alias for sprocgen-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Table '{table}' has no primary key. Cannot generate {operation} procedure.")]
    MissingPrimaryKey { table: String, operation: String },

    #[error("Table '{table}' does not have column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Failed to parse schema: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Schema model error: {0}")]
    Model(#[from] sprocgen::Error),
}

impl CodegenError {
    pub(crate) fn missing_primary_key(table: &str, operation: &str) -> Self {
        CodegenError::MissingPrimaryKey {
            table: table.to_string(),
            operation: operation.to_string(),
        }
    }
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
