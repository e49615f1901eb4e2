//! Error types for sprocgen

use thiserror::Error;

/// Result type alias for schema model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a schema description is structurally unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty name or similar malformed input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two columns of one table share a name
    #[error("Duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },

    /// An index references a column the table does not have
    #[error("Index `{index}` on table `{table}` references unknown column `{column}`")]
    UnknownColumn {
        table: String,
        index: String,
        column: String,
    },
}
