//! Outcome of a multi-table generation run

use std::fmt;

use tracing::warn;

/// One item that could not be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    /// Table the item belongs to
    pub table: String,
    /// Procedure or entity that failed, e.g. `SP_UpdateCustomer`
    pub item: String,
    pub error: String,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.item, self.table, self.error)
    }
}

/// Successes and failures of a partial-failure tolerant run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport<T> {
    pub outputs: Vec<T>,
    pub failures: Vec<GenerationFailure>,
}

impl<T> Default for GenerationReport<T> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> GenerationReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_output(&mut self, output: T) {
        self.outputs.push(output);
    }

    /// Record a failure and log it as a warning
    pub fn push_failure(&mut self, table: &str, item: &str, error: impl fmt::Display) {
        let error = error.to_string();
        warn!(table = %table, procedure = %item, "Could not generate {}: {}", item, error);
        self.failures.push(GenerationFailure {
            table: table.to_string(),
            item: item.to_string(),
            error,
        });
    }

    /// Move failures of another report into this one
    pub fn absorb_failures<U>(&mut self, other: &mut GenerationReport<U>) {
        self.failures.append(&mut other.failures);
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
