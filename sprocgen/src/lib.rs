//! sprocgen - relational schema model
//!
//! The immutable inputs of the sprocgen generators: tables, columns, indexes and
//! relationships as produced by an external schema reader. Nothing in this crate
//! talks to a database; it only describes one.
//!
//! Column names may carry a lexical prefix (`eno_`, `ent_`, `lkp_`, ...) that
//! encodes generation behavior. The tag is stored on the column as a
//! [`ColumnPrefix`] and can be derived from the name with [`ColumnPrefix::detect`].
//!
//! # Example
//!
//! ```
//! use sprocgen::{Column, ColumnPrefix, Table};
//!
//! let table = Table::new("Customer")
//!     .with_column(Column::new("ID", "int").primary_key().identity())
//!     .with_column(Column::new("Name", "nvarchar").max_length(100))
//!     .with_column(Column::new("eno_Password", "varchar").max_length(64));
//!
//! assert_eq!(table.full_name(), "dbo.Customer");
//! assert_eq!(table.primary_key_columns().count(), 1);
//! assert_eq!(table.columns[2].prefix, ColumnPrefix::OneWayEncryption);
//! ```

pub mod error;
pub mod prefix;
pub mod schema;

pub use error::{Error, Result};
pub use prefix::ColumnPrefix;
pub use schema::{AuditLevel, Column, DatabaseSchema, Index, Relationship, Table};
