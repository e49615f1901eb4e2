//! Schema model: tables, columns, indexes, relationships

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::prefix::ColumnPrefix;

/// Default schema for tables that do not name one
pub const DEFAULT_SCHEMA: &str = "dbo";

/// How much audit tracking a table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    #[default]
    None,
    AppOnly,
    Full,
}

/// A database table (or view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name without schema
    pub name: String,

    /// Owning schema
    #[serde(default = "default_schema_name")]
    pub schema_name: String,

    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Indexes, including the primary key index when the reader reports one
    #[serde(default)]
    pub indexes: Vec<Index>,

    /// Relationships this table takes part in, on either side
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// `Full` gets a CLR audit trigger alongside its procedures
    #[serde(default)]
    pub audit_level: AuditLevel,

    #[serde(default)]
    pub is_view: bool,

    #[serde(default)]
    pub description: Option<String>,
}

fn default_schema_name() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// A table column
///
/// When a serialized column omits `prefix`, the tag is detected from its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnRecord")]
pub struct Column {
    pub name: String,

    /// Base SQL type without length arguments, e.g. `nvarchar`
    pub data_type: String,

    #[serde(default)]
    pub is_nullable: bool,

    #[serde(default)]
    pub is_primary_key: bool,

    #[serde(default)]
    pub is_foreign_key: bool,

    #[serde(default)]
    pub is_identity: bool,

    /// Character/byte length; `-1` means `MAX`
    #[serde(default)]
    pub max_length: Option<i32>,

    #[serde(default)]
    pub precision: Option<u8>,

    #[serde(default)]
    pub scale: Option<u8>,

    #[serde(default)]
    pub prefix: ColumnPrefix,

    /// Table referenced by a foreign key column
    #[serde(default)]
    pub referenced_table: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Serialized form of [`Column`], with an optional prefix tag
#[derive(Deserialize)]
struct ColumnRecord {
    name: String,
    data_type: String,
    #[serde(default)]
    is_nullable: bool,
    #[serde(default)]
    is_primary_key: bool,
    #[serde(default)]
    is_foreign_key: bool,
    #[serde(default)]
    is_identity: bool,
    #[serde(default)]
    max_length: Option<i32>,
    #[serde(default)]
    precision: Option<u8>,
    #[serde(default)]
    scale: Option<u8>,
    #[serde(default)]
    prefix: Option<ColumnPrefix>,
    #[serde(default)]
    referenced_table: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<ColumnRecord> for Column {
    fn from(record: ColumnRecord) -> Self {
        let prefix = record
            .prefix
            .unwrap_or_else(|| ColumnPrefix::detect(&record.name));
        Self {
            name: record.name,
            data_type: record.data_type,
            is_nullable: record.is_nullable,
            is_primary_key: record.is_primary_key,
            is_foreign_key: record.is_foreign_key,
            is_identity: record.is_identity,
            max_length: record.max_length,
            precision: record.precision,
            scale: record.scale,
            prefix,
            referenced_table: record.referenced_table,
            description: record.description,
        }
    }
}

/// An index over one or more columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub is_primary_key: bool,

    /// Indexed columns; order defines parameter order and method naming
    pub column_names: Vec<String>,
}

/// A foreign key edge between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub name: String,

    /// Referenced ("one" side) table, schema-qualified
    pub parent_table: String,

    pub parent_column: String,

    /// Referencing ("many" side) table, schema-qualified
    pub child_table: String,

    pub child_column: String,

    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A whole database: tables plus schema-wide relationships
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    #[serde(default)]
    pub database_name: String,

    #[serde(default)]
    pub tables: Vec<Table>,

    /// Schema-wide relationships; may duplicate per-table ones
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Table {
    /// Create an empty table in the default schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: default_schema_name(),
            columns: Vec::new(),
            indexes: Vec::new(),
            relationships: Vec::new(),
            audit_level: AuditLevel::None,
            is_view: false,
            description: None,
        }
    }

    pub fn in_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = schema_name.into();
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_audit_level(mut self, audit_level: AuditLevel) -> Self {
        self.audit_level = audit_level;
        self
    }

    /// Schema-qualified name, e.g. `dbo.Customer`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.name)
    }

    /// Get a column by exact name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column by name, ignoring ASCII case
    pub fn find_column_ignore_case(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Primary key columns in declaration order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }

    /// Indexes other than the primary key index that name at least one column
    pub fn secondary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes
            .iter()
            .filter(|i| !i.is_primary_key && !i.column_names.is_empty())
    }

    /// Check structural invariants: non-empty name, unique columns, index columns exist
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidArgument("table name is empty".into()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "table `{}` has a column with an empty name",
                    self.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(Error::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        for index in &self.indexes {
            for column in &index.column_names {
                if !seen.contains(column.as_str()) {
                    return Err(Error::UnknownColumn {
                        table: self.name.clone(),
                        index: index.name.clone(),
                        column: column.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Column {
    /// Create a non-null column; the prefix tag is detected from the name
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = ColumnPrefix::detect(&name);
        Self {
            name,
            data_type: data_type.into(),
            is_nullable: false,
            is_primary_key: false,
            is_foreign_key: false,
            is_identity: false,
            max_length: None,
            precision: None,
            scale: None,
            prefix,
            referenced_table: None,
            description: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    pub fn max_length(mut self, length: i32) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_prefix(mut self, prefix: ColumnPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Mark as a foreign key referencing `table`
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.is_foreign_key = true;
        self.referenced_table = Some(table.into());
        self
    }

    /// Base type in upper case, with any `(...)` suffix removed
    pub fn base_type(&self) -> String {
        let base = match self.data_type.find('(') {
            Some(pos) => &self.data_type[..pos],
            None => self.data_type.as_str(),
        };
        base.trim().to_uppercase()
    }
}

impl Index {
    pub fn new(name: impl Into<String>, column_names: &[&str]) -> Self {
        Self {
            name: name.into(),
            is_unique: false,
            is_primary_key: false,
            column_names: column_names.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_unique = true;
        self
    }
}

impl Relationship {
    /// `child_table.child_column` references `parent_table.parent_column`
    pub fn new(
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
        child_table: impl Into<String>,
        child_column: impl Into<String>,
    ) -> Self {
        Self {
            name: String::new(),
            parent_table: parent_table.into(),
            parent_column: parent_column.into(),
            child_table: child_table.into(),
            child_column: child_column.into(),
            is_enabled: true,
        }
    }
}

impl DatabaseSchema {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            ..Default::default()
        }
    }

    /// Find a table by schema-qualified name, ignoring ASCII case
    pub fn find_table(&self, full_name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.full_name().eq_ignore_ascii_case(full_name))
    }

    /// Validate every table
    pub fn validate(&self) -> Result<()> {
        self.tables.iter().try_for_each(Table::validate)
    }
}
