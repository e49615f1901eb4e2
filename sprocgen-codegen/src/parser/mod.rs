//! Schema loading: JSON/TOML documents and T-SQL DDL via sqlparser-rs

mod document;
mod schema_parser;

use std::path::Path;

use tracing::debug;

use sprocgen::DatabaseSchema;

use crate::error::{CodegenError, Result};

pub use document::{parse_json, parse_toml};
pub use schema_parser::parse_schema;

/// Load a schema file, picking the format from its extension
///
/// `.sql` files are parsed as DDL; the database is named after the file stem.
pub fn load_schema(path: &Path) -> Result<DatabaseSchema> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    debug!("Loading schema from {} ({})", path.display(), extension);

    match extension.as_str() {
        "json" => parse_json(&content),
        "toml" => parse_toml(&content),
        "sql" => {
            let database_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            parse_schema(&content, database_name)
        }
        _ => Err(CodegenError::ParseError(format!(
            "Unsupported schema file '{}': expected .json, .toml or .sql",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();

        let sql_path = dir.path().join("Inventory.sql");
        fs::write(
            &sql_path,
            "CREATE TABLE Item (ID INT NOT NULL PRIMARY KEY, Name NVARCHAR(50) NULL);",
        )
        .unwrap();
        let schema = load_schema(&sql_path).unwrap();
        assert_eq!(schema.database_name, "Inventory");
        assert_eq!(schema.tables[0].name, "Item");

        let json_path = dir.path().join("shop.JSON");
        fs::write(&json_path, r#"{ "database_name": "Shop", "tables": [] }"#).unwrap();
        assert_eq!(load_schema(&json_path).unwrap().database_name, "Shop");
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.yaml");
        fs::write(&path, "tables: []").unwrap();
        assert!(matches!(load_schema(&path), Err(CodegenError::ParseError(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_schema(&missing), Err(CodegenError::IoError(_))));
    }
}
