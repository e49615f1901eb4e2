//! JSON and TOML schema documents

use sprocgen::DatabaseSchema;

use crate::error::{CodegenError, Result};

/// Parse a JSON schema document
pub fn parse_json(content: &str) -> Result<DatabaseSchema> {
    let schema: DatabaseSchema = serde_json::from_str(content)?;
    finish(schema)
}

/// Parse a TOML schema document
pub fn parse_toml(content: &str) -> Result<DatabaseSchema> {
    let schema: DatabaseSchema = toml::from_str(content)
        .map_err(|e| CodegenError::ParseError(format!("Invalid TOML schema: {}", e)))?;
    finish(schema)
}

fn finish(schema: DatabaseSchema) -> Result<DatabaseSchema> {
    schema.validate()?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocgen::ColumnPrefix;

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "database_name": "Shop",
            "tables": [
                {
                    "name": "Customer",
                    "columns": [
                        { "name": "ID", "data_type": "int", "is_primary_key": true, "is_identity": true },
                        { "name": "eno_Password", "data_type": "varchar", "max_length": 64 }
                    ],
                    "indexes": [
                        { "name": "PK_Customer", "is_primary_key": true, "is_unique": true, "column_names": ["ID"] }
                    ]
                }
            ],
            "relationships": [
                { "parent_table": "dbo.Customer", "parent_column": "ID", "child_table": "dbo.Order", "child_column": "CustomerID" }
            ]
        }"#;

        let schema = parse_json(json).unwrap();
        assert_eq!(schema.database_name, "Shop");
        let table = &schema.tables[0];
        assert_eq!(table.full_name(), "dbo.Customer");
        assert_eq!(table.columns[1].prefix, ColumnPrefix::OneWayEncryption);
        assert!(schema.relationships[0].is_enabled);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            database_name = "Shop"

            [[tables]]
            name = "Tag"
            schema_name = "sales"

            [[tables.columns]]
            name = "ID"
            data_type = "int"
            is_primary_key = true

            [[tables.columns]]
            name = "Label"
            data_type = "nvarchar"
            max_length = 30
            prefix = "Localization"
        "#;

        let schema = parse_toml(toml).unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.full_name(), "sales.Tag");
        assert_eq!(table.columns[1].max_length, Some(30));
        assert_eq!(table.columns[1].prefix, ColumnPrefix::Localization);
    }

    #[test]
    fn test_rejects_invalid_documents() {
        assert!(matches!(parse_json("{ not json"), Err(CodegenError::ParseError(_))));
        assert!(matches!(parse_toml("tables = 3"), Err(CodegenError::ParseError(_))));

        let duplicate = r#"{ "tables": [ { "name": "T", "columns": [
            { "name": "A", "data_type": "int" },
            { "name": "A", "data_type": "int" }
        ] } ] }"#;
        assert!(matches!(parse_json(duplicate), Err(CodegenError::Model(_))));
    }
}
