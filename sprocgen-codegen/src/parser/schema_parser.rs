//! T-SQL DDL parser using sqlparser-rs

use sqlparser::ast::{
    ColumnDef, ColumnOption, CreateIndex, CreateTable, Expr, ForeignKeyConstraint, Ident,
    IndexColumn, ObjectName, PrimaryKeyConstraint, Statement, TableConstraint, UniqueConstraint,
};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use sprocgen::schema::DEFAULT_SCHEMA;
use sprocgen::{Column, DatabaseSchema, Index, Relationship, Table};

use crate::error::{CodegenError, Result};

/// Keywords SQL Server scripts carry that the parser does not need
const IGNORED_KEYWORDS: [&str; 2] = ["CLUSTERED", "NONCLUSTERED"];

/// Parse `CREATE TABLE` and `CREATE INDEX` statements into a schema
pub fn parse_schema(sql: &str, database_name: &str) -> Result<DatabaseSchema> {
    let dialect = MsSqlDialect {};
    let statements = Parser::parse_sql(&dialect, &normalize(sql))?;

    let mut schema = DatabaseSchema::new(database_name);
    let mut indexes = Vec::new();

    for stmt in statements {
        match stmt {
            Statement::CreateTable(create_table) => {
                let (table, relationships) = extract_table(&create_table)?;
                debug!(
                    "Parsed table {} ({} columns)",
                    table.full_name(),
                    table.columns.len()
                );
                schema.tables.push(table);
                schema.relationships.extend(relationships);
            }
            Statement::CreateIndex(create_index) => {
                indexes.push(extract_index(&create_index));
            }
            _ => {}
        }
    }

    for (table_name, index) in indexes {
        let table = schema
            .tables
            .iter_mut()
            .find(|t| t.full_name().eq_ignore_ascii_case(&table_name))
            .ok_or_else(|| {
                CodegenError::ParseError(format!(
                    "Index '{}' references unknown table '{}'",
                    index.name, table_name
                ))
            })?;
        table.indexes.push(index);
    }

    // the parent side of each foreign key learns about it as well
    for relationship in &schema.relationships {
        if let Some(parent) = schema
            .tables
            .iter_mut()
            .find(|t| t.full_name().eq_ignore_ascii_case(&relationship.parent_table))
        {
            parent.relationships.push(relationship.clone());
        }
    }

    schema.validate()?;
    Ok(schema)
}

/// Drop `GO` batch separators and index storage keywords
fn normalize(sql: &str) -> String {
    sql.lines()
        .filter(|line| !line.trim().eq_ignore_ascii_case("GO"))
        .map(|line| {
            if IGNORED_KEYWORDS
                .iter()
                .any(|k| line.to_ascii_uppercase().contains(k))
            {
                line.split_whitespace()
                    .filter(|word| {
                        !IGNORED_KEYWORDS
                            .iter()
                            .any(|k| word.eq_ignore_ascii_case(k))
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract a table and the foreign keys it declares
fn extract_table(create: &CreateTable) -> Result<(Table, Vec<Relationship>)> {
    let (schema_name, name) = split_object_name(&create.name);
    let mut table = Table::new(name).in_schema(schema_name);

    for col_def in &create.columns {
        let (column, col_unique) = extract_column(col_def)?;
        if column.is_primary_key {
            table.indexes.push(
                Index::new(format!("PK_{}", table.name), &[column.name.as_str()]).primary_key(),
            );
        }
        if col_unique {
            table.indexes.push(
                Index::new(
                    format!("UQ_{}_{}", table.name, column.name),
                    &[column.name.as_str()],
                )
                .unique(),
            );
        }
        table.columns.push(column);
    }

    let mut relationships = Vec::new();

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols,
                name,
                ..
            }) => {
                let pk_names: Vec<String> = pk_cols.iter().map(extract_ident_from_index_column).collect();
                for pk_name in &pk_names {
                    let column = find_column_mut(&mut table, pk_name)?;
                    column.is_primary_key = true;
                    column.is_nullable = false;
                }
                let index_name = name
                    .as_ref()
                    .map(extract_ident)
                    .unwrap_or_else(|| format!("PK_{}", table.name));
                table.indexes.push(index_from(index_name, &pk_names).primary_key());
            }
            TableConstraint::Unique(UniqueConstraint {
                columns: uniq_cols,
                name,
                ..
            }) => {
                let column_names: Vec<String> =
                    uniq_cols.iter().map(extract_ident_from_index_column).collect();
                let index_name = name.as_ref().map(extract_ident).unwrap_or_else(|| {
                    format!("UQ_{}_{}", table.name, column_names.join("_"))
                });
                table.indexes.push(index_from(index_name, &column_names).unique());
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                name,
                columns,
                foreign_table,
                referred_columns,
                ..
            }) => {
                let (parent_schema, parent_name) = split_object_name(foreign_table);
                let parent_full_name = format!("{}.{}", parent_schema, parent_name);

                for (col, ref_col) in columns.iter().zip(referred_columns.iter()) {
                    let column_name = extract_ident(col);
                    let column = find_column_mut(&mut table, &column_name)?;
                    column.is_foreign_key = true;
                    column.referenced_table = Some(parent_name.clone());

                    let mut relationship = Relationship::new(
                        parent_full_name.clone(),
                        extract_ident(ref_col),
                        table.full_name(),
                        column_name,
                    );
                    relationship.name = name
                        .as_ref()
                        .map(extract_ident)
                        .unwrap_or_else(|| format!("FK_{}_{}", table.name, parent_name));
                    relationships.push(relationship);
                }
            }
            _ => {}
        }
    }

    table.relationships = relationships.clone();
    Ok((table, relationships))
}

/// Extract a column and whether it carries an inline `UNIQUE`
fn extract_column(col_def: &ColumnDef) -> Result<(Column, bool)> {
    let data_type = col_def.data_type.to_string();
    let (base, args) = split_type(&data_type);

    let mut column = Column::new(extract_ident(&col_def.name), base.to_ascii_lowercase()).nullable();
    apply_type_arguments(&mut column, &base, &args);

    let mut col_unique = false;
    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => column.is_nullable = false,
            ColumnOption::Null => column.is_nullable = true,
            ColumnOption::PrimaryKey(_) => {
                column.is_primary_key = true;
                column.is_nullable = false;
            }
            ColumnOption::Unique(_) => col_unique = true,
            ColumnOption::Comment(c) => column.description = Some(c.clone()),
            other => {
                if other.to_string().to_ascii_uppercase().contains("IDENTITY") {
                    column.is_identity = true;
                }
            }
        }
    }

    Ok((column, col_unique))
}

/// `NVARCHAR(100)` -> (`NVARCHAR`, [`100`])
fn split_type(data_type: &str) -> (String, Vec<String>) {
    match data_type.split_once('(') {
        Some((base, rest)) => (
            base.trim().to_string(),
            rest.trim_end_matches(')')
                .split(',')
                .map(|arg| arg.trim().to_string())
                .filter(|arg| !arg.is_empty())
                .collect(),
        ),
        None => (data_type.trim().to_string(), Vec::new()),
    }
}

fn apply_type_arguments(column: &mut Column, base: &str, args: &[String]) {
    let upper = base.to_ascii_uppercase();
    match upper.as_str() {
        "DECIMAL" | "NUMERIC" => {
            column.precision = args.first().and_then(|p| p.parse().ok());
            column.scale = args.get(1).and_then(|s| s.parse().ok());
        }
        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "BINARY" | "VARBINARY" => {
            column.max_length = args.first().and_then(|len| {
                if len.eq_ignore_ascii_case("MAX") {
                    Some(-1)
                } else {
                    len.parse().ok()
                }
            });
        }
        _ => {}
    }
}

/// Extract the table name and index from a `CREATE INDEX` statement
fn extract_index(create: &CreateIndex) -> (String, Index) {
    let (schema_name, table_name) = split_object_name(&create.table_name);
    let column_names: Vec<String> = create
        .columns
        .iter()
        .map(extract_ident_from_index_column)
        .collect();
    let name = create
        .name
        .as_ref()
        .map(|n| split_object_name(n).1)
        .unwrap_or_else(|| format!("IX_{}_{}", table_name, column_names.join("_")));

    let mut index = index_from(name, &column_names);
    index.is_unique = create.unique;
    (format!("{}.{}", schema_name, table_name), index)
}

fn index_from(name: String, column_names: &[String]) -> Index {
    let columns: Vec<&str> = column_names.iter().map(String::as_str).collect();
    Index::new(name, &columns)
}

fn find_column_mut<'a>(table: &'a mut Table, name: &str) -> Result<&'a mut Column> {
    let table_name = table.name.clone();
    table
        .columns
        .iter_mut()
        .find(|c| c.name == name)
        .ok_or_else(|| {
            CodegenError::ParseError(format!(
                "Constraint on table '{}' references unknown column '{}'",
                table_name, name
            ))
        })
}

/// Split `[sales].[Customer]` into (`sales`, `Customer`); the schema defaults to `dbo`
fn split_object_name(name: &ObjectName) -> (String, String) {
    let parts: Vec<String> = name
        .0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .collect();
    match parts.as_slice() {
        [.., schema, table] => (schema.clone(), table.clone()),
        [table] => (DEFAULT_SCHEMA.to_string(), table.clone()),
        [] => (DEFAULT_SCHEMA.to_string(), String::new()),
    }
}

fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocgen::ColumnPrefix;

    const SHOP_DDL: &str = r#"
        CREATE TABLE [dbo].[Customer] (
            [ID] INT IDENTITY(1,1) NOT NULL,
            [Name] NVARCHAR(100) NOT NULL,
            [Email] NVARCHAR(255) NULL,
            [Notes] NVARCHAR(MAX) NULL,
            [clc_Balance] DECIMAL(10,2) NULL,
            [eno_Password] VARCHAR(64) NOT NULL,
            CONSTRAINT [PK_Customer] PRIMARY KEY CLUSTERED ([ID])
        );
        GO

        CREATE TABLE [dbo].[Order] (
            [OrderID] INT NOT NULL PRIMARY KEY,
            [CustomerID] INT NOT NULL,
            [OrderDate] DATETIME NOT NULL,
            CONSTRAINT [FK_Order_Customer] FOREIGN KEY ([CustomerID]) REFERENCES [dbo].[Customer] ([ID])
        );
        GO

        CREATE UNIQUE INDEX [IX_Customer_Email] ON [dbo].[Customer] ([Email]);
        CREATE NONCLUSTERED INDEX [IX_Order_Date] ON [dbo].[Order] ([OrderDate]);
    "#;

    #[test]
    fn test_parse_columns() {
        let schema = parse_schema(SHOP_DDL, "Shop").unwrap();
        assert_eq!(schema.database_name, "Shop");
        assert_eq!(schema.tables.len(), 2);

        let customer = &schema.tables[0];
        assert_eq!(customer.full_name(), "dbo.Customer");

        let id = customer.get_column("ID").unwrap();
        assert!(id.is_primary_key && id.is_identity && !id.is_nullable);
        assert_eq!(id.data_type, "int");

        let name = customer.get_column("Name").unwrap();
        assert_eq!(name.data_type, "nvarchar");
        assert_eq!(name.max_length, Some(100));
        assert!(!name.is_nullable);

        assert!(customer.get_column("Email").unwrap().is_nullable);
        assert_eq!(customer.get_column("Notes").unwrap().max_length, Some(-1));

        let balance = customer.get_column("clc_Balance").unwrap();
        assert_eq!((balance.precision, balance.scale), (Some(10), Some(2)));
        assert_eq!(balance.prefix, ColumnPrefix::Calculated);
    }

    #[test]
    fn test_parse_indexes() {
        let schema = parse_schema(SHOP_DDL, "Shop").unwrap();
        let customer = &schema.tables[0];
        let pk = customer.indexes.iter().find(|i| i.is_primary_key).unwrap();
        assert_eq!(pk.name, "PK_Customer");

        let email = customer
            .indexes
            .iter()
            .find(|i| i.name == "IX_Customer_Email")
            .unwrap();
        assert!(email.is_unique);
        assert_eq!(email.column_names, vec!["Email".to_string()]);

        let order = &schema.tables[1];
        assert!(order.get_column("OrderID").unwrap().is_primary_key);
        let by_date = order.indexes.iter().find(|i| i.name == "IX_Order_Date").unwrap();
        assert!(!by_date.is_unique);
    }

    #[test]
    fn test_parse_foreign_key() {
        let schema = parse_schema(SHOP_DDL, "Shop").unwrap();
        let order = &schema.tables[1];
        let customer_id = order.get_column("CustomerID").unwrap();
        assert!(customer_id.is_foreign_key);
        assert_eq!(customer_id.referenced_table.as_deref(), Some("Customer"));

        assert_eq!(schema.relationships.len(), 1);
        let relationship = &schema.relationships[0];
        assert_eq!(relationship.name, "FK_Order_Customer");
        assert_eq!(relationship.parent_table, "dbo.Customer");
        assert_eq!(relationship.parent_column, "ID");
        assert_eq!(relationship.child_table, "dbo.Order");
        assert_eq!(relationship.child_column, "CustomerID");

        // both ends carry the relationship
        assert_eq!(order.relationships.len(), 1);
        assert_eq!(schema.tables[0].relationships.len(), 1);
    }

    #[test]
    fn test_composite_primary_key() {
        let sql = r#"
            CREATE TABLE OrderLine (
                OrderID INT NOT NULL,
                LineNo INT NOT NULL,
                Quantity INT NOT NULL,
                PRIMARY KEY (OrderID, LineNo)
            );
        "#;
        let schema = parse_schema(sql, "Shop").unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.schema_name, "dbo");
        let pks: Vec<&str> = table.primary_key_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(pks, vec!["OrderID", "LineNo"]);
    }

    #[test]
    fn test_index_on_unknown_table() {
        let sql = "CREATE INDEX IX_Ghost ON Ghost (Name);";
        assert!(matches!(
            parse_schema(sql, "Shop"),
            Err(CodegenError::ParseError(_))
        ));
    }

    #[test]
    fn test_split_type() {
        assert_eq!(split_type("INT"), ("INT".to_string(), vec![]));
        assert_eq!(
            split_type("DECIMAL(18,4)"),
            ("DECIMAL".to_string(), vec!["18".to_string(), "4".to_string()])
        );
    }
}
