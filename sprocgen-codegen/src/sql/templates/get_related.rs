//! `SP_Get{Parent}{Children}` - master-detail fetch along a relationship

use sprocgen::{Column, DatabaseSchema, Relationship, Table};

use crate::codegen::pluralize;
use crate::error::{CodegenError, Result};
use crate::sql::procedure::{comma_separated, Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{has_any_prefix, require_named};

/// Page size when `@Take` is not supplied
const DEFAULT_TAKE: u32 = 1000;

pub fn procedure_name(parent: &Table, child: &Table) -> String {
    format!("SP_Get{}{}", parent.name, pluralize(&child.name))
}

/// Column the children are listed by: a date/time-like column first, newest first
fn order_by(child: &Table) -> String {
    let temporal = child.columns.iter().find(|c| {
        let lower = c.name.to_ascii_lowercase();
        lower.contains("date") || lower.contains("time") || lower.contains("addedon")
    });
    if let Some(column) = temporal {
        return format!("[{}] DESC", column.name);
    }
    match child.primary_key_columns().next() {
        Some(pk) => format!("[{}] ASC", pk.name),
        None => "(SELECT NULL)".to_string(),
    }
}

pub fn generate(parent: &Table, child: &Table, relationship: &Relationship) -> Result<Procedure> {
    require_named(parent)?;
    require_named(child)?;
    let parent_pk = parent
        .primary_key_columns()
        .next()
        .ok_or_else(|| CodegenError::missing_primary_key(&parent.name, "GetRelated"))?;
    let child_fk = child
        .get_column(&relationship.child_column)
        .ok_or_else(|| CodegenError::MissingColumn {
            table: child.name.clone(),
            column: relationship.child_column.clone(),
        })?;

    let children = pluralize(&child.name);
    let mut procedure = Procedure::new(procedure_name(parent, child));

    procedure.header.push("-- =========================================");
    procedure.header.push(format!("-- {}", procedure.name));
    procedure.header.push(format!(
        "-- Fetches all {} for a given {}",
        children.to_lowercase(),
        parent.name.to_lowercase()
    ));
    procedure.header.push("-- =========================================");

    procedure
        .parameters
        .push(Parameter::new(&parent_pk.name, sql_type(parent_pk)));
    procedure
        .parameters
        .push(Parameter::new("Skip", "INT").optional());
    procedure
        .parameters
        .push(Parameter::new("Take", "INT").optional());

    let selected = child
        .columns
        .iter()
        .filter(|c: &&Column| !has_any_prefix(c, &["eno_"]))
        .map(|c| format!("[{}]", c.name));

    let body = &mut procedure.body;
    body.push("SELECT");
    body.append_indented(&comma_separated(selected), 4);
    body.push(format!("FROM [{}]", child.name));
    body.push(format!("WHERE [{}] = @{}", child_fk.name, parent_pk.name));
    body.push(format!("ORDER BY {}", order_by(child)));
    body.push("OFFSET COALESCE(@Skip, 0) ROWS");
    body.push(format!(
        "FETCH NEXT COALESCE(@Take, {}) ROWS ONLY;",
        DEFAULT_TAKE
    ));

    Ok(procedure)
}

/// Generate a procedure for every enabled schema relationship whose parent is `parent`
///
/// Relationships are matched on the exact schema-qualified name; a child that is
/// not part of the schema is skipped.
pub fn generate_for_parent(
    parent: &Table,
    schema: &DatabaseSchema,
) -> Vec<(String, Result<Procedure>)> {
    let full_name = parent.full_name();
    schema
        .relationships
        .iter()
        .filter(|r| r.is_enabled && r.parent_table == full_name)
        .filter_map(|relationship| {
            let child = schema
                .tables
                .iter()
                .find(|t| t.full_name() == relationship.child_table)?;
            Some((
                procedure_name(parent, child),
                generate(parent, child, relationship),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_schema() -> DatabaseSchema {
        let customer = Table::new("Customer")
            .with_column(Column::new("ID", "int").primary_key())
            .with_column(Column::new("Name", "nvarchar").max_length(100));
        let order = Table::new("Order")
            .with_column(Column::new("OrderID", "int").primary_key())
            .with_column(Column::new("CustomerID", "int").references("Customer"))
            .with_column(Column::new("OrderDate", "datetime"))
            .with_column(Column::new("eno_Pin", "varchar").max_length(64));

        let mut schema = DatabaseSchema::new("Shop");
        schema.tables = vec![customer, order];
        schema.relationships = vec![Relationship::new(
            "dbo.Customer",
            "ID",
            "dbo.Order",
            "CustomerID",
        )];
        schema
    }

    #[test]
    fn test_related_procedure() {
        let schema = make_schema();
        let procedure =
            generate(&schema.tables[0], &schema.tables[1], &schema.relationships[0]).unwrap();
        assert_eq!(procedure.name, "SP_GetCustomerOrders");
        assert_eq!(procedure.parameter_names(), vec!["ID", "Skip", "Take"]);
        assert!(procedure.header.contains_line("-- Fetches all orders for a given customer"));

        let body = &procedure.body;
        assert!(body.contains_line("[OrderDate]"));
        assert!(!body.contains_line("[eno_Pin]"));
        assert!(body.contains_line("WHERE [CustomerID] = @ID"));
        assert!(body.contains_line("ORDER BY [OrderDate] DESC"));
        assert!(body.contains_line("FETCH NEXT COALESCE(@Take, 1000) ROWS ONLY;"));
    }

    #[test]
    fn test_order_falls_back_to_primary_key() {
        let mut schema = make_schema();
        schema.tables[1].columns.retain(|c| c.name != "OrderDate");
        let procedure =
            generate(&schema.tables[0], &schema.tables[1], &schema.relationships[0]).unwrap();
        assert!(procedure.body.contains_line("ORDER BY [OrderID] ASC"));
    }

    #[test]
    fn test_errors() {
        let mut schema = make_schema();
        schema.tables[1].columns.retain(|c| c.name != "CustomerID");
        let err = generate(&schema.tables[0], &schema.tables[1], &schema.relationships[0])
            .unwrap_err();
        assert!(matches!(err, CodegenError::MissingColumn { .. }));

        let keyless = Table::new("Customer").with_column(Column::new("Name", "nvarchar"));
        let err = generate(&keyless, &schema.tables[1], &schema.relationships[0]).unwrap_err();
        assert!(matches!(err, CodegenError::MissingPrimaryKey { .. }));
    }

    #[test]
    fn test_generate_for_parent() {
        let mut schema = make_schema();
        let results = generate_for_parent(&schema.tables[0], &schema);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "SP_GetCustomerOrders");

        // children get nothing, disabled relationships are ignored
        assert!(generate_for_parent(&schema.tables[1], &schema).is_empty());
        schema.relationships[0].is_enabled = false;
        assert!(generate_for_parent(&schema.tables[0], &schema).is_empty());
    }
}
