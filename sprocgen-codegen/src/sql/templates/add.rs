//! `SP_Add{Table}` - insert one row

use sprocgen::{Column, Table};

use crate::error::Result;
use crate::sql::procedure::{comma_separated, Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{has_any_prefix, has_column, require_named};

/// Columns maintained by the server or the application, never inserted directly
const NON_INSERTABLE_PREFIXES: [&str; 5] = ["clc_", "blg_", "agg_", "scb_", "eno_"];

fn is_insertable(column: &Column) -> bool {
    !column.is_primary_key
        && !matches!(
            column.name.as_str(),
            "AddedOn" | "AddedBy" | "ChangedOn" | "ChangedBy"
        )
        && !has_any_prefix(column, &NON_INSERTABLE_PREFIXES)
}

pub fn generate(table: &Table) -> Result<Procedure> {
    require_named(table)?;
    let mut procedure = Procedure::new(format!("SP_Add{}", table.name));

    let insertable: Vec<&Column> = table.columns.iter().filter(|c| is_insertable(c)).collect();
    let added_on = has_column(table, "AddedOn");
    let added_by = table.columns.iter().find(|c| c.name == "AddedBy");

    if insertable.is_empty() && added_by.is_none() {
        procedure
            .parameters
            .push(Parameter::new("DummyParam", "int").optional());
        procedure.body.push("-- No insertable columns in this table");
        procedure.body.push("-- This procedure exists for API consistency");
        procedure.body.blank();
        procedure.body.push("SELECT 0 AS NewID;");
        return Ok(procedure);
    }

    procedure.parameters.extend(
        insertable
            .iter()
            .map(|c| Parameter::new(&c.name, sql_type(c)).optional_if(c.is_nullable)),
    );
    if let Some(added_by) = added_by {
        procedure
            .parameters
            .push(Parameter::new("AddedBy", sql_type(added_by)));
    }

    let mut columns: Vec<String> = insertable.iter().map(|c| format!("[{}]", c.name)).collect();
    let mut values: Vec<String> = insertable.iter().map(|c| format!("@{}", c.name)).collect();
    if added_on {
        columns.push("[AddedOn]".into());
        values.push("GETDATE()".into());
    }
    if added_by.is_some() {
        columns.push("[AddedBy]".into());
        values.push("@AddedBy".into());
    }

    let body = &mut procedure.body;
    body.push(format!("INSERT INTO [{}] (", table.name));
    body.append_indented(&comma_separated(columns), 4);
    body.push(")");
    body.push("VALUES (");
    body.append_indented(&comma_separated(values), 4);
    body.push(");");
    if table.has_primary_key() {
        body.blank();
        body.push("SELECT SCOPE_IDENTITY() AS NewID;");
    }

    Ok(procedure)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{make_customer, make_table};
    use super::*;

    #[test]
    fn test_customer_parameters() {
        let procedure = generate(&make_customer()).unwrap();
        assert_eq!(procedure.name, "SP_AddCustomer");
        assert_eq!(procedure.parameter_names(), vec!["Name", "Email"]);

        let sql = procedure.to_sql();
        assert!(sql.contains("    @Name nvarchar(100),\n    @Email nvarchar(255) = NULL\nAS\n"));
        assert!(sql.contains("    INSERT INTO [Customer] (\n        [Name],\n        [Email]\n    )"));
        assert!(sql.contains("    VALUES (\n        @Name,\n        @Email\n    );"));
        assert!(sql.contains("    SELECT SCOPE_IDENTITY() AS NewID;\nEND\n"));
    }

    #[test]
    fn test_excluded_columns() {
        let procedure = generate(&make_table()).unwrap();
        for excluded in [
            "ID", "eno_Password", "clc_Balance", "blg_Score", "agg_OrderCount", "scb_Token",
            "AddedOn", "ChangedOn", "ChangedBy",
        ] {
            assert!(!procedure.has_parameter(excluded), "{} must not be a parameter", excluded);
        }
        assert!(procedure.has_parameter("ent_CreditCard"));
        assert_eq!(procedure.parameter_names().last(), Some(&"AddedBy"));

        assert!(procedure.body.contains_line("[AddedOn],"));
        assert!(procedure.body.contains_line("GETDATE(),"));
        assert!(procedure.body.contains_line("@AddedBy"));
    }

    #[test]
    fn test_prefix_exclusion_ignores_case() {
        let table = make_customer().with_column(Column::new("CLC_Total", "int"));
        assert!(!generate(&table).unwrap().has_parameter("CLC_Total"));
    }

    #[test]
    fn test_no_insertable_columns() {
        let table = Table::new("Counter")
            .with_column(Column::new("ID", "int").primary_key().identity())
            .with_column(Column::new("agg_Hits", "int"));
        let procedure = generate(&table).unwrap();
        assert_eq!(procedure.parameter_names(), vec!["DummyParam"]);
        let sql = procedure.to_sql();
        assert!(sql.contains("    @DummyParam int = NULL\nAS\n"));
        assert!(sql.contains("    SELECT 0 AS NewID;"));
        assert!(!sql.contains("INSERT"));
    }

    #[test]
    fn test_table_without_primary_key() {
        let table = Table::new("Log").with_column(Column::new("Message", "nvarchar").max_length(-1));
        let procedure = generate(&table).unwrap();
        assert_eq!(procedure.parameter_names(), vec!["Message"]);
        assert!(!procedure.to_sql().contains("SCOPE_IDENTITY"));
    }
}
