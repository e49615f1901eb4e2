//! `SP_Update{Table}` - update one row by primary key

use sprocgen::{Column, Table};

use crate::error::Result;
use crate::sql::procedure::{comma_separated, Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{has_any_prefix, has_column, key_condition, require_named, require_primary_key};

const NON_UPDATEABLE_PREFIXES: [&str; 5] = ["clc_", "blg_", "agg_", "scb_", "eno_"];

fn is_updateable(column: &Column) -> bool {
    !column.is_primary_key
        && !matches!(
            column.name.as_str(),
            "AddedOn" | "AddedBy" | "ChangedOn" | "ChangedBy"
        )
        && !has_any_prefix(column, &NON_UPDATEABLE_PREFIXES)
}

pub fn generate(table: &Table) -> Result<Procedure> {
    require_named(table)?;
    let pk_columns = require_primary_key(table, "Update")?;

    let mut procedure = Procedure::new(format!("SP_Update{}", table.name));

    let updateable: Vec<&Column> = table.columns.iter().filter(|c| is_updateable(c)).collect();
    let changed_on = has_column(table, "ChangedOn");
    let changed_by = table.columns.iter().find(|c| c.name == "ChangedBy");

    if updateable.is_empty() && changed_by.is_none() {
        procedure
            .parameters
            .push(Parameter::new("DummyParam", "int").optional());
        procedure.body.push("-- No updateable columns in this table");
        procedure.body.push("-- This procedure exists for API consistency");
        procedure.body.push(
            "-- All columns are either primary keys, calculated, business logic, or aggregate columns",
        );
        procedure.body.blank();
        procedure.body.push("SELECT 1 AS Result;");
        return Ok(procedure);
    }

    procedure
        .parameters
        .extend(pk_columns.iter().map(|c| Parameter::new(&c.name, sql_type(c))));
    procedure.parameters.extend(
        updateable
            .iter()
            .map(|c| Parameter::new(&c.name, sql_type(c)).optional_if(c.is_nullable)),
    );
    if let Some(changed_by) = changed_by {
        procedure
            .parameters
            .push(Parameter::new("ChangedBy", sql_type(changed_by)));
    }

    let mut assignments: Vec<String> = updateable
        .iter()
        .map(|c| format!("[{0}] = @{0}", c.name))
        .collect();
    if changed_on {
        assignments.push("[ChangedOn] = GETDATE()".into());
    }
    if changed_by.is_some() {
        assignments.push("[ChangedBy] = @ChangedBy".into());
    }

    let body = &mut procedure.body;
    body.push(format!("UPDATE [{}]", table.name));
    body.push("SET");
    body.append_indented(&comma_separated(assignments), 4);
    body.push(format!("WHERE {};", key_condition(&pk_columns)));

    Ok(procedure)
}
