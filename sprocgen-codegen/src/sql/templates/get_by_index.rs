//! `SP_{Get|Fill}{Table}By{Columns}` - one lookup procedure per secondary index

use sprocgen::{Column, Index, Table};

use crate::codegen::generate_by_suffix;
use crate::error::{CodegenError, Result};
use crate::sql::procedure::{Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{column_list, key_condition, require_named, select_all};

/// Procedure name for an index: `Get` for unique lookups, `Fill` for lists
pub fn procedure_name(table: &Table, index: &Index) -> String {
    let verb = if index.is_unique { "Get" } else { "Fill" };
    format!(
        "SP_{}{}{}",
        verb,
        table.name,
        generate_by_suffix(&index.column_names)
    )
}

/// Generate the lookup procedure for one index
///
/// Index columns missing from the table are skipped; an index left with no
/// usable column is rejected.
pub fn generate(table: &Table, index: &Index) -> Result<Procedure> {
    require_named(table)?;
    let index_columns: Vec<&Column> = index
        .column_names
        .iter()
        .filter_map(|name| table.get_column(name))
        .collect();
    if index_columns.is_empty() {
        return Err(CodegenError::InvalidArgument(format!(
            "index '{}' on table '{}' has no usable columns",
            index.name, table.name
        )));
    }

    let mut procedure = Procedure::new(procedure_name(table, index));
    procedure
        .header
        .push(format!("-- Procedure for Index: {}", index.name));
    procedure.header.push(format!(
        "-- Index Type: {}",
        if index.is_unique { "Unique" } else { "Non-Unique" }
    ));
    procedure.header.blank();

    procedure.parameters.extend(
        index_columns
            .iter()
            .map(|c| Parameter::new(&c.name, sql_type(c))),
    );

    let condition = format!("WHERE {}", key_condition(&index_columns));
    let pk_columns: Vec<&Column> = table.primary_key_columns().collect();

    let body = &mut procedure.body;
    body.append(select_all(table));
    body.push(format!("FROM [{}]", table.name));
    if index.is_unique || pk_columns.is_empty() {
        body.push(format!("{};", condition));
    } else {
        body.push(condition);
        body.push(format!("ORDER BY {};", column_list(pk_columns, None).join(", ")));
    }

    Ok(procedure)
}

/// Generate procedures for every secondary index, in declaration order
pub fn generate_all(table: &Table) -> Vec<(String, Result<Procedure>)> {
    table
        .secondary_indexes()
        .map(|index| (procedure_name(table, index), generate(table, index)))
        .collect()
}
