//! `SP_Delete{Table}` - delete one row by primary key

use sprocgen::Table;

use crate::error::Result;
use crate::sql::procedure::{Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{key_condition, require_named, require_primary_key};

pub fn generate(table: &Table) -> Result<Procedure> {
    require_named(table)?;
    let pk_columns = require_primary_key(table, "Delete")?;

    let mut procedure = Procedure::new(format!("SP_Delete{}", table.name));
    procedure
        .parameters
        .extend(pk_columns.iter().map(|c| Parameter::new(&c.name, sql_type(c))));
    procedure.body.push(format!("DELETE FROM [{}]", table.name));
    procedure
        .body
        .push(format!("WHERE {};", key_condition(&pk_columns)));

    Ok(procedure)
}
