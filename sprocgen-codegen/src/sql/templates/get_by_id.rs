//! `SP_Get{Table}ByID` - fetch one row by primary key

use sprocgen::Table;

use crate::error::Result;
use crate::sql::procedure::{Parameter, Procedure};
use crate::sql::sql_type::sql_type;

use super::{key_condition, require_named, require_primary_key, select_all};

pub fn generate(table: &Table) -> Result<Procedure> {
    require_named(table)?;
    let pk_columns = require_primary_key(table, "GetByID")?;

    let mut procedure = Procedure::new(format!("SP_Get{}ByID", table.name));
    procedure
        .parameters
        .extend(pk_columns.iter().map(|c| Parameter::new(&c.name, sql_type(c))));

    procedure.body.append(select_all(table));
    procedure.body.push(format!("FROM [{}]", table.name));
    procedure
        .body
        .push(format!("WHERE {};", key_condition(&pk_columns)));

    Ok(procedure)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::make_customer;
    use super::*;
    use sprocgen::Column;

    #[test]
    fn test_get_by_id() {
        let procedure = generate(&make_customer()).unwrap();
        assert_eq!(procedure.name, "SP_GetCustomerByID");
        assert_eq!(procedure.parameter_names(), vec!["ID"]);
        assert!(procedure.to_sql().contains(
            "    SELECT\n        [ID],\n        [Name],\n        [Email]\n    FROM [Customer]\n    WHERE [ID] = @ID;\n"
        ));
    }

    #[test]
    fn test_requires_primary_key() {
        let table = Table::new("Log").with_column(Column::new("Message", "nvarchar"));
        assert!(generate(&table).is_err());
    }
}
