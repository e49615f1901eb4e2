//! `SP_GetFiltered{Table}s` - optional filters over indexed columns

use sprocgen::{Column, Table};

use crate::codegen::Block;
use crate::error::Result;
use crate::sql::procedure::{Parameter, Procedure};
use crate::sql::sql_type::{is_text_type, sql_type};

use super::{
    column_list, order_and_page, paging_parameters, parent_text_branch, parent_text_columns,
    require_named, select_all, select_with_parent_text,
};

/// Distinct columns of all secondary indexes, in first-seen order
fn filter_columns(table: &Table) -> Vec<&Column> {
    let mut columns: Vec<&Column> = Vec::new();
    for index in table.secondary_indexes() {
        for name in &index.column_names {
            if columns.iter().any(|c| &c.name == name) {
                continue;
            }
            if let Some(column) = table.get_column(name) {
                columns.push(column);
            }
        }
    }
    columns
}

/// Generate the filter procedure, or `None` when the table has no secondary index
pub fn generate(table: &Table) -> Result<Option<Procedure>> {
    require_named(table)?;
    let columns = filter_columns(table);
    if columns.is_empty() {
        return Ok(None);
    }

    let mut procedure = Procedure::new(format!("SP_GetFiltered{}s", table.name));
    procedure.parameters.extend(
        columns
            .iter()
            .map(|c| Parameter::new(&c.name, sql_type(c)).optional()),
    );
    procedure.parameters.extend(paging_parameters());

    let fk_columns = parent_text_columns(table);
    procedure.body = if fk_columns.is_empty() {
        plain_select(table, &columns)
    } else {
        let mut joined = select_with_parent_text(table, &fk_columns);
        joined.append(where_clause(&columns, Some("t")));
        joined.append(order_and_page(table, Some("t"), true));
        parent_text_branch(joined, plain_select(table, &columns))
    };

    Ok(Some(procedure))
}

fn plain_select(table: &Table, columns: &[&Column]) -> Block {
    let mut block = select_all(table);
    block.push(format!("FROM [{}]", table.name));
    block.append(where_clause(columns, None));
    block.append(order_and_page(table, None, true));
    block
}

fn where_clause(columns: &[&Column], alias: Option<&str>) -> Block {
    let mut block = Block::new();
    block.push("WHERE 1=1");
    for column in columns {
        let qualified = column_list([*column], alias).concat();
        let condition = if is_text_type(column) {
            format!("{} LIKE '%' + @{} + '%'", qualified, column.name)
        } else {
            format!("{} = @{}", qualified, column.name)
        };
        block.push(format!("  AND (@{} IS NULL OR {})", column.name, condition));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{make_customer, make_table};
    use super::*;
    use sprocgen::Index;

    #[test]
    fn test_no_secondary_index() {
        let table = make_customer().with_index(Index::new("PK_Customer", &["ID"]).primary_key());
        assert!(generate(&table).unwrap().is_none());
    }

    #[test]
    fn test_parameters_are_distinct_index_columns() {
        let table = make_table().with_index(Index::new("IX_Customer_Last", &["LastName"]));
        let procedure = generate(&table).unwrap().unwrap();
        assert_eq!(procedure.name, "SP_GetFilteredCustomers");
        assert_eq!(
            procedure.parameter_names(),
            vec!["LastName", "FirstName", "CountryID", "Skip", "Take", "WithParentText"]
        );
        assert!(procedure
            .to_sql()
            .contains("    @LastName nvarchar(50) = NULL,\n"));
    }

    #[test]
    fn test_text_and_exact_filters() {
        let procedure = generate(&make_table()).unwrap().unwrap();
        let body = &procedure.body;
        assert!(body.contains_line("AND (@LastName IS NULL OR t.[LastName] LIKE '%' + @LastName + '%')"));
        assert!(body.contains_line("AND (@CountryID IS NULL OR t.[CountryID] = @CountryID)"));
        assert!(body.contains_line("AND (@CountryID IS NULL OR [CountryID] = @CountryID)"));
        assert!(body.contains_line("ORDER BY t.[ID]"));
    }

    #[test]
    fn test_always_paged() {
        let table = Table::new("Tag")
            .with_column(Column::new("Label", "nvarchar").max_length(30))
            .with_index(Index::new("IX_Tag_Label", &["Label"]));
        let procedure = generate(&table).unwrap().unwrap();
        let sql = procedure.to_sql();
        assert!(sql.contains(
            "    WHERE 1=1\n      AND (@Label IS NULL OR [Label] LIKE '%' + @Label + '%')\n    ORDER BY (SELECT NULL)\n    OFFSET ISNULL(@Skip, 0) ROWS\n"
        ));
    }
}
