//! `SP_GetAll{Table}s` - paged list with optional parent display text

use sprocgen::Table;

use crate::codegen::Block;
use crate::error::Result;
use crate::sql::procedure::Procedure;

use super::{
    order_and_page, paging_parameters, parent_text_branch, parent_text_columns, require_named,
    select_all, select_with_parent_text,
};

pub fn generate(table: &Table) -> Result<Procedure> {
    require_named(table)?;
    let mut procedure = Procedure::new(format!("SP_GetAll{}s", table.name));
    procedure.parameters.extend(paging_parameters());

    let fk_columns = parent_text_columns(table);
    let body = if fk_columns.is_empty() {
        plain_select(table)
    } else {
        let mut joined = select_with_parent_text(table, &fk_columns);
        joined.append(order_and_page(table, Some("t"), false));
        if !table.has_primary_key() {
            joined.push(";");
        }
        parent_text_branch(joined, plain_select(table))
    };
    procedure.body = body;

    Ok(procedure)
}

fn plain_select(table: &Table) -> Block {
    let mut block = select_all(table);
    if table.has_primary_key() {
        block.push(format!("FROM [{}]", table.name));
        block.append(order_and_page(table, None, false));
    } else {
        block.push(format!("FROM [{}];", table.name));
    }
    block
}
