//! Script templates: one module per procedure kind, plus lookup views and audit triggers

pub mod add;
pub mod audit_trigger;
pub mod combo_list;
pub mod delete;
pub mod get_all;
pub mod get_by_id;
pub mod get_by_index;
pub mod get_filtered;
pub mod get_related;
pub mod update;

use sprocgen::prefix::starts_with_ignore_case;
use sprocgen::{Column, Table};

use crate::codegen::Block;
use crate::error::{CodegenError, Result};

use super::procedure::{comma_separated, Parameter};

/// Largest value accepted by `@Take`
const TAKE_ALL: &str = "2147483647";

/// Reject an unnamed table, which would render `SP_Add` and `[dbo].[]`
fn require_named(table: &Table) -> Result<()> {
    if table.name.trim().is_empty() {
        return Err(CodegenError::InvalidArgument(
            "table name must not be empty".into(),
        ));
    }
    Ok(())
}

/// Primary key columns, or a missing-key error naming the operation
fn require_primary_key<'a>(table: &'a Table, operation: &str) -> Result<Vec<&'a Column>> {
    let pk_columns: Vec<&Column> = table.primary_key_columns().collect();
    if pk_columns.is_empty() {
        return Err(CodegenError::missing_primary_key(&table.name, operation));
    }
    Ok(pk_columns)
}

/// ASCII case-insensitive check against a list of literal name prefixes
fn has_any_prefix(column: &Column, prefixes: &[&str]) -> bool {
    prefixes
        .iter()
        .any(|prefix| starts_with_ignore_case(&column.name, prefix))
}

fn has_column(table: &Table, name: &str) -> bool {
    table.columns.iter().any(|c| c.name == name)
}

/// `[A] = @A AND [B] = @B`
fn key_condition(columns: &[&Column]) -> String {
    columns
        .iter()
        .map(|c| format!("[{0}] = @{0}", c.name))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Bracketed column list, optionally alias-qualified, one per line
fn column_list<'a>(columns: impl IntoIterator<Item = &'a Column>, alias: Option<&str>) -> Vec<String> {
    let qualifier = alias.map(|a| format!("{}.", a)).unwrap_or_default();
    columns
        .into_iter()
        .map(|c| format!("{}[{}]", qualifier, c.name))
        .collect()
}

/// `SELECT` of every column of the table
fn select_all(table: &Table) -> Block {
    let mut block = Block::new();
    block.push("SELECT");
    block.append_indented(&comma_separated(column_list(&table.columns, None)), 4);
    block
}

fn paging_parameters() -> [Parameter; 3] {
    [
        Parameter::new("Skip", "INT").optional(),
        Parameter::new("Take", "INT").optional(),
        Parameter::new("WithParentText", "BIT").with_default("1"),
    ]
}

/// Foreign key columns whose parent has a combo-list view
fn parent_text_columns(table: &Table) -> Vec<&Column> {
    table
        .columns
        .iter()
        .filter(|c| c.is_foreign_key && c.referenced_table.as_deref().is_some_and(|t| !t.is_empty()))
        .collect()
}

/// `SELECT t.[...], pN.[Text] AS [fk_Text] FROM [T] t LEFT JOIN ...`
fn select_with_parent_text(table: &Table, fk_columns: &[&Column]) -> Block {
    let mut items = column_list(&table.columns, Some("t"));
    items.extend(
        fk_columns
            .iter()
            .enumerate()
            .map(|(i, fk)| format!("p{}.[Text] AS [{}_Text]", i + 1, fk.name)),
    );

    let mut block = Block::new();
    block.push("SELECT");
    block.append_indented(&comma_separated(items), 4);
    block.push(format!("FROM [{}] t", table.name));
    for (i, fk) in fk_columns.iter().enumerate() {
        block.push(format!(
            "LEFT JOIN [{}] p{1} ON t.[{2}] = p{1}.[ID]",
            combo_list::view_name(fk.referenced_table.as_deref().unwrap_or_default()),
            i + 1,
            fk.name
        ));
    }
    block
}

/// `ORDER BY` on the primary key plus `OFFSET/FETCH`
///
/// Without a primary key the result stays unordered and, unless `always_page`
/// is set, unpaged; paging then orders by `(SELECT NULL)`.
fn order_and_page(table: &Table, alias: Option<&str>, always_page: bool) -> Block {
    let pk_columns: Vec<&Column> = table.primary_key_columns().collect();
    let mut block = Block::new();
    if pk_columns.is_empty() && !always_page {
        return block;
    }

    let order = if pk_columns.is_empty() {
        "(SELECT NULL)".to_string()
    } else {
        column_list(pk_columns, alias).join(", ")
    };
    block.push(format!("ORDER BY {}", order));
    block.push("OFFSET ISNULL(@Skip, 0) ROWS");
    block.push(format!("FETCH NEXT ISNULL(@Take, {}) ROWS ONLY;", TAKE_ALL));
    block
}

/// `IF @WithParentText = 1` branch around a joined and a plain query
fn parent_text_branch(with_parent_text: Block, plain: Block) -> Block {
    let mut block = Block::new();
    block.push("IF @WithParentText = 1");
    block.push("BEGIN");
    block.append_indented(&with_parent_text, 4);
    block.push("END");
    block.push("ELSE");
    block.push("BEGIN");
    block.append_indented(&plain, 4);
    block.push("END");
    block
}
