//! `ccvwComboList_{Table}` - id/text lookup views joined by the parent-text queries

use sprocgen::prefix::starts_with_ignore_case;
use sprocgen::schema::DEFAULT_SCHEMA;
use sprocgen::{Column, Table};

use crate::codegen::Block;
use crate::error::Result;
use crate::sql::procedure::comma_separated;
use crate::sql::sql_type::is_text_type;

use super::require_named;

pub const VIEW_PREFIX: &str = "ccvwComboList_";

/// Column names taken as display text, in order of preference
const TEXT_COLUMN_NAMES: [&str; 7] = [
    "Name",
    "Title",
    "Description",
    "Text",
    "DisplayName",
    "FullName",
    "Label",
];

/// Name of the lookup view over `table_name`
pub fn view_name(table_name: &str) -> String {
    format!("{}{}", VIEW_PREFIX, table_name)
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.as_bytes()[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// Column shown as the `Text` of a lookup row
///
/// Tried in order: a well-known display name, `{Table}Name`, any column ending
/// in `Name` or `Title`, then the first non-key character column.
pub fn text_column(table: &Table) -> Option<&Column> {
    TEXT_COLUMN_NAMES
        .iter()
        .find_map(|name| table.find_column_ignore_case(name))
        .or_else(|| table.find_column_ignore_case(&format!("{}Name", table.name)))
        .or_else(|| {
            table.columns.iter().find(|c| {
                ends_with_ignore_case(&c.name, "Name") || ends_with_ignore_case(&c.name, "Title")
            })
        })
        .or_else(|| {
            table
                .columns
                .iter()
                .find(|c| !c.is_primary_key && is_text_type(c))
        })
}

/// Generate the lookup view, or `None` for views, system (`c_`) tables, lookup
/// views themselves and tables without a key or a text column
pub fn generate(table: &Table) -> Result<Option<Block>> {
    require_named(table)?;

    if table.is_view
        || starts_with_ignore_case(&table.name, VIEW_PREFIX)
        || starts_with_ignore_case(&table.name, "c_")
    {
        return Ok(None);
    }
    let Some(pk) = table.primary_key_columns().next() else {
        return Ok(None);
    };
    let Some(text) = text_column(table) else {
        return Ok(None);
    };

    let mut block = Block::new();
    block.push(format!("-- Lookup view for {}", table.name));
    block.push(format!(
        "CREATE OR ALTER VIEW [{}].[{}]",
        DEFAULT_SCHEMA,
        view_name(&table.name)
    ));
    block.push("WITH SCHEMABINDING");
    block.push("AS");
    block.push("SELECT");
    block.append_indented(
        &comma_separated([
            format!("[{}] AS ID", pk.name),
            format!("[{}] AS Text", text.name),
            format!(
                "REPLACE(REPLACE(REPLACE([{}], ' ', ''), '-', ''), '''', '') AS TextNS",
                text.name
            ),
        ]),
        4,
    );
    block.push(format!("FROM [{}].[{}];", table.schema_name, table.name));
    Ok(Some(block))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{make_customer, make_table};
    use super::*;

    #[test]
    fn test_customer_view() {
        let block = generate(&make_customer()).unwrap().unwrap();
        assert_eq!(
            block.render(0),
            "-- Lookup view for Customer\n\
             CREATE OR ALTER VIEW [dbo].[ccvwComboList_Customer]\n\
             WITH SCHEMABINDING\n\
             AS\n\
             SELECT\n    \
             [ID] AS ID,\n    \
             [Name] AS Text,\n    \
             REPLACE(REPLACE(REPLACE([Name], ' ', ''), '-', ''), '''', '') AS TextNS\n\
             FROM [dbo].[Customer];\n"
        );
    }

    #[test]
    fn test_text_column_preference() {
        assert_eq!(text_column(&make_table()).unwrap().name, "Name");

        let country = Table::new("Country")
            .with_column(Column::new("ID", "int").primary_key())
            .with_column(Column::new("IsoCode", "char").max_length(2))
            .with_column(Column::new("countryname", "nvarchar").max_length(80));
        assert_eq!(text_column(&country).unwrap().name, "countryname");

        let person = Table::new("Person")
            .with_column(Column::new("ID", "int").primary_key())
            .with_column(Column::new("Email", "nvarchar").max_length(255))
            .with_column(Column::new("LastName", "nvarchar").max_length(50));
        assert_eq!(text_column(&person).unwrap().name, "LastName");

        let code = Table::new("Code")
            .with_column(Column::new("Key", "nvarchar").max_length(10).primary_key())
            .with_column(Column::new("Sort", "int"))
            .with_column(Column::new("Value", "varchar").max_length(40));
        assert_eq!(text_column(&code).unwrap().name, "Value");
    }

    #[test]
    fn test_source_table_keeps_its_schema() {
        let block = generate(&make_customer().in_schema("sales")).unwrap().unwrap();
        assert!(block.contains_line("CREATE OR ALTER VIEW [dbo].[ccvwComboList_Customer]"));
        assert!(block.contains_line("FROM [sales].[Customer];"));
    }

    #[test]
    fn test_not_applicable() {
        let mut view = make_customer();
        view.is_view = true;
        assert!(generate(&view).unwrap().is_none());

        let mut system = make_customer();
        system.name = "c_User".into();
        assert!(generate(&system).unwrap().is_none());

        let mut lookup = make_customer();
        lookup.name = "CCVWCOMBOLIST_Customer".into();
        assert!(generate(&lookup).unwrap().is_none());

        let keyless = Table::new("Log").with_column(Column::new("Message", "nvarchar"));
        assert!(generate(&keyless).unwrap().is_none());

        let numbers = Table::new("Counter")
            .with_column(Column::new("ID", "int").primary_key())
            .with_column(Column::new("Hits", "int"));
        assert!(generate(&numbers).unwrap().is_none());
    }
}
