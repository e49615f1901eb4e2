//! Property generator - one C# property per column

use sprocgen::prefix::starts_with_ignore_case;
use sprocgen::Column;

use super::block::Block;
use super::naming::is_audit_column;
use super::prefix_handler;
use super::type_mapper::{ClrType, TypeMapper};

/// Generate the property declaration for a column
///
/// Audit columns always take the regular path so their setter stays private;
/// other tagged columns delegate their shape to the prefix rules.
pub fn generate_property(column: &Column) -> Block {
    let clr_type = TypeMapper::map(column);

    if !is_audit_column(&column.name) {
        if let Some(block) = prefix_handler::generate_prefixed_property(column, &clr_type) {
            return block;
        }
    }

    generate_regular_property(column, &clr_type)
}

/// Name of the property generated for a column
pub fn property_name(column: &Column) -> String {
    if is_audit_column(&column.name) {
        column.name.clone()
    } else {
        prefix_handler::property_name(column)
    }
}

/// Backing field declaration for a column, if its prefix needs one
pub fn generate_backing_field(column: &Column) -> Option<String> {
    prefix_handler::generate_backing_field(column)
}

fn generate_regular_property(column: &Column, clr_type: &ClrType) -> Block {
    let name = property_name(column);
    let audit = is_audit_column(&column.name);

    let mut block = Block::new();
    block.summary(&[format!("Gets or sets the {}.", name)]);
    block.push(format!("[Column(\"{}\")]", column.name));

    if column.is_primary_key {
        block.push("[Key]");
    }
    if !column.is_nullable && !column.is_primary_key {
        block.push("[Required]");
    }
    if *clr_type == ClrType::String {
        if let Some(length) = column.max_length {
            let length = if length == -1 {
                "int.MaxValue".to_string()
            } else {
                length.to_string()
            };
            block.push(format!("[MaxLength({})]", length));
        }
    }
    if audit {
        if let Some(attribute) = database_generated_attribute(&column.name) {
            block.push(attribute);
        }
    }

    let setter = if audit { "private set" } else { "set" };
    let mut declaration = format!(
        "public {} {} {{ get; {}; }}",
        clr_type.to_type_string(),
        name,
        setter
    );
    if audit && ends_with_on(&column.name) && clr_type.is_date_time() {
        declaration.push_str(" = DateTime.Now;");
    }
    block.push(declaration);

    block
}

fn database_generated_attribute(column_name: &str) -> Option<&'static str> {
    if starts_with_ignore_case(column_name, "Added") {
        Some("[DatabaseGenerated(DatabaseGeneratedOption.Identity)]")
    } else if ["Changed", "Modified", "Updated"]
        .iter()
        .any(|p| starts_with_ignore_case(column_name, p))
    {
        Some("[DatabaseGenerated(DatabaseGeneratedOption.Computed)]")
    } else {
        None
    }
}

fn ends_with_on(column_name: &str) -> bool {
    column_name.len() >= 2
        && column_name.as_bytes()[column_name.len() - 2..].eq_ignore_ascii_case(b"on")
}
