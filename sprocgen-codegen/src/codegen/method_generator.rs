//! Method generator - constructor, ToString, Clone, Equals, GetHashCode and helpers

use sprocgen::{Column, ColumnPrefix, DatabaseSchema, Table};

use crate::error::{CodegenError, Result};

use super::block::Block;
use super::naming::{is_audit_column, DISPLAY_COLUMNS};
use super::property_generator::property_name;
use super::relationship_generator::{navigation_properties, NavigationKind};
use super::type_mapper::TypeMapper;

fn require_class_name(class_name: &str) -> Result<()> {
    if class_name.trim().is_empty() {
        return Err(CodegenError::InvalidArgument(
            "class name must not be empty".into(),
        ));
    }
    Ok(())
}

fn method(summary: &str, signature: String, body: Block) -> Block {
    let mut block = Block::new();
    block.summary(&[summary]);
    block.push(signature);
    block.push("{");
    block.append_indented(&body, 4);
    block.push("}");
    block
}

/// Audit timestamp columns (`...On` with a date type) are stamped with the current time
fn is_audit_timestamp(column: &Column) -> bool {
    is_audit_column(&column.name)
        && column.name.to_ascii_lowercase().ends_with("on")
        && TypeMapper::map(column).is_date_time()
}

/// Generate the default constructor
pub fn generate_constructor(
    table: &Table,
    class_name: &str,
    schema: &DatabaseSchema,
) -> Result<Block> {
    require_class_name(class_name)?;

    let mut body = Block::new();

    for navigation in navigation_properties(table, schema) {
        if navigation.kind == NavigationKind::Collection {
            body.push(format!(
                "this.{} = new List<{}>();",
                navigation.property_name, navigation.target_class
            ));
        }
    }

    for column in table.columns.iter().filter(|c| is_audit_timestamp(c)) {
        body.push(format!("this.{} = DateTime.Now;", property_name(column)));
    }

    for column in table
        .columns
        .iter()
        .filter(|c| c.prefix == ColumnPrefix::Aggregate)
    {
        body.push(format!(
            "this.{} = {};",
            property_name(column),
            TypeMapper::map(column).default_value()
        ));
    }

    Ok(method(
        &format!(
            "Initializes a new instance of the <see cref=\"{}\"/> class.",
            class_name
        ),
        format!("public {}()", class_name),
        body,
    ))
}

/// Generate `ToString`: primary key plus the first display column, when present
pub fn generate_to_string(table: &Table, class_name: &str) -> Result<Block> {
    require_class_name(class_name)?;

    let pk = table.primary_key_columns().next();
    let display = table.columns.iter().find(|c| {
        DISPLAY_COLUMNS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&c.name))
    });

    let text = match (pk, display) {
        (Some(pk), Some(display)) => format!(
            "{} #{{{}}}: {{{}}}",
            class_name,
            property_name(pk),
            property_name(display)
        ),
        (Some(pk), None) => format!("{} #{{{}}}", class_name, property_name(pk)),
        (None, _) => class_name.to_string(),
    };

    let mut body = Block::new();
    body.push(format!("return $\"{}\";", text));

    Ok(method(
        &format!("Returns a string representation of this {}.", class_name),
        "public override string ToString()".to_string(),
        body,
    ))
}

/// Columns copied by `Clone`
fn is_cloneable(column: &Column) -> bool {
    !column.is_primary_key && !is_audit_column(&column.name) && !column.prefix.is_read_only()
}

/// Generate `Clone`: a shallow copy of the regular data properties
pub fn generate_clone(table: &Table, class_name: &str) -> Result<Block> {
    require_class_name(class_name)?;

    let assignments: Vec<String> = table
        .columns
        .iter()
        .filter(|c| is_cloneable(c))
        .map(|c| {
            let name = property_name(c);
            format!("{} = this.{}", name, name)
        })
        .collect();

    let mut body = Block::new();
    body.push(format!("return new {}", class_name));
    body.push("{");
    for (i, assignment) in assignments.iter().enumerate() {
        let separator = if i + 1 < assignments.len() { "," } else { "" };
        body.push(format!("    {}{}", assignment, separator));
    }
    body.push("};");

    Ok(method(
        &format!("Creates a shallow copy of this {}.", class_name),
        format!("public {} Clone()", class_name),
        body,
    ))
}

/// Generate `Equals`: primary key identity, falling back to a unique-looking column
pub fn generate_equals(table: &Table, class_name: &str) -> Result<Block> {
    require_class_name(class_name)?;

    let mut body = Block::new();
    body.push(format!("if (obj is not {} other)", class_name));
    body.push("    return false;");
    body.blank();

    let pk_columns: Vec<&Column> = table.primary_key_columns().collect();
    if !pk_columns.is_empty() {
        let guards: Vec<String> = pk_columns
            .iter()
            .map(|pk| {
                let name = property_name(pk);
                if TypeMapper::map(pk).is_integer_key() {
                    format!("this.{0} > 0 && other.{0} > 0", name)
                } else {
                    format!("this.{0} != default && other.{0} != default", name)
                }
            })
            .collect();
        let comparisons: Vec<String> = pk_columns
            .iter()
            .map(|pk| format!("this.{0} == other.{0}", property_name(pk)))
            .collect();

        body.push(format!("if ({})", guards.join(" && ")));
        body.push(format!("    return {};", comparisons.join(" && ")));
        body.blank();
    }

    let unique = table.columns.iter().find(|c| {
        let lower = c.name.to_ascii_lowercase();
        !c.is_primary_key && (lower.contains("email") || lower.contains("username"))
    });
    match unique {
        Some(column) => body.push(format!(
            "return this.{0} == other.{0};",
            property_name(column)
        )),
        None => body.push("return base.Equals(obj);"),
    }

    Ok(method(
        &format!(
            "Determines whether the specified object is equal to this {}.",
            class_name
        ),
        "public override bool Equals(object obj)".to_string(),
        body,
    ))
}

/// Generate `GetHashCode`
pub fn generate_get_hash_code(table: &Table) -> Block {
    let pk_columns: Vec<&Column> = table.primary_key_columns().collect();

    let statement = match pk_columns.as_slice() {
        [] => "return base.GetHashCode();".to_string(),
        [pk] => {
            let name = property_name(pk);
            let clr_type = TypeMapper::map(pk);
            if clr_type.is_integer_key() {
                format!("return this.{0} > 0 ? this.{0}.GetHashCode() : 0;", name)
            } else if clr_type.is_nullable() || clr_type.is_reference_type() {
                format!("return this.{}?.GetHashCode() ?? 0;", name)
            } else {
                format!("return this.{}.GetHashCode();", name)
            }
        }
        many => {
            let names: Vec<String> = many
                .iter()
                .map(|pk| format!("this.{}", property_name(pk)))
                .collect();
            format!("return HashCode.Combine({});", names.join(", "))
        }
    };

    let mut body = Block::new();
    body.push(statement);
    method(
        "Returns a hash code for this instance.",
        "public override int GetHashCode()".to_string(),
        body,
    )
}

/// Generate placeholder encryption/hash helpers; `None` when no column is encrypted
pub fn generate_helper_methods(table: &Table) -> Option<Block> {
    let has_encrypted = table
        .columns
        .iter()
        .any(|c| c.prefix == ColumnPrefix::TwoWayEncryption);
    let hashed = table
        .columns
        .iter()
        .find(|c| c.prefix == ColumnPrefix::OneWayEncryption);

    if !has_encrypted && hashed.is_none() {
        return None;
    }

    let mut block = Block::new();

    if has_encrypted {
        block.push("private string EncryptValue(string plainText) =>");
        block.push("    string.IsNullOrEmpty(plainText) ? null : $\"[PleaseEncrypt]{plainText}\";");
        block.blank();
        block.push("private string DecryptValue(string encrypted) =>");
        block.push("    string.IsNullOrEmpty(encrypted) ? null : $\"[PleaseDecrypt]{encrypted}\";");
    }

    if let Some(column) = hashed {
        if has_encrypted {
            block.blank();
        }
        block.push("private static string HashValue(string plainText) =>");
        block.push("    $\"[PleaseHash]{plainText}\";");
        block.blank();

        let mut body = Block::new();
        body.push("if (string.IsNullOrEmpty(plainTextPassword))");
        body.push("    throw new ArgumentNullException(nameof(plainTextPassword));");
        body.blank();
        body.push(format!(
            "this.{} = HashValue(plainTextPassword);",
            property_name(column)
        ));

        block.append(method(
            "Sets the password (will be hashed before saving).",
            "public void SetPassword(string plainTextPassword)".to_string(),
            body,
        ));
    }

    Some(block)
}
