//! Naming utilities for code generation

use heck::ToLowerCamelCase;

use sprocgen::prefix::starts_with_ignore_case;

/// Audit column names, matched ignoring ASCII case
pub const AUDIT_COLUMNS: [&str; 10] = [
    "AddedOn",
    "AddedBy",
    "ChangedOn",
    "ChangedBy",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
    "ModifiedBy",
    "UpdatedOn",
    "UpdatedBy",
];

/// Columns preferred as the human-readable part of `ToString`, in priority order
pub const DISPLAY_COLUMNS: [&str; 4] = ["Name", "Title", "Description", "Email"];

/// Check if a column name is an audit column
pub fn is_audit_column(column_name: &str) -> bool {
    AUDIT_COLUMNS
        .iter()
        .any(|audit| audit.eq_ignore_ascii_case(column_name))
}

/// Convert a table name to a class name by stripping a leading `tbl_` or `tbl`
/// e.g., "tbl_Customer" -> "Customer", "tblOrder" -> "Order"
pub fn to_class_name(table_name: &str) -> String {
    let stripped = ["tbl_", "tbl"]
        .iter()
        .find(|prefix| starts_with_ignore_case(table_name, prefix))
        .map(|prefix| &table_name[prefix.len()..])
        .unwrap_or(table_name);

    if stripped.is_empty() {
        table_name.to_string()
    } else {
        stripped.to_string()
    }
}

/// Convert a property name to camelCase for private members
pub fn to_camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Title-case one column name for use inside a procedure name, keeping inner capitals
/// e.g., "LastName" -> "LastName", "last_name" -> "LastName"
pub fn to_title_segment(column_name: &str) -> String {
    column_name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Generate the `By...` suffix for index procedures
/// e.g., ["LastName", "FirstName"] -> "ByLastNameAndFirstName"
pub fn generate_by_suffix(columns: &[String]) -> String {
    let parts: Vec<String> = columns.iter().map(|c| to_title_segment(c)).collect();
    format!("By{}", parts.join("And"))
}

/// Pluralize a word
///
/// Rules, in precedence order: a word ending in `s`, `x`, `ch` or `sh` takes `es`;
/// a word ending in `y` after a consonant swaps it for `ies`; anything else takes `s`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }

    let lower = word.to_ascii_lowercase();

    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }

    if let Some(stem) = lower.strip_suffix('y') {
        let before_y = stem.chars().last();
        if matches!(before_y, Some(c) if !"aeiou".contains(c)) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Order"), "Orders");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Day"), "Days");

        // -ch, -sh
        assert_eq!(pluralize("Branch"), "Branches");
        assert_eq!(pluralize("Wish"), "Wishes");

        // lone y has no preceding letter
        assert_eq!(pluralize("y"), "ys");
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_to_class_name() {
        assert_eq!(to_class_name("tbl_Customer"), "Customer");
        assert_eq!(to_class_name("TBLOrder"), "Order");
        assert_eq!(to_class_name("Customer"), "Customer");
        assert_eq!(to_class_name("tbl"), "tbl");
        // only a leading prefix is stripped
        assert_eq!(to_class_name("Subtbl"), "Subtbl");
    }

    #[test]
    fn test_is_audit_column() {
        assert!(is_audit_column("AddedOn"));
        assert!(is_audit_column("modifiedby"));
        assert!(!is_audit_column("AddedAt"));
        assert!(!is_audit_column("Name"));
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("CreditCard"), "creditCard");
        assert_eq!(to_camel_case("Ssn"), "ssn");
    }

    #[test]
    fn test_generate_by_suffix() {
        assert_eq!(
            generate_by_suffix(&["LastName".to_string(), "FirstName".to_string()]),
            "ByLastNameAndFirstName"
        );
        assert_eq!(generate_by_suffix(&["email".to_string()]), "ByEmail");
        assert_eq!(generate_by_suffix(&["order_code".to_string()]), "ByOrderCode");
    }
}
