//! Relationship generator - navigation properties from foreign keys

use sprocgen::{DatabaseSchema, Relationship, Table};

use super::block::Block;
use super::naming::{pluralize, to_class_name};

/// Which end of a relationship a navigation property sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// One side: `ICollection<Child>`
    Collection,
    /// Many side: reference to the parent
    Reference,
}

/// A resolved navigation property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    pub kind: NavigationKind,
    pub property_name: String,
    /// Class on the other end of the relationship
    pub target_class: String,
}

impl NavigationProperty {
    pub fn to_block(&self) -> Block {
        let mut block = Block::new();
        match self.kind {
            NavigationKind::Collection => {
                block.summary(&[format!(
                    "Navigation property to {} collection.",
                    self.property_name
                )]);
                block.push(format!(
                    "public virtual ICollection<{}> {} {{ get; set; }}",
                    self.target_class, self.property_name
                ));
            }
            NavigationKind::Reference => {
                block.summary(&[format!(
                    "Navigation property to parent {}.",
                    self.target_class
                )]);
                block.push(format!(
                    "public virtual {} {} {{ get; set; }}",
                    self.target_class, self.property_name
                ));
            }
        }
        block
    }
}

/// Resolve the navigation properties for a table
///
/// The table is the parent when `parent_table` matches its schema-qualified name
/// and the child when `child_table` does (ASCII case-insensitive). Relationships
/// naming neither end, or whose other end is not in the schema, are skipped.
pub fn navigation_properties(table: &Table, schema: &DatabaseSchema) -> Vec<NavigationProperty> {
    let full_name = table.full_name();
    table
        .relationships
        .iter()
        .filter_map(|relationship| resolve(relationship, &full_name, schema))
        .collect()
}

fn resolve(
    relationship: &Relationship,
    full_name: &str,
    schema: &DatabaseSchema,
) -> Option<NavigationProperty> {
    if relationship.parent_table.eq_ignore_ascii_case(full_name) {
        let child = schema.find_table(&relationship.child_table)?;
        let child_class = to_class_name(&child.name);
        Some(NavigationProperty {
            kind: NavigationKind::Collection,
            property_name: pluralize(&child_class),
            target_class: child_class,
        })
    } else if relationship.child_table.eq_ignore_ascii_case(full_name) {
        let parent = schema.find_table(&relationship.parent_table)?;
        let parent_class = to_class_name(&parent.name);
        Some(NavigationProperty {
            kind: NavigationKind::Reference,
            property_name: parent_class.clone(),
            target_class: parent_class,
        })
    } else {
        None
    }
}

/// Generate all navigation property declarations, separated by blank lines
pub fn generate_navigation_properties(table: &Table, schema: &DatabaseSchema) -> Block {
    let mut block = Block::new();
    for (i, navigation) in navigation_properties(table, schema).iter().enumerate() {
        if i > 0 {
            block.blank();
        }
        block.append(navigation.to_block());
    }
    block
}
