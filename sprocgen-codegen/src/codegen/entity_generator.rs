//! Entity generator - one C# class per table

use chrono::Utc;
use tracing::{debug, info};

use sprocgen::{DatabaseSchema, Table};

use crate::error::{CodegenError, Result};
use crate::parallel::map_ordered;
use crate::report::GenerationReport;

use super::block::Block;
use super::method_generator::{
    generate_clone, generate_constructor, generate_equals, generate_get_hash_code,
    generate_helper_methods, generate_to_string,
};
use super::naming::to_class_name;
use super::property_generator::{generate_backing_field, generate_property};
use super::relationship_generator::generate_navigation_properties;

/// Indentation of class members inside `namespace { class { ... } }`
const MEMBER_INDENT: usize = 8;

/// A generated entity source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntity {
    /// Schema-qualified source table
    pub table: String,
    pub class_name: String,
    /// `<Class>.cs`
    pub file_name: String,
    pub source: String,
}

/// Composes properties, navigation properties and methods into entity classes
#[derive(Debug, Clone)]
pub struct EntityGenerator {
    namespace: String,
    include_timestamp: bool,
    jobs: usize,
}

impl EntityGenerator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            include_timestamp: true,
            jobs: 1,
        }
    }

    /// Emit the `Generated:` header line
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Worker threads for schema-wide generation
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Whether a table can produce an entity
    pub fn can_generate(table: &Table) -> bool {
        !table.columns.is_empty()
    }

    /// Generate the entity class for one table
    pub fn generate(&self, table: &Table, schema: &DatabaseSchema) -> Result<GeneratedEntity> {
        if table.name.trim().is_empty() {
            return Err(CodegenError::InvalidArgument(
                "table name must not be empty".into(),
            ));
        }
        if !Self::can_generate(table) {
            return Err(CodegenError::InvalidArgument(format!(
                "table '{}' has no columns",
                table.name
            )));
        }
        if self.namespace.trim().is_empty() {
            return Err(CodegenError::InvalidArgument(
                "namespace must not be empty".into(),
            ));
        }

        let class_name = to_class_name(&table.name);
        debug!("Generating entity {} for {}", class_name, table.full_name());

        let mut members: Vec<Block> = Vec::new();

        let backing_fields: Block = table
            .columns
            .iter()
            .filter_map(generate_backing_field)
            .collect();
        if !backing_fields.is_empty() {
            members.push(backing_fields);
        }

        members.extend(table.columns.iter().map(generate_property));

        let navigations = generate_navigation_properties(table, schema);
        if !navigations.is_empty() {
            members.push(navigations);
        }

        members.push(generate_constructor(table, &class_name, schema)?);
        members.push(generate_to_string(table, &class_name)?);
        members.push(generate_clone(table, &class_name)?);
        members.push(generate_equals(table, &class_name)?);
        members.push(generate_get_hash_code(table));
        if let Some(helpers) = generate_helper_methods(table) {
            members.push(helpers);
        }

        let keyless = table.is_view && !table.has_primary_key();

        let mut file = Block::new();
        file.append(self.header());
        file.blank();
        file.append(usings(keyless));
        file.blank();
        file.push(format!("namespace {}", self.namespace));
        file.push("{");

        let mut class = Block::new();
        class.summary(&class_summary(table));
        class.push(format!(
            "[Table(\"{}\", Schema = \"{}\")]",
            table.name, table.schema_name
        ));
        if keyless {
            class.push("[Keyless]");
        }
        class.push(format!("public partial class {}", class_name));
        class.push("{");
        file.append_indented(&class, 4);

        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                file.blank();
            }
            file.append_indented(member, MEMBER_INDENT);
        }

        file.push("    }");
        file.push("}");

        Ok(GeneratedEntity {
            table: table.full_name(),
            file_name: format!("{}.cs", class_name),
            class_name,
            source: file.render(0),
        })
    }

    /// Generate entities for every table that has columns
    ///
    /// A table that fails is logged, recorded in the report and left out.
    pub fn generate_schema(&self, schema: &DatabaseSchema) -> GenerationReport<GeneratedEntity> {
        info!(
            "Generating entities for schema: {} ({} tables)",
            schema.database_name,
            schema.tables.len()
        );

        let mut tables: Vec<&Table> = schema
            .tables
            .iter()
            .filter(|t| Self::can_generate(t))
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let results = map_ordered(&tables, self.jobs, |table| self.generate(table, schema));

        let mut report = GenerationReport::new();
        for (table, result) in tables.iter().zip(results) {
            match result {
                Ok(entity) => report.push_output(entity),
                Err(e) => report.push_failure(&table.name, &to_class_name(&table.name), e),
            }
        }

        info!(
            "Generated {} entities ({} failed)",
            report.outputs.len(),
            report.failures.len()
        );
        report
    }

    fn header(&self) -> Block {
        let mut block = Block::new();
        block.push("// <auto-generated>");
        block.push("//     This code was generated by sprocgen.");
        if self.include_timestamp {
            block.push(format!(
                "//     Generated: {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        block.push("//     Changes to this file may be lost when the code is regenerated.");
        block.push("// </auto-generated>");
        block
    }
}

fn usings(keyless: bool) -> Block {
    let mut block: Block = [
        "using System;",
        "using System.Collections.Generic;",
        "using System.ComponentModel.DataAnnotations;",
        "using System.ComponentModel.DataAnnotations.Schema;",
        "using System.Text.Json.Serialization;",
    ]
    .into_iter()
    .collect();
    if keyless {
        block.push("using Microsoft.EntityFrameworkCore;");
    }
    block
}

fn class_summary(table: &Table) -> Vec<String> {
    let mut lines = if table.is_view {
        vec![format!("Read-only view {}.", table.full_name())]
    } else {
        vec![format!("Entity for table {}.", table.full_name())]
    };
    if let Some(description) = table.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocgen::{Column, Relationship};

    fn make_table() -> Table {
        Table::new("tbl_Customer")
            .with_column(Column::new("ID", "int").primary_key().identity())
            .with_column(Column::new("Name", "nvarchar").max_length(100))
            .with_column(Column::new("Email", "nvarchar").max_length(255).nullable())
            .with_column(Column::new("ent_CreditCard", "nvarchar").max_length(200).nullable())
            .with_column(Column::new("AddedOn", "datetime"))
    }

    fn make_schema() -> DatabaseSchema {
        let relationship =
            Relationship::new("dbo.tbl_Customer", "ID", "dbo.Order", "CustomerID");
        let order = Table::new("Order")
            .with_column(Column::new("ID", "int").primary_key())
            .with_column(Column::new("CustomerID", "int").references("tbl_Customer"))
            .with_relationship(relationship.clone());
        let mut schema = DatabaseSchema::new("Shop");
        schema.tables = vec![make_table().with_relationship(relationship), order];
        schema
    }

    fn generator() -> EntityGenerator {
        EntityGenerator::new("Shop.Entities").include_timestamp(false)
    }

    #[test]
    fn test_generate_entity_layout() {
        let schema = make_schema();
        let entity = generator().generate(&schema.tables[0], &schema).unwrap();
        assert_eq!(entity.class_name, "Customer");
        assert_eq!(entity.file_name, "Customer.cs");

        let code = &entity.source;
        assert!(code.contains("namespace Shop.Entities\n{"));
        assert!(code.contains("    [Table(\"tbl_Customer\", Schema = \"dbo\")]"));
        assert!(code.contains("    public partial class Customer\n    {"));
        assert!(code.contains("        private string _creditCardEncrypted;"));
        assert!(code.contains("        public string CreditCard\n"));
        assert!(code.contains("        public virtual ICollection<Order> Orders { get; set; }"));
        assert!(code.contains("            this.Orders = new List<Order>();"));
        assert!(code.contains("        private string EncryptValue(string plainText) =>"));
        assert!(!code.contains("Generated:"));
        assert!(code.ends_with("    }\n}\n"));

        // backing fields precede properties, methods follow navigation properties
        let field = code.find("_creditCardEncrypted;").unwrap();
        let property = code.find("public int ID").unwrap();
        let navigation = code.find("ICollection<Order>").unwrap();
        let constructor = code.find("public Customer()").unwrap();
        assert!(field < property && property < navigation && navigation < constructor);
    }

    #[test]
    fn test_generate_is_idempotent_without_timestamp() {
        let schema = make_schema();
        let first = generator().generate(&schema.tables[0], &schema).unwrap();
        let second = generator().generate(&schema.tables[0], &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamp_header() {
        let schema = make_schema();
        let entity = EntityGenerator::new("Shop.Entities")
            .generate(&schema.tables[0], &schema)
            .unwrap();
        assert!(entity.source.contains("//     Generated: "));
    }

    #[test]
    fn test_keyless_view() {
        let mut view = Table::new("vwCustomerTotals")
            .with_column(Column::new("CustomerName", "nvarchar").max_length(100))
            .with_column(Column::new("Total", "money"));
        view.is_view = true;
        let schema = DatabaseSchema::new("Shop");
        let entity = generator().generate(&view, &schema).unwrap();
        assert!(entity.source.contains("/// Read-only view dbo.vwCustomerTotals."));
        assert!(entity.source.contains("    [Keyless]"));
        assert!(entity.source.contains("using Microsoft.EntityFrameworkCore;"));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let schema = DatabaseSchema::new("Shop");
        assert!(generator().generate(&Table::new("Empty"), &schema).is_err());
        assert!(generator().generate(&Table::new(""), &schema).is_err());
        assert!(EntityGenerator::new(" ")
            .generate(&make_table(), &schema)
            .is_err());
    }

    #[test]
    fn test_generate_schema_skips_empty_tables_and_sorts() {
        let mut schema = make_schema();
        schema.tables.push(Table::new("Audit"));
        let report = generator().jobs(2).generate_schema(&schema);
        assert!(report.is_complete());
        let names: Vec<&str> = report.outputs.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(names, vec!["Order", "Customer"]);
    }
}
