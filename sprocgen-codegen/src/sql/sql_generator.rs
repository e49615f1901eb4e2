//! SQL generator - sequences the procedure templates per table and per schema

use chrono::Utc;
use tracing::{debug, info};

use sprocgen::{AuditLevel, DatabaseSchema, Table};

use crate::codegen::Block;
use crate::error::{CodegenError, Result};
use crate::parallel::map_ordered;
use crate::report::GenerationReport;

use super::procedure::Procedure;
use super::templates::{
    add, audit_trigger, combo_list, delete, get_all, get_by_id, get_by_index, get_filtered,
    get_related, update,
};

const RULE: &str = "-- =========================================";

/// A rendered script and the procedures it defines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlScript {
    pub sql: String,
    /// Names of the procedures in the script, in order; failures are listed separately
    pub report: GenerationReport<String>,
}

/// Generates `CREATE OR ALTER PROCEDURE` scripts
#[derive(Debug, Clone)]
pub struct SqlGenerator {
    include_advanced_procedures: bool,
    include_timestamp: bool,
    jobs: usize,
}

impl Default for SqlGenerator {
    fn default() -> Self {
        Self {
            include_advanced_procedures: true,
            include_timestamp: true,
            jobs: 1,
        }
    }
}

impl SqlGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the GetByIndex and GetRelated families
    pub fn include_advanced_procedures(mut self, include: bool) -> Self {
        self.include_advanced_procedures = include;
        self
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

    /// Whether a table can produce procedures
    pub fn can_generate(table: &Table) -> bool {
        !table.columns.is_empty()
    }

    /// Generate every applicable procedure for a table
    ///
    /// A template that fails is recorded in the report and skipped; only an
    /// invalid table is an error.
    pub fn generate_procedures(&self, table: &Table) -> Result<GenerationReport<Procedure>> {
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

        info!("Generating stored procedures for table: {}", table.name);

        let name = &table.name;
        let mut results: Vec<(String, Result<Option<Procedure>>)> = vec![
            (
                format!("SP_GetAll{}s", name),
                get_all::generate(table).map(Some),
            ),
            (
                format!("SP_GetFiltered{}s", name),
                get_filtered::generate(table),
            ),
            (
                format!("SP_Get{}ByID", name),
                get_by_id::generate(table).map(Some),
            ),
            (format!("SP_Add{}", name), add::generate(table).map(Some)),
            (
                format!("SP_Update{}", name),
                update::generate(table).map(Some),
            ),
            (
                format!("SP_Delete{}", name),
                delete::generate(table).map(Some),
            ),
        ];
        if self.include_advanced_procedures {
            results.extend(
                get_by_index::generate_all(table)
                    .into_iter()
                    .map(|(item, result)| (item, result.map(Some))),
            );
        }

        let mut report = GenerationReport::new();
        for (item, result) in results {
            match result {
                Ok(Some(procedure)) => {
                    debug!("Generated {}", procedure.name);
                    report.push_output(procedure);
                }
                Ok(None) => debug!("Skipped {}: not applicable", item),
                Err(e) => report.push_failure(name, &item, e),
            }
        }

        info!("Completed stored procedure generation for {}", table.name);
        Ok(report)
    }

    /// Generate the script for one table, followed by its audit trigger when it has one
    pub fn generate_table(&self, table: &Table) -> Result<SqlScript> {
        let mut procedures = self.generate_procedures(table)?;
        let mut block = self.banner(&format!("-- Stored Procedures for Table: {}", table.name));
        block.blank();
        append_procedures(&mut block, &procedures.outputs);

        let trigger_name = audit_trigger::trigger_name(table);
        match audit_trigger::generate(table) {
            Ok(Some(trigger)) => {
                debug!("Generated {}", trigger_name);
                append_batch(&mut block, trigger);
            }
            Ok(None) => {}
            Err(e) => procedures.push_failure(&table.name, &trigger_name, e),
        }

        let mut report = GenerationReport::new();
        report.outputs = procedures.outputs.iter().map(|p| p.name.clone()).collect();
        report.absorb_failures(&mut procedures);

        Ok(SqlScript {
            sql: block.render(0),
            report,
        })
    }

    /// Generate the script for every table with columns, ordered by name
    ///
    /// The lookup views the parent-text joins read from come first, then the
    /// audit setup check when any table is fully audited, then the per-table
    /// scripts. Never fails as a whole: per-table and per-procedure failures end
    /// up in the report.
    pub fn generate_schema(&self, schema: &DatabaseSchema) -> SqlScript {
        info!(
            "Generating stored procedures for schema: {}",
            schema.database_name
        );

        let mut tables: Vec<&Table> = schema
            .tables
            .iter()
            .filter(|t| Self::can_generate(t))
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let mut block = self.banner(&format!(
            "-- Stored Procedures for Database Schema: {}",
            schema.database_name
        ));
        block.blank();

        let mut report: GenerationReport<String> = GenerationReport::new();
        self.append_lookup_views(&mut block, &tables, &mut report);

        if tables
            .iter()
            .any(|t| t.audit_level == AuditLevel::Full && !t.is_view)
        {
            block.append(section(&["-- AuditCommon CLR Assembly Verification"]));
            append_batch(&mut block, audit_trigger::setup_check());
        }

        let scripts = map_ordered(&tables, self.jobs, |table| self.generate_table(table));
        for (table, script) in tables.iter().zip(scripts) {
            match script {
                Ok(mut script) => {
                    for line in script.sql.lines() {
                        block.push(line);
                    }
                    block.blank();
                    report.outputs.append(&mut script.report.outputs);
                    report.absorb_failures(&mut script.report);
                }
                Err(e) => report.push_failure(&table.name, &table.name, e),
            }
        }

        if self.include_advanced_procedures && !schema.relationships.is_empty() {
            block.append(section(&[
                "-- Foreign Key Relationship Procedures",
                "-- (Master-Detail Views)",
            ]));

            for table in &tables {
                for (item, result) in get_related::generate_for_parent(table, schema) {
                    match result {
                        Ok(procedure) => {
                            debug!("Generated {}", procedure.name);
                            append_procedures(&mut block, std::slice::from_ref(&procedure));
                            report.push_output(procedure.name);
                        }
                        Err(e) => report.push_failure(&table.name, &item, e),
                    }
                }
            }
        }

        info!(
            "Generated {} stored procedures for {} ({} failed)",
            report.outputs.len(),
            schema.database_name,
            report.failures.len()
        );

        SqlScript {
            sql: block.render(0),
            report,
        }
    }

    /// One `ccvwComboList_` view per table that can back a lookup, in table order
    fn append_lookup_views(
        &self,
        block: &mut Block,
        tables: &[&Table],
        report: &mut GenerationReport<String>,
    ) {
        let mut views = Vec::new();
        for table in tables {
            match combo_list::generate(table) {
                Ok(Some(view)) => views.push(view),
                Ok(None) => debug!("No lookup view for {}", table.name),
                Err(e) => {
                    report.push_failure(&table.name, &combo_list::view_name(&table.name), e)
                }
            }
        }
        if views.is_empty() {
            return;
        }

        info!("Generating {} lookup views", views.len());
        block.append(section(&["-- ccvwComboList Views for Dropdown Lookups"]));
        for view in views {
            append_batch(block, view);
        }
    }

    fn banner(&self, title: &str) -> Block {
        let mut block = Block::new();
        block.push(RULE);
        block.push(title);
        if self.include_timestamp {
            block.push(format!(
                "-- Generated: {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        block.push(RULE);
        block
    }
}

/// Section heading between rules, without a timestamp
fn section(titles: &[&str]) -> Block {
    let mut block = Block::new();
    block.push(RULE);
    for title in titles {
        block.push(*title);
    }
    block.push(RULE);
    block.blank();
    block
}

/// A statement batch followed by `GO` and a blank line
fn append_batch(block: &mut Block, batch: Block) {
    block.append(batch);
    block.push("GO");
    block.blank();
}

fn append_procedures(block: &mut Block, procedures: &[Procedure]) {
    for procedure in procedures {
        append_batch(block, procedure.to_block());
    }
}
