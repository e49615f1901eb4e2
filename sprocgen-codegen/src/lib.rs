//! sprocgen-codegen: Generate C# entity classes and T-SQL stored procedures
//! from a prefix-annotated relational schema
//!
//! This crate provides both a CLI tool and a library. A schema is loaded from a
//! JSON/TOML document or parsed from SQL Server DDL with `sqlparser-rs`, then:
//!
//! - every table becomes a `public partial class` with backing fields, properties
//!   driven by column prefixes (`eno_`, `ent_`, `lkp_`, ...), navigation
//!   properties and helper methods
//! - every table gets a family of `CREATE OR ALTER PROCEDURE` statements (GetAll,
//!   GetFiltered, GetByID, Add, Update, Delete, GetBy<Index>, GetRelated)
//!
//! Generation is partial-failure tolerant: a procedure that cannot be built for a
//! table (e.g. Update without a primary key) is skipped and reported.
//!
//! # Usage in build.rs
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.sprocgen]
//! schema_file = "schema.sql"
//! namespace = "Shop.Entities"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     sprocgen_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate sprocgen output");
//! }
//! ```
//!
//! # Programmatic Configuration
//!
//! ```rust,ignore
//! sprocgen_codegen::CodegenBuilder::new("schema.json")
//!     .output_dir("generated")
//!     .namespace("Shop.Entities")
//!     .jobs(4)
//!     .generate()?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! sprocgen-codegen --schema schema.sql --output ./generated generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
mod parallel;
pub mod parser;
pub mod report;
pub mod sql;
pub mod writer;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use sprocgen::DatabaseSchema;

pub use codegen::{EntityGenerator, GeneratedEntity};
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};
pub use report::{GenerationFailure, GenerationReport};
pub use sql::{SqlGenerator, SqlScript};

/// Files produced by a run and the items that could not be generated
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub entity_files: Vec<PathBuf>,
    pub sql_file: Option<PathBuf>,
    pub procedures: usize,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<GenerationSummary> {
    info!("Loading schema: {:?}", config.schema_file);
    let schema = parser::load_schema(&config.schema_file)?;
    info!("Found {} tables", schema.tables.len());

    let schema = filter_tables(schema, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        schema.tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    let mut summary = GenerationSummary::default();

    if config.generate_entities {
        info!("Generating entities in {:?}", config.output_entities_dir);
        let mut report = EntityGenerator::new(&config.namespace)
            .include_timestamp(config.include_timestamp)
            .jobs(config.jobs)
            .generate_schema(&schema);
        summary.entity_files =
            writer::write_entities(&report.outputs, &config.output_entities_dir, config.dry_run)?;
        summary.failures.append(&mut report.failures);
    }

    if config.generate_sql {
        info!("Generating stored procedures in {:?}", config.output_sql_dir);
        let mut script = SqlGenerator::new()
            .include_advanced_procedures(config.include_advanced_procedures)
            .include_timestamp(config.include_timestamp)
            .jobs(config.jobs)
            .generate_schema(&schema);
        summary.sql_file = Some(writer::write_sql(
            &script,
            &config.output_sql_dir,
            config.dry_run,
        )?);
        summary.procedures = script.report.outputs.len();
        summary.failures.append(&mut script.report.failures);
    }

    if summary.is_complete() {
        info!(
            "Code generation complete: {} entity files, {} procedures",
            summary.entity_files.len(),
            summary.procedures
        );
    } else {
        warn!(
            "Code generation complete with {} skipped items: {} entity files, {} procedures",
            summary.failures.len(),
            summary.entity_files.len(),
            summary.procedures
        );
    }
    Ok(summary)
}

/// Filter tables based on include/exclude patterns
///
/// Patterns match either the bare or the schema-qualified table name.
fn filter_tables(mut schema: DatabaseSchema, include: &str, exclude: &str) -> DatabaseSchema {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    schema.tables.retain(|t| {
        let full_name = t.full_name();
        let matches = |set: &HashSet<String>| set.contains(&t.name) || set.contains(&full_name);
        let included = include_all || matches(&include_set);
        included && !matches(&exclude_set)
    });
    schema
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the output directory for both entities and the SQL script
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.config.output_entities_dir = dir.join("entities");
        self.config.output_sql_dir = dir.join("sql");
        self
    }

    /// Set the output directory for entities only
    pub fn output_entities_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_entities_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the output directory for the SQL script only
    pub fn output_sql_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_sql_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the namespace of generated entity classes
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Generate only entity classes, no SQL
    pub fn entities_only(mut self) -> Self {
        self.config.generate_sql = false;
        self
    }

    /// Generate only the SQL script, no entities
    pub fn sql_only(mut self) -> Self {
        self.config.generate_entities = false;
        self
    }

    pub fn include_advanced_procedures(mut self, include: bool) -> Self {
        self.config.include_advanced_procedures = include;
        self
    }

    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.config.include_timestamp = include;
        self
    }

    /// Worker threads for per-table generation
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Validate the configuration and generate
    pub fn generate(self) -> Result<GenerationSummary> {
        self.config.validate()?;
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.sprocgen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the schema file (required)
    schema_file: Option<String>,

    #[serde(default)]
    include_tables: Vec<String>,

    #[serde(default)]
    exclude_tables: Vec<String>,

    generate_entities: Option<bool>,
    generate_sql: Option<bool>,

    /// Output directories, relative to the manifest (default: under OUT_DIR)
    output_entities_dir: Option<String>,
    output_sql_dir: Option<String>,

    namespace: Option<String>,
    include_advanced_procedures: Option<bool>,
    include_timestamp: Option<bool>,
    jobs: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    sprocgen: Option<CargoMetadataConfig>,
}

/// Generate from `[package.metadata.sprocgen]` in the calling crate's Cargo.toml
///
/// ```toml
/// [package.metadata.sprocgen]
/// schema_file = "schema.sql"
/// namespace = "Shop.Entities"
/// exclude_tables = ["__MigrationHistory"]
/// include_timestamp = false
/// ```
///
/// Output goes to `OUT_DIR/entities` and `OUT_DIR/sql` unless overridden.
pub fn generate_from_cargo_metadata() -> Result<GenerationSummary> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let cargo_toml: CargoToml = toml::from_str(&cargo_toml_content).map_err(|e| {
        CodegenError::ConfigError(format!(
            "Failed to parse {}: {}",
            cargo_toml_path.display(),
            e
        ))
    })?;

    let metadata_config = cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.sprocgen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.sprocgen] section in Cargo.toml".into(),
            )
        })?;

    let schema_file = metadata_config.schema_file.ok_or_else(|| {
        CodegenError::ConfigError("schema_file is required in [package.metadata.sprocgen]".into())
    })?;

    let schema_path = PathBuf::from(&manifest_dir).join(&schema_file);

    let out_dir = std::env::var("OUT_DIR").map(PathBuf::from).map_err(|_| {
        CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
    })?;

    let mut builder = CodegenBuilder::new(&schema_path);

    builder = match metadata_config.output_entities_dir {
        Some(dir) => builder.output_entities_dir(PathBuf::from(&manifest_dir).join(dir)),
        None => builder.output_entities_dir(out_dir.join("entities")),
    };
    builder = match metadata_config.output_sql_dir {
        Some(dir) => builder.output_sql_dir(PathBuf::from(&manifest_dir).join(dir)),
        None => builder.output_sql_dir(out_dir.join("sql")),
    };

    if !metadata_config.include_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .include_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.include_tables(&tables);
    }
    if !metadata_config.exclude_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .exclude_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.exclude_tables(&tables);
    }

    if let Some(false) = metadata_config.generate_entities {
        builder = builder.sql_only();
    }
    if let Some(false) = metadata_config.generate_sql {
        builder = builder.entities_only();
    }
    if let Some(namespace) = metadata_config.namespace {
        builder = builder.namespace(&namespace);
    }
    if let Some(include) = metadata_config.include_advanced_procedures {
        builder = builder.include_advanced_procedures(include);
    }
    if let Some(include) = metadata_config.include_timestamp {
        builder = builder.include_timestamp(include);
    }
    if let Some(jobs) = metadata_config.jobs {
        builder = builder.jobs(jobs);
    }

    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}
