//! Configuration settings for sprocgen-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the schema file (`.json`, `.toml` or `.sql`)
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Whether to generate entity class files
    #[serde(default = "default_generate_entities")]
    pub generate_entities: bool,

    /// Whether to generate the stored procedure script
    #[serde(default = "default_generate_sql")]
    pub generate_sql: bool,

    /// Output directory for generated entities
    #[serde(default = "default_output_entities_dir")]
    pub output_entities_dir: PathBuf,

    /// Output directory for the generated SQL script
    #[serde(default = "default_output_sql_dir")]
    pub output_sql_dir: PathBuf,

    /// Namespace of generated entity classes
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Generate GetByIndex and GetRelated procedures
    #[serde(default = "default_include_advanced_procedures")]
    pub include_advanced_procedures: bool,

    /// Emit a `Generated:` timestamp line in file headers
    #[serde(default = "default_include_timestamp")]
    pub include_timestamp: bool,

    /// Worker threads for per-table generation
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_generate_entities() -> bool {
    defaults::GENERATE_ENTITIES
}
fn default_generate_sql() -> bool {
    defaults::GENERATE_SQL
}
fn default_output_entities_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_ENTITIES_DIR)
}
fn default_output_sql_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_SQL_DIR)
}
fn default_namespace() -> String {
    defaults::NAMESPACE.to_string()
}
fn default_include_advanced_procedures() -> bool {
    defaults::INCLUDE_ADVANCED_PROCEDURES
}
fn default_include_timestamp() -> bool {
    defaults::INCLUDE_TIMESTAMP
}
fn default_jobs() -> usize {
    defaults::JOBS
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            generate_entities: default_generate_entities(),
            generate_sql: default_generate_sql(),
            output_entities_dir: default_output_entities_dir(),
            output_sql_dir: default_output_sql_dir(),
            namespace: default_namespace(),
            include_advanced_procedures: default_include_advanced_procedures(),
            include_timestamp: default_include_timestamp(),
            jobs: default_jobs(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("sprocgen").required(false));
        }

        // Override with environment variables (SPROCGEN_*)
        builder = builder.add_source(Environment::with_prefix("SPROCGEN").separator("__"));

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if !self.generate_entities && !self.generate_sql {
            return Err(CodegenError::ValidationError(
                "at least one of generate_entities or generate_sql must be true".into(),
            ));
        }

        if self.generate_entities && self.namespace.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "namespace is required when generate_entities is true".into(),
            ));
        }

        if self.jobs == 0 {
            return Err(CodegenError::ValidationError(
                "jobs must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
