//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether to generate entity files by default
pub const GENERATE_ENTITIES: bool = true;

/// Whether to generate the stored procedure script by default
pub const GENERATE_SQL: bool = true;

/// Default output directory for entities
pub const OUTPUT_ENTITIES_DIR: &str = "./generated/entities";

/// Default output directory for SQL scripts
pub const OUTPUT_SQL_DIR: &str = "./generated/sql";

/// Default namespace of generated entity classes
pub const NAMESPACE: &str = "YourNamespace.Entities";

/// Whether GetByIndex and GetRelated procedures are generated by default
pub const INCLUDE_ADVANCED_PROCEDURES: bool = true;

/// Whether headers carry a `Generated:` timestamp line by default
pub const INCLUDE_TIMESTAMP: bool = true;

/// Default number of worker threads for per-table generation
pub const JOBS: usize = 1;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// File name of the generated stored procedure script
pub const SQL_FILE_NAME: &str = "procedures.sql";
