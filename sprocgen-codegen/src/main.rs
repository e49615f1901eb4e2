//! CLI entry point for sprocgen-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sprocgen::DatabaseSchema;
use sprocgen_codegen::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "sprocgen-codegen")]
#[command(about = "Generate C# entity classes and T-SQL stored procedures from a relational schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the schema file: .json, .toml or .sql (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory (overrides config, sets both entities and sql output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all (entities and stored procedures)
    Generate,
    /// Generate only entity classes
    Entities,
    /// Generate only the stored procedure script
    Sql,
    /// Inspect schema (show loaded tables for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so config.log_level can seed the filter
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Priority: RUST_LOG env var > config.log_level > debug for dev, info for release
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.output_entities_dir = output.join("entities");
        config.output_sql_dir = output.join("sql");
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    match &cli.command {
        Some(Commands::Entities) => {
            config.generate_sql = false;
        }
        Some(Commands::Sql) => {
            config.generate_entities = false;
        }
        Some(Commands::Inspect) => {
            let schema = sprocgen_codegen::parser::load_schema(&config.schema_file)?;
            print_schema(&schema);
            return Ok(());
        }
        _ => {}
    }

    config.validate()?;

    info!("Generating code from schema: {:?}", config.schema_file);
    let summary = sprocgen_codegen::generate(&config)?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
        for path in &summary.entity_files {
            println!("  Entity: {}", path.display());
        }
        if let Some(path) = &summary.sql_file {
            println!("  SQL:    {} ({} procedures)", path.display(), summary.procedures);
        }
    }

    if !summary.is_complete() {
        println!("Skipped {} items:", summary.failures.len());
        for failure in &summary.failures {
            println!("  - {}", failure);
        }
    }

    Ok(())
}

fn print_schema(schema: &DatabaseSchema) {
    println!(
        "Database {}: {} tables, {} relationships\n",
        schema.database_name,
        schema.tables.len(),
        schema.relationships.len()
    );
    for table in &schema.tables {
        let kind = if table.is_view { "View" } else { "Table" };
        println!("{}: {}", kind, table.full_name());
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.is_nullable { "NULL" } else { "NOT NULL" };
            let mut flags = Vec::new();
            if col.is_primary_key {
                flags.push("PK".to_string());
            }
            if col.is_identity {
                flags.push("IDENTITY".to_string());
            }
            if let Some(target) = &col.referenced_table {
                flags.push(format!("FK -> {}", target));
            }
            if let Some(prefix) = col.prefix.literal() {
                flags.push(format!("prefix {}", prefix));
            }
            println!(
                "    - {} {} {} {}",
                col.name,
                sprocgen_codegen::sql::sql_type(col),
                nullable,
                flags.join(", ")
            );
        }
        if !table.indexes.is_empty() {
            println!("  Indexes:");
            for idx in &table.indexes {
                let kind = if idx.is_primary_key {
                    "PRIMARY KEY "
                } else if idx.is_unique {
                    "UNIQUE "
                } else {
                    ""
                };
                println!("    - {}{} ({:?})", kind, idx.name, idx.column_names);
            }
        }
        println!();
    }

    if !schema.relationships.is_empty() {
        println!("Relationships:");
        for rel in &schema.relationships {
            let state = if rel.is_enabled { "" } else { " (disabled)" };
            println!(
                "  - {}: {}.{} -> {}.{}{}",
                rel.name, rel.child_table, rel.child_column, rel.parent_table, rel.parent_column, state
            );
        }
    }
}
