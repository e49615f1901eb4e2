//! Writes generated entities and the procedure script to disk

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::GeneratedEntity;
use crate::config::defaults;
use crate::error::Result;
use crate::sql::SqlScript;

/// Write one `<Class>.cs` file per entity into `output_dir`
///
/// In dry-run mode nothing is touched and the would-be paths are returned.
pub fn write_entities(
    entities: &[GeneratedEntity],
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    if !dry_run {
        fs::create_dir_all(output_dir)?;
    }

    let mut written = Vec::with_capacity(entities.len());
    for entity in entities {
        let path = output_dir.join(&entity.file_name);
        if dry_run {
            info!("Would write entity {} -> {}", entity.class_name, path.display());
        } else {
            debug!("Writing entity {} -> {}", entity.class_name, path.display());
            fs::write(&path, &entity.source)?;
        }
        written.push(path);
    }
    Ok(written)
}

/// Write the procedure script to `output_dir/procedures.sql`
pub fn write_sql(script: &SqlScript, output_dir: &Path, dry_run: bool) -> Result<PathBuf> {
    let path = output_dir.join(defaults::SQL_FILE_NAME);
    if dry_run {
        info!(
            "Would write {} procedures -> {}",
            script.report.outputs.len(),
            path.display()
        );
        return Ok(path);
    }

    fs::create_dir_all(output_dir)?;
    debug!("Writing procedure script -> {}", path.display());
    fs::write(&path, &script.sql)?;
    Ok(path)
}
