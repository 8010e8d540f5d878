use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "fintrack.db";

/// Where the database lives.
///
/// An explicit path (the `--db` flag or `FINTRACK_DB`) wins; otherwise the
/// platform data directory is used. Missing parent directories are created.
pub(crate) fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_db_path()?,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    }
    Ok(path)
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "fintrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join(DB_FILE_NAME))
}
