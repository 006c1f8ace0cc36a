//! Saved-pool persistence.
//!
//! The pool is stored as a JSON array of strings. Absent, unreadable, or
//! malformed data reads as "no saved pool"; the best-effort wrappers
//! swallow every failure so persistence never aborts an operation.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "question-deck-cli";
const POOL_FILE: &str = "questions.json";

/// Default location of the saved pool under the platform data directory.
pub fn default_pool_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join(POOL_FILE))
}

/// Write the pool to `path`, creating parent directories as needed.
pub fn save_pool(path: &Path, pool: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create data directory")?;
    }
    let json = serde_json::to_string_pretty(pool).context("serialize pool")?;
    fs::write(path, json).context("write saved pool")?;
    Ok(())
}

/// Read a saved pool. Anything other than a readable JSON array of
/// strings is `None`.
pub fn load_pool(path: &Path) -> Option<Vec<String>> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str::<Vec<String>>(&text).ok()
}

/// Remove the saved pool. A missing file is not an error.
pub fn delete_pool(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("delete saved pool"),
    }
}

/// Fire-and-forget save.
pub fn save_pool_best_effort(path: &Path, pool: &[String]) {
    let _ = save_pool(path, pool);
}

/// Fire-and-forget delete.
pub fn delete_pool_best_effort(path: &Path) {
    let _ = delete_pool(path);
}
