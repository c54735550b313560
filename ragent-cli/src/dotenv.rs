//! `.env` loading.

use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Load `dir/.env` if present, letting its values override the process
/// environment. Returns the path that was loaded.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    let path = dir.join(DOTENV_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    dotenvy::from_path_override(&path)?;
    Ok(Some(path))
}
