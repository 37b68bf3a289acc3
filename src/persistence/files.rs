use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".tomato";

/// Get the tomato directory - checks for local .tomato first, then falls back to global ~/.tomato
pub fn get_tomato_dir() -> Result<PathBuf> {
    // Check for local .tomato directory
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_tomato(&current_dir) {
        return Ok(local_dir);
    }

    // Fall back to global ~/.tomato
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .tomato directory by walking up the directory tree
fn find_local_tomato(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure the tomato directory exists
pub fn ensure_tomato_dir() -> Result<PathBuf> {
    let dir = get_tomato_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .tomato directory in the current directory
pub fn init_local_tomato() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let tomato_dir = current_dir.join(DATA_DIR_NAME);

    if tomato_dir.exists() {
        anyhow::bail!("Tomato directory already exists: {}", tomato_dir.display());
    }

    fs::create_dir_all(&tomato_dir)
        .with_context(|| format!("Failed to create directory: {}", tomato_dir.display()))?;

    Ok(tomato_dir)
}

/// Path of the target log inside a data directory
pub fn targets_file(dir: &Path) -> PathBuf {
    dir.join("targets.csv")
}

/// Path of the settings file inside a data directory
pub fn settings_file(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

/// Path of the log written while the TUI owns the terminal
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join("tomato.log")
}

/// Sound played at the end of focus unless configured otherwise
pub fn default_sound_file(dir: &Path) -> PathBuf {
    dir.join("alert.mp3")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    // Sync to disk
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}
