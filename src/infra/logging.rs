use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_ENV: &str = "FILEGRID_LOG";
const DEFAULT_TUI_FILTER: &str = "filegrid=info";
const DEFAULT_CLI_FILTER: &str = "filegrid=warn";

#[derive(Debug, Error)]
pub enum ResolveLogPathError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

pub fn resolve_state_dir() -> Result<PathBuf, ResolveLogPathError> {
    let Some(home) = dirs::home_dir() else {
        return Err(ResolveLogPathError::HomeDirNotFound);
    };
    Ok(home.join(".filegrid"))
}

pub fn resolve_log_path() -> Result<PathBuf, ResolveLogPathError> {
    if let Some(override_path) = std::env::var_os(LOG_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    Ok(resolve_state_dir()?.join("filegrid.log"))
}

pub fn open_log_file(path: &Path) -> Result<File, io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// The TUI owns the terminal, so its logs go to a file. Returns the path in
/// use, or `None` when logging stays off.
pub fn init_file_logging() -> Option<PathBuf> {
    let path = resolve_log_path().ok()?;
    let file = open_log_file(&path).ok()?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_TUI_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}

pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_CLI_FILTER))
        .with_writer(io::stderr)
        .try_init();
}
