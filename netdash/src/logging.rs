//! tracing subscriber setup. The terminal UI owns the screen, so in that mode
//! logs go to a file instead of stderr.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

use crate::profiles::config_dir;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn init_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// `$NETDASH_LOG_FILE`, else `netdash.log` next to the profiles file.
pub fn log_path() -> PathBuf {
    match std::env::var_os("NETDASH_LOG_FILE") {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => config_dir().join("netdash.log"),
    }
}
