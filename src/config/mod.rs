mod settings;
mod store;

pub use settings::{Config, Practice, ReportConfig};
pub use store::SessionStore;

use crate::error::{AppError, Result};
use crate::session::SessionRecord;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.atendimentos/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "atendimentos") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.atendimentos/
    let home = dirs_home().ok_or_else(|| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".atendimentos"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the configured output directory; relative paths are taken from
/// the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(AppError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AppError::ConfigParse { path, source: e })
}

/// Load sessions.toml (empty store if missing)
pub fn load_sessions(config_dir: &Path) -> Result<SessionStore> {
    let path = config_dir.join("sessions.toml");
    if !path.exists() {
        return Ok(SessionStore::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AppError::ConfigParse { path, source: e })
}

/// Save sessions.toml
pub fn save_sessions(config_dir: &Path, store: &SessionStore) -> Result<()> {
    let path = config_dir.join("sessions.toml");
    let content = toml::to_string_pretty(store).map_err(|e| AppError::Serialize {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Load a JSON array of sessions exported by the web app
pub fn load_snapshot(path: &Path) -> Result<Vec<SessionRecord>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AppError::SnapshotParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[practice]
name = "Libertá"                   # shown in every report footer

[report]
title = "Relatório Geral de Atendimentos"
currency_symbol = "R$"
output_dir = "output"              # relative to this directory, or absolute / ~/...
typst_bin = "typst"
"#;

/// Template content for sessions.toml
pub const SESSIONS_TEMPLATE: &str = r#"# Sessions are appended here by 'atendimentos add'.
#
# Example:
#   [[sessions]]
#   id = "1710000000000"
#   client_name = "Ana"
#   service_type = "tarot"
#   session_date = "2024-03-10"
#   amount = "150.50"
#   payment_status = "paid"
"#;
