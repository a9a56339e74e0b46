pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/mcq-accuracy/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("mcq-accuracy"))
}

/// Get the default config file path (~/.config/mcq-accuracy/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/mcq-accuracy/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; built-in defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => {
            let default_path = get_config_path()?;
            if default_path.exists() {
                read_config(&default_path)
            } else {
                debug!(path = %default_path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
