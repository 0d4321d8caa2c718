//! CLI subcommands.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod manual;
pub mod validate;

use std::fmt;
use std::path::PathBuf;

use billscan_core::BillscanConfig;
use tracing::debug;

/// Where the active configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    Explicit(PathBuf),
    /// Found at [`default_config_path`].
    UserFile(PathBuf),
    /// No file; compiled-in defaults.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::UserFile(path) => {
                write!(f, "{}", path.display())
            }
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// `<config dir>/billscan/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
        .join("config.json")
}

/// Load configuration from an explicit path, the default location, or defaults.
pub fn resolve_config(path: Option<&str>) -> anyhow::Result<(BillscanConfig, ConfigSource)> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        let config = BillscanConfig::from_file(&path)?;
        return Ok((config, ConfigSource::Explicit(path)));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        let config = BillscanConfig::from_file(&default_path)?;
        Ok((config, ConfigSource::UserFile(default_path)))
    } else {
        Ok((BillscanConfig::default(), ConfigSource::Defaults))
    }
}

pub fn load_config(path: Option<&str>) -> anyhow::Result<BillscanConfig> {
    Ok(resolve_config(path)?.0)
}
