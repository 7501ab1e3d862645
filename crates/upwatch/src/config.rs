use std::{env, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available")]
    PathUnavailable,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: Database,
    pub monitor: Monitor,
    pub server: Server,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    /// Path of the local libsql database file.
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    /// Scheduling tick cadence. Must stay well below the minimum supported
    /// per-target interval (30s) to keep scheduling error bounded.
    pub tick_seconds: u64,
    /// Optional outbound probe timeout. None leaves the network stack's own
    /// limits in place; operators may tighten this.
    pub timeout_seconds: Option<u64>,
    /// How often the probe-origin location label is refreshed.
    pub location_refresh_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Database {
    fn default() -> Self {
        Self { path: "upwatch.db".into() }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self { tick_seconds: 5, timeout_seconds: None, location_refresh_seconds: 3600 }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8080 }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/upwatch/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::PathUnavailable);
    };

    Ok(path.join("upwatch/config.toml"))
}

impl Config {
    /// Generate a Config from file, creating a default config at the
    /// resolved path when none exists yet.
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }

        fs::write(path, config_str).map_err(ConfigError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.monitor.tick_seconds, 5);
        assert_eq!(config.monitor.timeout_seconds, None);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::from_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.monitor.tick_seconds, 5);

        // A second load reads the file that was just written.
        let reloaded = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reloaded.database.path, config.database.path);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[monitor]\ntick_seconds = 2\n").unwrap();

        let config = Config::from_config(Some(&path)).unwrap();
        assert_eq!(config.monitor.tick_seconds, 2);
        assert_eq!(config.server.port, 8080);
    }
}
