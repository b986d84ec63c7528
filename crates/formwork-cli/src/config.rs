//! Configuration management for the CLI
//!
//! Configuration comes from, in order of precedence:
//! - Command-line arguments
//! - An explicit `--config` file, or the first default location found
//! - Default values

use crate::cli::RenderFormat;
use crate::error::{Error, Result};
use formwork_schemas::ValidationMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for `namespace/name` document identifiers
    pub schemas_dir: Option<PathBuf>,

    /// Validation settings
    pub validation: ValidationSettings,

    /// Render settings
    pub render: RenderSettings,

    /// Logging settings
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Default validation mode
    pub mode: ValidationMode,

    /// Seconds to wait for a document to load
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Default rendered form format
    pub format: RenderFormat,
}

/// Logging configuration from the config file.
///
/// Unset values fall back to the verbosity flags; `RUST_LOG` and
/// `FORMWORK_LOG_FORMAT` override both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Shallow,
            timeout_secs: 10,
        }
    }
}

impl ValidationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".formwork.yaml"),
            PathBuf::from(".formwork.json"),
            PathBuf::from("formwork.yaml"),
            PathBuf::from("formwork.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let formwork_dir = config_dir.join("formwork");
            paths.push(formwork_dir.join("config.yaml"));
            paths.push(formwork_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".formwork.yaml"));
            paths.push(home_dir.join(".formwork.json"));
        }

        paths
    }

    /// Directory that `namespace/name` identifiers resolve against
    pub fn schemas_root(&self) -> PathBuf {
        self.schemas_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("schemas"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.mode, ValidationMode::Shallow);
        assert_eq!(config.validation.timeout(), Duration::from_secs(10));
        assert_eq!(config.render.format, RenderFormat::Html);
        assert_eq!(config.schemas_root(), PathBuf::from("schemas"));
    }

    #[test]
    fn test_partial_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("formwork.yaml");
        fs::write(
            &path,
            "schemas_dir: /srv/forms\nvalidation:\n  mode: deep\nlogging:\n  format: json\n",
        )
        .unwrap();

        let config = Config::load_with_file(Some(&path)).unwrap();
        assert_eq!(config.schemas_root(), PathBuf::from("/srv/forms"));
        assert_eq!(config.validation.mode, ValidationMode::Deep);
        assert_eq!(config.validation.timeout_secs, 10);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("formwork.json");
        fs::write(&path, r#"{"render": {"format": "json"}, "validation": {"timeout_secs": 2}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.render.format, RenderFormat::Json);
        assert_eq!(config.validation.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(Error::FileNotFound { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Config::from_file(&bad), Err(Error::Config(_))));
    }
}
