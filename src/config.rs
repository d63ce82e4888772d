//! User configuration, read from `config.toml` in the platform config directory.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "article-flashcards";
const DB_ENV_VAR: &str = "FLASHCARDS_DB";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub database_path: PathBuf,
    pub export_format: ExportFormat,
    /// env_logger filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            export_format: ExportFormat::default(),
            log_level: "warn".to_string(),
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashcards.sqlite3")
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl Config {
    /// Reads the config file at `path`, or the default location when `None`.
    /// Only the default location may be missing, in which case the defaults apply.
    /// `FLASHCARDS_DB` overrides the database path.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(db) = std::env::var_os(DB_ENV_VAR) {
            config.database_path = PathBuf::from(db);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("export_format = \"json\"\n").unwrap();
        assert_eq!(config.export_format, ExportFormat::Json);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.database_path, Config::default().database_path);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            "database_path = \"/tmp/cards.sqlite3\"\nexport_format = \"csv\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.sqlite3"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "export_format = \"xml\"").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "export_format = \"json\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.export_format, ExportFormat::Json);
    }
}
