//! Settings file loading
//!
//! Settings are read from a TOML file. Every section is optional:
//!
//! ```toml
//! [database]
//! path = "/var/lib/cinema/cinema.db"
//!
//! [logging]
//! filter = "info,cinema_core=debug"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// File name of the database inside the platform data directory
pub const DATABASE_FILE: &str = "cinema.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Overrides the platform data directory location
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Settings {
    /// Load settings from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings directly from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve where the database lives
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DATABASE_FILE)),
        }
    }
}

/// Platform data directory for the cinema database
pub fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "cinema", "cinema").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })?;

    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.filter, "info");
        assert!(settings.database.path.is_none());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml = r#"
[database]
path = "/tmp/cinema-test.db"

[logging]
filter = "debug"
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(
            settings.database_path().unwrap(),
            PathBuf::from("/tmp/cinema-test.db")
        );
        assert_eq!(settings.logging.filter, "debug");
    }

    #[test]
    fn test_malformed_settings() {
        assert!(matches!(
            Settings::from_toml("[database\npath = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinema.toml");
        std::fs::write(&path, "[logging]\nfilter = \"warn\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.logging.filter, "warn");
    }
}
