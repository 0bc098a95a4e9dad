//! Greenwave configuration.
//!
//! Loaded from `<root>/config.toml`. A missing file is a valid empty
//! configuration; an unreadable or invalid one is an error.

use std::{fs, io, path::Path};

use serde::Deserialize;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Prefill for the map credential form.
    /// The form still has to be submitted interactively.
    pub map_api_key: Option<String>,
}

impl Config {
    /// Loads config from `<root>/config.toml`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join("config.toml");
        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.map_api_key.is_none());
    }

    #[test]
    fn map_api_key_is_read() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "map-api-key = \"abc123\"\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.map_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "map-api-key = [").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
