use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Presentation settings for standalone HTML pages. The converted fragment
/// itself is never affected by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub links: LinksConfig,
    pub font: FontConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub standalone: bool,
    pub title: Option<String>,
    pub max_width: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: None,
            max_width: "42rem".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#1a4f8b".to_string(),
            underline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct FontConfig {
    pub sans: bool,
}

impl Config {
    /// The configuration bundled with the crate (`src/default_config.toml`).
    pub fn compiled_default() -> Self {
        // build.rs rejects an unparsable default file.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled defaults if it
    /// is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::compiled_default()
            }
            Err(err) => {
                warn!("{err}; using defaults");
                Self::compiled_default()
            }
        }
    }

    /// Load config from a TOML file, failing if it can't be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn compiled_default_matches_struct_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("[links]\ncolor = \"red\"\n");
        let config = Config::from_path(file.path()).unwrap();

        assert_eq!(config.links.color, "red");
        assert!(config.links.underline);
        assert_eq!(config.document, DocumentConfig::default());
    }

    #[test]
    fn full_file() {
        let file = write_config(
            "[document]\nstandalone = true\ntitle = \"Bio\"\nmax_width = \"30em\"\n\n\
             [links]\nunderline = false\n\n[font]\nsans = true\n",
        );
        let config = Config::from_path(file.path()).unwrap();

        assert!(config.document.standalone);
        assert_eq!(config.document.title.as_deref(), Some("Bio"));
        assert_eq!(config.document.max_width, "30em");
        assert!(!config.links.underline);
        assert!(config.font.sans);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let file = write_config("[links\ncolor = ");
        let err = Config::from_path(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse config file at"));
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load(&dir.path().join("missing.toml")),
            Config::compiled_default()
        );

        let file = write_config("font = 3");
        assert_eq!(Config::load(file.path()), Config::compiled_default());
    }
}
