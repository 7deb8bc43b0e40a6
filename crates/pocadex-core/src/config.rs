use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PocadexError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Collection owner used when a command does not name one.
    pub default_user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Prefix for catalog image URLs. `None` stores the file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user: "me".into(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            image_base_url: None,
            recursive: true,
        }
    }
}

impl AppConfig {
    /// Load config: user file (if exists) over built-in defaults.
    pub fn load() -> Result<Self, PocadexError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path, falling back to defaults when it is missing.
    /// Sections and keys absent from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, PocadexError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let user_str =
            std::fs::read_to_string(path).map_err(|e| PocadexError::Config(e.to_string()))?;
        toml::from_str(&user_str).map_err(|e| PocadexError::Config(e.to_string()))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("pocadex.db"))
            .unwrap_or_else(|| PathBuf::from("pocadex.db"))
    }

    /// Ensure the parent directory of `path` exists.
    pub fn ensure_parent(path: &Path) -> Result<(), PocadexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "pocadex")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.general.default_user, "me");
        assert!(config.import.recursive);
        assert!(config.import.image_base_url.is_none());
    }

    #[test]
    fn test_builtin_file_matches_section_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.general.default_user, GeneralConfig::default().default_user);
        assert_eq!(config.import.recursive, ImportConfig::default().recursive);
    }

    #[test]
    fn test_partial_user_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[import]\nimage_base_url = \"https://cdn.example.com/cards\"\n")
            .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            config.import.image_base_url.as_deref(),
            Some("https://cdn.example.com/cards")
        );
        assert!(config.import.recursive);
        assert_eq!(config.general.default_user, "me");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.general.default_user, "me");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\n").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(PocadexError::Config(_))));
    }
}
