//! User settings loaded from TOML.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Directory that relative save/load paths resolve against.
    #[serde(default = "default_save_dir")]
    save_dir: PathBuf,

    /// File the tracing subscriber writes to.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_save_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictactoe.log")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            log_file: default_log_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file, falling back to defaults if the
    /// file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!(save_dir = %settings.save_dir.display(), "Settings loaded");
        Ok(settings)
    }

    /// Parses settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))
    }

    /// Replaces the save directory.
    pub fn with_save_dir(mut self, save_dir: PathBuf) -> Self {
        self.save_dir = save_dir;
        self
    }

    /// Replaces the log file.
    pub fn with_log_file(mut self, log_file: PathBuf) -> Self {
        self.log_file = log_file;
        self
    }

    /// Resolves a user-entered path against the save directory.
    pub fn resolve(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.save_dir.join(path)
        }
    }
}

/// Settings error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_existing_file_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tictactoe.toml");
        std::fs::write(
            &path,
            "save_dir = \"/games\"\nlog_file = \"play.log\"\nlog_filter = \"debug\"\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.save_dir(), Path::new("/games"));
        assert_eq!(settings.log_file(), Path::new("play.log"));
        assert_eq!(settings.log_filter(), "debug");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tictactoe.toml");
        std::fs::write(&path, "save_dir = [").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(err.message.starts_with("Failed to parse settings"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings = Settings::from_toml("save_dir = \"/tmp/games\"\n").unwrap();
        assert_eq!(settings.save_dir(), Path::new("/tmp/games"));
        assert_eq!(settings.log_filter(), "info");
        assert_eq!(settings.log_file(), Path::new("tictactoe.log"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = Settings::from_toml("save_dir = [").unwrap_err();
        assert!(err.message.starts_with("Failed to parse settings"));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let settings = Settings::default().with_save_dir(PathBuf::from("/saves"));
        assert_eq!(settings.resolve("game.json"), PathBuf::from("/saves/game.json"));
        assert_eq!(
            settings.resolve("/elsewhere/game.json"),
            PathBuf::from("/elsewhere/game.json")
        );
    }
}
