use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters allowed in the exported file name prefix
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("static regex"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Header shown above the form and used as the PDF title
    pub title: String,
    /// Exported files are named `{file_prefix}_{start}_to_{end}.pdf`
    pub file_prefix: String,
    /// Where exports are written; empty means the working directory
    pub output_dir: String,
    /// trace, debug, info, warn or error
    pub log_level: String,
    /// Fill grid rows from the right edge
    pub right_to_left: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "MEG GYM".to_string(),
            file_prefix: "MEG_GYM_Barcodes".to_string(),
            output_dir: String::new(),
            log_level: "info".to_string(),
            right_to_left: false,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".barcode-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Read a config file. `Ok(None)` means there is no file yet.
    fn load_from(path: &Path) -> Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    fn from_json(contents: &str) -> Result<Config> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load the saved config, or write the defaults on first start.
    ///
    /// A config file that exists but cannot be read is left untouched and
    /// the defaults are used for this session. The returned error describes
    /// whatever went wrong so it can be logged once logging is up.
    pub fn load_or_create() -> (Config, Option<anyhow::Error>) {
        match Self::config_path() {
            Some(path) => Self::load_or_create_at(&path),
            None => (
                Config::default(),
                Some(anyhow!("Could not determine config directory")),
            ),
        }
    }

    fn load_or_create_at(path: &Path) -> (Config, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(Some(config)) => (config, None),
            Ok(None) => {
                let config = Config::default();
                let err = config
                    .save_to(path)
                    .with_context(|| format!("Failed to write default config to {}", path.display()))
                    .err();
                (config, err)
            }
            Err(err) => (Config::default(), Some(err)),
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Export directory, falling back to the working directory
    pub fn output_dir(&self) -> PathBuf {
        if self.output_dir.trim().is_empty() {
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            PathBuf::from(self.output_dir.trim())
        }
    }

    /// File prefix with anything unsafe for a file name replaced by `_`
    pub fn file_prefix(&self) -> String {
        let cleaned = UNSAFE_FILE_CHARS
            .replace_all(self.file_prefix.trim(), "_")
            .to_string();
        if cleaned.is_empty() {
            Config::default().file_prefix
        } else {
            cleaned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json(r#"{ "title": "Downtown Gym" }"#).unwrap();
        assert_eq!(config.title, "Downtown Gym");
        assert_eq!(config.file_prefix, "MEG_GYM_Barcodes");
        assert!(!config.right_to_left);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn test_file_prefix_sanitised() {
        let config = Config {
            file_prefix: "MEG GYM/Front Desk".to_string(),
            ..Config::default()
        };
        assert_eq!(config.file_prefix(), "MEG_GYM_Front_Desk");
    }

    #[test]
    fn test_blank_file_prefix_falls_back() {
        let config = Config {
            file_prefix: "   ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.file_prefix(), "MEG_GYM_Barcodes");
    }

    #[test]
    fn test_output_dir() {
        let config = Config {
            output_dir: "/srv/labels ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.output_dir(), PathBuf::from("/srv/labels"));
    }

    #[test]
    fn test_round_trip_json() {
        let config = Config {
            right_to_left: true,
            ..Config::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_first_start_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".barcode-tui").join("config.json");

        let (config, err) = Config::load_or_create_at(&path);
        assert!(err.is_none());
        assert_eq!(config, Config::default());

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved, Some(Config::default()));
    }

    #[test]
    fn test_broken_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let broken = r#"{ "title": "Downtown Gym", "output_dir": "/srv/labels", }"#;
        fs::write(&path, broken).unwrap();

        let (config, err) = Config::load_or_create_at(&path);
        assert_eq!(config, Config::default());
        let err = err.expect("broken config should be reported");
        assert!(format!("{:#}", err).contains("Invalid config"));

        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_saved_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            title: "Downtown Gym".to_string(),
            output_dir: "/srv/labels".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let (loaded, err) = Config::load_or_create_at(&path);
        assert!(err.is_none());
        assert_eq!(loaded, config);
    }
}
