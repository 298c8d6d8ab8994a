//! Logging setup
//!
//! The terminal belongs to the TUI, so log records go to a file under the
//! config directory instead of stderr.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Overrides the configured level when set
pub const LOG_ENV_VAR: &str = "BARCODE_TUI_LOG";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub file_path: Option<PathBuf>,
    /// Include the module path in each record
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: None,
            module_path: false,
        }
    }
}

/// Map a level name to a filter; unknown names fall back to info
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

impl LogConfig {
    /// Build from the app config, honouring the environment override
    pub fn from_config(config: &Config) -> Self {
        let level = env::var(LOG_ENV_VAR)
            .map(|v| parse_level(&v))
            .unwrap_or_else(|_| parse_level(&config.log_level));

        Self {
            level,
            file_path: Config::config_dir().map(|dir| dir.join("barcode-tui.log")),
            module_path: level >= LevelFilter::Debug,
        }
    }
}

/// Initialize the global logger
///
/// Without a usable log file logging is switched off rather than written
/// over the TUI.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(config.level);

    let module_path = config.module_path;
    builder.format(move |buf, record| {
        let mut line = format!(
            "{} [{:5}] ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level()
        );
        if module_path {
            if let Some(path) = record.module_path() {
                line.push_str(&format!("{}: ", path));
            }
        }
        writeln!(buf, "{}{}", line, record.args())
    });

    match config.file_path {
        Some(ref path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder.try_init().context("Logger already initialized")?;
    log::debug!("Logging initialized with level: {:?}", config.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARNING "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::Info);
        assert!(config.file_path.is_none());
        assert!(!config.module_path);
    }
}
