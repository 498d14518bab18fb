use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use derive_more::{Display, Error};
use log::LevelFilter;
use serde::Deserialize;
use pasint_core::language::InterpreterConfig;

pub const DEFAULT_CONFIG_FILE: &str = "pasint.toml";

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[display("failed to parse config file: {_0}")]
    Parse(toml::de::Error),
    #[display("unknown log level '{level}'")]
    Level { level: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub console_level: String,
    pub file_level: String,
    /// No file logging when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            console_level: "warn".to_string(),
            file_level: "debug".to_string(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Console filter after applying `-v` flags: one raises it to debug,
    /// two or more to trace. Never lowers the configured level.
    pub fn console_filter(&self, verbose: u8) -> Result<LevelFilter, ConfigError> {
        let configured = parse_level(&self.console_level)?;
        let requested = match verbose {
            0 => LevelFilter::Off,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Ok(configured.max(requested))
    }

    pub fn file_filter(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.file_level)
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(level).map_err(|_| ConfigError::Level { level: level.to_string() })
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    toml::de::from_str(content).map_err(ConfigError::Parse)
}

/// Loads `path`, or `pasint.toml` from the working directory when no path is
/// given. A missing default file yields the defaults; a missing explicit file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !explicit && !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    parse_config(&content)
}
