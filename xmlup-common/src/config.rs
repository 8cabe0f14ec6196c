//! Bootstrap configuration loading and config file resolution
//!
//! Configuration is a small TOML file read once at startup:
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 5790
//! max_upload_bytes = 10485760
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key is optional. The file itself is located in this order:
//! 1. Command-line argument (highest priority)
//! 2. `XMLUP_CONFIG` environment variable
//! 3. Platform config file (`~/.config/xmlup/config.toml`, `/etc/xmlup/config.toml` on Linux)
//! 4. Compiled defaults (no file)
//!
//! A missing file never stops startup; an unreadable or malformed one does.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "XMLUP_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    /// HTTP bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload request, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5790
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content).map_err(Error::Config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// `host:port` for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: TomlConfig = toml::from_str(content).map_err(|e| format!("Invalid TOML: {}", e))?;

        if config.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if config.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        Ok(config)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// A file was requested but does not exist; defaults used
    MissingFile(PathBuf),
    /// No file requested or found; defaults used
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::MissingFile(path) => {
                write!(f, "compiled defaults ({} not found)", path.display())
            }
            ConfigSource::Defaults => f.write_str("compiled defaults"),
        }
    }
}

/// Configuration plus its origin, so the caller can log it once tracing is up
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Locates and loads the config file following the priority order above
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Path of the config file to use, if any
    ///
    /// CLI and environment paths are returned even when the file is missing
    /// so that the caller can report it.
    pub fn config_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config file
        platform_config_paths().into_iter().find(|path| path.exists())
    }

    /// Load the configuration, falling back to compiled defaults when no file exists
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        match self.config_path() {
            Some(path) if path.exists() => Ok(ResolvedConfig {
                config: TomlConfig::load(&path)?,
                source: ConfigSource::File(path),
            }),
            Some(path) => Ok(ResolvedConfig {
                config: TomlConfig::default(),
                source: ConfigSource::MissingFile(path),
            }),
            // Priority 4: Compiled defaults
            None => Ok(ResolvedConfig {
                config: TomlConfig::default(),
                source: ConfigSource::Defaults,
            }),
        }
    }
}

/// Candidate config files for the platform, most specific first
fn platform_config_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = dirs::config_dir()
        .map(|d| d.join("xmlup").join("config.toml"))
        .into_iter()
        .collect();

    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/xmlup/config.toml"));
    }

    paths
}
