//! Configuration for the wolfes-cg tool
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (wolfes_cg.toml)
//! - Environment variables (WOLFES_CG__*)
//!
//! ## Example config file (wolfes_cg.toml):
//! ```toml
//! [logging]
//! level = "info"
//! log_dir = "~/tmp"
//! log_to_file = true
//!
//! [output]
//! dir = "./generated"
//! format = "pretty"
//! ```
//!
//! This configures the tool, not the compiled documents: the supported
//! document versions are fixed in [`crate::version::SUPPORTED_VERSIONS`].

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for the log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Also write logs to `<log_dir>/wolfes_cg.log`
    #[serde(default)]
    pub log_to_file: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated files when --output is not given
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Format for IR dumps
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn to_json<T: Serialize>(self, value: &T) -> serde_json::Result<String> {
        match self {
            Self::Pretty => serde_json::to_string_pretty(value),
            Self::Compact => serde_json::to_string(value),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
            log_to_file: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: OutputFormat::Pretty,
        }
    }
}

impl ToolConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding `config_path` as a required source
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["wolfes_cg.toml", ".wolfes_cg.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("org", "wolfes", "wolfes_cg") {
            let xdg_config = dirs.config_dir().join("wolfes_cg.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("WOLFES_CG")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Log file path, when file logging is enabled
    pub fn log_file(&self) -> Option<PathBuf> {
        if !self.logging.log_to_file {
            return None;
        }
        let dir = match &self.logging.log_dir {
            Some(dir) => dir.clone(),
            None => directories::BaseDirs::new()?.home_dir().join("tmp"),
        };
        Some(dir.join("wolfes_cg.log"))
    }
}
