//! Configuration management for recexport
//!
//! This module handles loading, parsing, and validating configuration:
//! - Configuration files (TOML format)
//! - Command-line overrides, applied by the CLI after loading
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::export::{DocumentStyle, WorkbookOptions};

/// Characters Excel refuses in sheet names
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Longest sheet name Excel accepts
const MAX_SHEET_NAME_LEN: usize = 31;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// PDF document styling
    #[serde(default)]
    pub document: DocumentStyle,

    /// XLSX workbook settings
    #[serde(default)]
    pub workbook: WorkbookOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Where and how artifacts and messages are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory exported files are written to
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

// Default value functions
fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_color_output() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            color_output: default_color_output(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from an explicit path or the default location
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the default configuration. Values are not validated here, see
    /// [`validate`](Self::validate).
    ///
    /// # Arguments
    /// * `path` - Optional configuration file given on the command line
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!(
                        "No config file at {}, using defaults",
                        default_path.display()
                    );
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.recexport/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".recexport")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Generic(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, the first invalid field otherwise
    pub fn validate(&self) -> Result<()> {
        let doc = &self.document;

        let positive = [
            ("document.page_width_mm", doc.page_width_mm),
            ("document.page_height_mm", doc.page_height_mm),
            ("document.title_font_size", doc.title_font_size),
            ("document.timestamp_font_size", doc.timestamp_font_size),
            ("document.font_size", doc.font_size),
            ("document.line_height_factor", doc.line_height_factor),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(field, value));
            }
        }

        if doc.margin_mm < 0.0 || doc.content_width_mm() <= 0.0 {
            return Err(invalid("document.margin_mm", doc.margin_mm));
        }
        if doc.cell_padding_mm < 0.0 {
            return Err(invalid("document.cell_padding_mm", doc.cell_padding_mm));
        }
        if doc.table_top_mm < 0.0 || doc.table_top_mm >= doc.page_height_mm - doc.margin_mm {
            return Err(invalid("document.table_top_mm", doc.table_top_mm));
        }

        validate_sheet_name(&self.workbook.sheet_name)?;
        if self.workbook.min_column_width == 0 {
            return Err(invalid("workbook.min_column_width", 0));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> crate::error::RecexportError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Check a worksheet name against Excel's rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty()
        || name.chars().count() > MAX_SHEET_NAME_LEN
        || name.contains(FORBIDDEN_SHEET_CHARS)
    {
        return Err(invalid("workbook.sheet_name", name));
    }
    Ok(())
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workbook.sheet_name, "Data");
        assert_eq!(config.workbook.min_column_width, 15);
        assert_eq!(config.document.header_fill, [59, 130, 246]);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.output.color_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [workbook]
            sheet_name = "Factures"

            [document]
            font_size = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(config.workbook.sheet_name, "Factures");
        assert_eq!(config.workbook.min_column_width, 15);
        assert_eq!(config.document.font_size, 8.0);
        assert_eq!(config.document.title_font_size, 18.0);
        assert_eq!(config.output.directory, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[workbook\nsheet_name = 1").unwrap_err();
        assert!(err.to_string().contains("Invalid config format"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.logging.level = LogLevel::Debug;
        config.document.stripe_fill = Some([200, 200, 200]);
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(Some(path.as_path())).unwrap();
        assert_eq!(loaded.logging.level, LogLevel::Debug);
        assert_eq!(loaded.document.stripe_fill, Some([200, 200, 200]));
        assert_eq!(loaded.workbook, config.workbook);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_file(Some(dir.path().join("missing.toml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Data").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("   ").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("[x]").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_document() {
        let mut config = Config::default();
        config.document.font_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.document.table_top_mm = 400.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.document.margin_mm = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let mut config = Config::default();
        config.workbook.min_column_width = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("workbook.min_column_width"));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
