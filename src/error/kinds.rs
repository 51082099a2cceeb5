use std::{fmt, io};

/// Crate-wide `Result` type using [`RecexportError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, RecexportError>;

/// Top-level error type for recexport operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum RecexportError {
    /// Projection or rendering errors.
    Export(ExportError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON decoding errors (record datasets).
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Export-specific errors.
#[derive(Debug)]
pub enum ExportError {
    /// A computed accessor failed while projecting a cell.
    Accessor {
        column: String,
        row: usize,
        message: String,
    },

    /// The artifact back-end failed to build the output.
    Render { format: String, message: String },

    /// The column specification cannot be used.
    InvalidColumns(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for RecexportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecexportError::Export(e) => write!(f, "Export error: {e}"),
            RecexportError::Config(e) => write!(f, "Configuration error: {e}"),
            RecexportError::Io(e) => write!(f, "I/O error: {e}"),
            RecexportError::Json(e) => write!(f, "Invalid JSON: {e}"),
            RecexportError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Accessor {
                column,
                row,
                message,
            } => write!(f, "column '{column}' failed on record #{row}: {message}"),
            ExportError::Render { format, message } => {
                write!(f, "failed to render {format}: {message}")
            }
            ExportError::InvalidColumns(msg) => write!(f, "invalid columns: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RecexportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecexportError::Export(e) => Some(e),
            RecexportError::Config(e) => Some(e),
            RecexportError::Io(e) => Some(e),
            RecexportError::Json(e) => Some(e),
            RecexportError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ExportError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to RecexportError ========================= */

impl From<io::Error> for RecexportError {
    fn from(err: io::Error) -> Self {
        RecexportError::Io(err)
    }
}

impl From<serde_json::Error> for RecexportError {
    fn from(err: serde_json::Error) -> Self {
        RecexportError::Json(err)
    }
}

impl From<ExportError> for RecexportError {
    fn from(err: ExportError) -> Self {
        RecexportError::Export(err)
    }
}

impl From<ConfigError> for RecexportError {
    fn from(err: ConfigError) -> Self {
        RecexportError::Config(err)
    }
}

impl From<String> for RecexportError {
    fn from(msg: String) -> Self {
        RecexportError::Generic(msg)
    }
}

impl From<&str> for RecexportError {
    fn from(msg: &str) -> Self {
        RecexportError::Generic(msg.to_owned())
    }
}
