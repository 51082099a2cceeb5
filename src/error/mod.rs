//! Error handling module for export operations.
//!
//! This module provides the error types used across the crate:
//! - Export errors raised while projecting records or rendering artifacts
//! - Configuration errors raised while loading or validating settings
//! - A crate-wide `Result` alias
//!
//! # Example
//!
//! ```rust
//! use recexport::error::{ExportError, RecexportError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ExportError::InvalidColumns("no columns declared".to_string()).into())
//! }
//!
//! let err = example_operation().unwrap_err();
//! assert!(matches!(err, RecexportError::Export(_)));
//! ```

pub mod kinds;

pub use kinds::{ConfigError, ExportError, RecexportError, Result};
