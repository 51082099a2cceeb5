//! Record Export Library
//!
//! This library renders in-memory datasets of business records (invoices,
//! opportunities, tickets...) into paginated PDF documents and XLSX workbooks.
//! Both formats are driven by the same ordered column specification and
//! always agree on column order, cell values and missing-field handling.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `export`: Column model, projection, renderers and orchestration
//! - `formatter`: Terminal previews and notices
//! - `presets`: Built-in invoice and opportunity column sets
//!
//! # Example
//!
//! ```
//! use recexport::export::{ExportFormat, ExportOutcome, ExportRequest, Exporter};
//! use recexport::presets;
//! use serde_json::json;
//!
//! let invoices = vec![json!({
//!     "invoice_number": "FAC-2024-001",
//!     "amount": 1500,
//!     "status": "paid",
//!     "issue_date": "2024-03-05",
//!     "clients": { "name": "Atlas SARL" },
//! })];
//! let columns = presets::invoice_columns();
//! let request = ExportRequest::new(&invoices, &columns, "Liste des Factures", "factures");
//!
//! match Exporter::default().export(&request, ExportFormat::Document) {
//!     ExportOutcome::Success(artifact) => assert_eq!(artifact.filename, "factures.pdf"),
//!     other => panic!("export failed: {other:?}"),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod formatter;
pub mod presets;

// Re-export commonly used types
pub use config::Config;
pub use error::{RecexportError, Result};
pub use export::{ColumnSpec, ExportFormat, ExportOutcome, ExportRequest, Exporter};
pub use formatter::Formatter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
