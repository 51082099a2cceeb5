//! Record export engine
//!
//! Renders an in-memory dataset of business records through an ordered column
//! specification into either a paginated PDF document or an XLSX workbook.
//! Both formats consume the same [`ProjectedMatrix`], so they always agree on
//! column order, cell values and the missing-field fallback.
//!
//! # Example
//!
//! ```
//! use recexport::export::{ColumnSpec, ExportFormat, ExportRequest, Exporter};
//! use serde_json::json;
//!
//! let dataset = vec![json!({ "invoice_number": "INV-1", "amount": 1200 })];
//! let columns = vec![
//!     ColumnSpec::field("Numéro", "invoice_number"),
//!     ColumnSpec::field("Montant (MAD)", "amount"),
//! ];
//! let request = ExportRequest::new(&dataset, &columns, "Liste des Factures", "factures");
//!
//! let outcome = Exporter::default().export(&request, ExportFormat::Workbook);
//! assert_eq!(outcome.artifact().unwrap().filename, "factures.xlsx");
//! ```

pub mod column;
pub mod definition;
pub mod document;
pub mod orchestrator;
pub mod projector;
pub mod workbook;


pub use column::{Accessor, CellValue, ColumnSpec, Record};
pub use definition::{ColumnDef, ColumnFile};
pub use document::{DocumentRenderer, DocumentStyle};
pub use orchestrator::{
    ExportArtifact, ExportFormat, ExportOutcome, ExportRequest, ExportState, Exporter, Notice,
    NoticeLevel,
};
pub use projector::{ProjectedMatrix, project};
pub use workbook::{WorkbookOptions, WorkbookRenderer};
