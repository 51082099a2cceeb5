//! Column projection model
//!
//! A [`ColumnSpec`] pairs a display header with an [`Accessor`] that maps a
//! record to exactly one [`CellValue`]. The fallback for missing fields lives
//! here and nowhere else, so the document and workbook paths cannot diverge.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ExportError;

/// An opaque business record (invoice, ticket, client...).
///
/// The engine only ever looks at the keys an accessor asks for.
pub type Record = Value;

/// Signature of a computed accessor.
///
/// Returning `Err` is a caller defect and aborts the export.
pub type ComputeFn = dyn Fn(&Record) -> Result<CellValue, String> + Send + Sync;

/// A renderer-safe scalar produced by projecting one record through one column
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain or pre-formatted text (dates are formatted before they get here)
    Text(String),
    /// Numeric value, written as a number cell in workbooks
    Number(f64),
}

impl CellValue {
    /// The empty-string cell used for absent and null fields
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// Whether this cell renders as an empty string
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

/// How a column reads its value off a record
#[derive(Clone)]
pub enum Accessor {
    /// Read a top-level property by key
    Field(String),
    /// Derive the value with a pure projection function
    Computed(Arc<ComputeFn>),
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Accessor::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// A single export column: header label plus accessor
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Header label, written verbatim in both output formats
    pub header: String,
    /// Value accessor
    pub accessor: Accessor,
}

impl ColumnSpec {
    /// Column reading the top-level field `key`
    pub fn field(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: Accessor::Field(key.into()),
        }
    }

    /// Column computed by an infallible projection
    pub fn computed<F, V>(header: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        Self {
            header: header.into(),
            accessor: Accessor::Computed(Arc::new(move |record| Ok(f(record).into()))),
        }
    }

    /// Column computed by a projection that may fail
    pub fn try_computed<F>(header: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<CellValue, String> + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            accessor: Accessor::Computed(Arc::new(f)),
        }
    }

    /// Project one record through this column.
    ///
    /// `row` is only used to locate a failing accessor in the error.
    pub fn project(&self, record: &Record, row: usize) -> Result<CellValue, ExportError> {
        match &self.accessor {
            Accessor::Field(key) => Ok(field_value(record, key)),
            Accessor::Computed(f) => f(record).map_err(|message| ExportError::Accessor {
                column: self.header.clone(),
                row,
                message,
            }),
        }
    }
}

/// Read `key` off `record`, applying the empty-string fallback.
pub fn field_value(record: &Record, key: &str) -> CellValue {
    record
        .get(key)
        .map(json_to_cell)
        .unwrap_or_default()
}

/// Convert a JSON value into a cell.
///
/// `null` becomes the empty string; nested arrays and objects are kept as
/// compact JSON text.
pub fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::empty(),
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_is_empty_string() {
        let column = ColumnSpec::field("Num", "invoice_number");
        let cell = column.project(&json!({ "amount": 12 }), 0).unwrap();
        assert_eq!(cell, CellValue::Text(String::new()));
        assert_ne!(cell.to_string(), "null");
        assert_ne!(cell.to_string(), "undefined");
    }

    #[test]
    fn test_null_field_is_empty_string() {
        let column = ColumnSpec::field("Client", "client");
        let cell = column.project(&json!({ "client": null }), 0).unwrap();
        assert!(cell.is_empty());
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        let column = ColumnSpec::field("Num", "invoice_number");
        assert!(column.project(&json!("INV-1"), 0).unwrap().is_empty());
        assert!(column.project(&json!(null), 0).unwrap().is_empty());
    }

    #[test]
    fn test_field_types() {
        let record = json!({
            "text": "Acme",
            "amount": 1250.5,
            "count": 3,
            "paid": true,
            "tags": ["a", "b"],
        });
        assert_eq!(field_value(&record, "text"), CellValue::from("Acme"));
        assert_eq!(field_value(&record, "amount"), CellValue::Number(1250.5));
        assert_eq!(field_value(&record, "count"), CellValue::Number(3.0));
        assert_eq!(field_value(&record, "paid"), CellValue::from("true"));
        assert_eq!(field_value(&record, "tags"), CellValue::from(r#"["a","b"]"#));
    }

    #[test]
    fn test_computed_takes_precedence_over_field() {
        let column = ColumnSpec::computed("status", |_: &Record| "computed");
        let cell = column
            .project(&json!({ "status": "from-field" }), 0)
            .unwrap();
        assert_eq!(cell, CellValue::from("computed"));
    }

    #[test]
    fn test_computed_value_used_verbatim() {
        let column = ColumnSpec::computed("Label", |_: &Record| "null");
        assert_eq!(column.project(&json!({}), 0).unwrap().to_string(), "null");
    }

    #[test]
    fn test_failing_accessor_propagates() {
        let column = ColumnSpec::try_computed("Client", |_| Err("no client".to_string()));
        let err = column.project(&json!({}), 7).unwrap_err();
        match err {
            ExportError::Accessor {
                column, row, message,
            } => {
                assert_eq!(column, "Client");
                assert_eq!(row, 7);
                assert_eq!(message, "no client");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(1500.0).to_string(), "1500");
        assert_eq!(CellValue::Number(-2.0).to_string(), "-2");
        assert_eq!(CellValue::Number(12.75).to_string(), "12.75");
    }
}
