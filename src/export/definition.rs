//! Declarative column definitions
//!
//! Column sets can be described in TOML and compiled into [`ColumnSpec`]s:
//!
//! ```toml
//! title = "Liste des Factures"
//! filename = "factures"
//!
//! [[columns]]
//! header = "Numéro"
//! field = "invoice_number"
//!
//! [[columns]]
//! header = "Client"
//! path = "clients.name"
//!
//! [[columns]]
//! header = "Date d'émission"
//! date = "issue_date"
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ExportError, Result};

use super::column::{CellValue, ColumnSpec, Record, json_to_cell};

/// Day-first date layout used in every exported date
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One column as written in a definition file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    pub header: String,
    /// Top-level key, read with the standard empty-string fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Dotted path into nested objects, e.g. `clients.name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Key holding an ISO date, rendered as `DD/MM/YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Value used when a `path` or `date` column finds nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl ColumnDef {
    /// Compile into a column spec.
    ///
    /// Exactly one of `field`, `path` or `date` must be set.
    pub fn compile(&self) -> Result<ColumnSpec> {
        if self.header.is_empty() {
            return Err(ExportError::InvalidColumns("column header is empty".to_string()).into());
        }

        let fallback = self.fallback.clone().unwrap_or_default();
        match (&self.field, &self.path, &self.date) {
            (Some(key), None, None) => {
                if self.fallback.is_some() {
                    return Err(ExportError::InvalidColumns(format!(
                        "column '{}': fallback only applies to path and date columns",
                        self.header
                    ))
                    .into());
                }
                Ok(ColumnSpec::field(&self.header, key))
            }
            (None, Some(path), None) => Ok(path_column(&self.header, path, &fallback)),
            (None, None, Some(key)) => Ok(date_column(&self.header, key, &fallback)),
            _ => Err(ExportError::InvalidColumns(format!(
                "column '{}' must set exactly one of field, path or date",
                self.header
            ))
            .into()),
        }
    }
}

/// A definition file: optional export metadata plus ordered columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl ColumnFile {
    /// Parse a definition from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load a definition file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Compile every column, keeping declaration order
    pub fn compile(&self) -> Result<Vec<ColumnSpec>> {
        if self.columns.is_empty() {
            return Err(ExportError::InvalidColumns("no columns declared".to_string()).into());
        }
        self.columns.iter().map(ColumnDef::compile).collect()
    }
}

/// Column reading a dotted path, `fallback` when absent or null
pub fn path_column(header: &str, path: &str, fallback: &str) -> ColumnSpec {
    let path = path.to_string();
    let fallback = fallback.to_string();
    ColumnSpec::computed(header, move |record: &Record| {
        match lookup_path(record, &path) {
            Some(value) if !value.is_null() => json_to_cell(value),
            _ => CellValue::from(fallback.as_str()),
        }
    })
}

/// Column formatting the date stored under `key`, `fallback` when absent
/// or unparseable
pub fn date_column(header: &str, key: &str, fallback: &str) -> ColumnSpec {
    let key = key.to_string();
    let fallback = fallback.to_string();
    ColumnSpec::computed(header, move |record: &Record| {
        record
            .get(&key)
            .and_then(format_date)
            .unwrap_or_else(|| fallback.clone())
    })
}

/// Follow a dotted path through nested objects
pub fn lookup_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |value, segment| value.get(segment))
}

/// Format an ISO date or date-time string as `DD/MM/YYYY`.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive timestamps with a `T`
/// or space separator. Anything else yields `None`.
pub fn format_date(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    parse_date(text).map(|date| date.format(DATE_FORMAT).to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|datetime| datetime.date())
}
