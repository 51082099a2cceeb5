//! Export orchestrator
//!
//! The user-facing entry point: validates the request, projects the dataset
//! once, runs exactly one renderer and reports a single outcome.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::column::{ColumnSpec, Record};
use super::document::DocumentRenderer;
use super::projector::{self, ProjectedMatrix};
use super::workbook::WorkbookRenderer;

/// Output artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Paginated PDF document
    Document,
    /// XLSX spreadsheet workbook
    Workbook,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Document => "pdf",
            ExportFormat::Workbook => "xlsx",
        }
    }

    /// Name shown to the user in notices
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Document => "PDF",
            ExportFormat::Workbook => "Excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Everything one export call needs, borrowed for the duration of the call
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub dataset: &'a [Record],
    pub columns: &'a [ColumnSpec],
    /// Document title (ignored by the workbook renderer)
    pub title: &'a str,
    /// Base filename, the extension is appended
    pub filename: &'a str,
}

impl<'a> ExportRequest<'a> {
    pub fn new(
        dataset: &'a [Record],
        columns: &'a [ColumnSpec],
        title: &'a str,
        filename: &'a str,
    ) -> Self {
        Self {
            dataset,
            columns,
            title,
            filename,
        }
    }
}

/// Stages of one export call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Validating,
    /// Stopped before projection because there was nothing to export
    Aborted,
    Rendering,
    Succeeded,
    Failed,
}

impl ExportState {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportState::Aborted | ExportState::Succeeded | ExportState::Failed
        )
    }
}

/// A rendered file held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    /// Filename including its extension
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Number of body rows exported
    pub rows: usize,
}

impl ExportArtifact {
    /// Write the artifact into `dir`, returning the full path.
    ///
    /// The directory must already exist.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "output.directory".to_string(),
                value: dir.display().to_string(),
            }
            .into());
        }

        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        debug!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Result of one export call
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The dataset was empty, nothing was rendered
    NoData,
    Success(ExportArtifact),
    /// Projection or rendering failed, no artifact was produced
    Failed { message: String },
}

impl ExportOutcome {
    /// Terminal state reached by the call that produced this outcome
    pub fn state(&self) -> ExportState {
        match self {
            ExportOutcome::NoData => ExportState::Aborted,
            ExportOutcome::Success(_) => ExportState::Succeeded,
            ExportOutcome::Failed { .. } => ExportState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Success(_))
    }

    /// The artifact, when the export succeeded
    pub fn artifact(&self) -> Option<&ExportArtifact> {
        match self {
            ExportOutcome::Success(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// The single user-facing notice for this outcome
    pub fn notice(&self, format: ExportFormat) -> Notice {
        match self {
            ExportOutcome::NoData => Notice::error("Aucune donnée à exporter"),
            ExportOutcome::Success(_) => Notice::info(format!("Export {} réussi", format.label())),
            ExportOutcome::Failed { message } => {
                Notice::error(format!("Échec de l'export : {message}"))
            }
        }
    }
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Runs exports with a fixed pair of renderers
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    document: DocumentRenderer,
    workbook: WorkbookRenderer,
}

impl Exporter {
    /// Create an exporter from its two renderers
    pub fn new(document: DocumentRenderer, workbook: WorkbookRenderer) -> Self {
        Self { document, workbook }
    }

    /// Export `request` as `format`, stamped with the current local time
    pub fn export(&self, request: &ExportRequest<'_>, format: ExportFormat) -> ExportOutcome {
        self.export_at(request, format, Local::now().naive_local())
    }

    /// Export `request` as `format`, stamped with `generated_at`.
    ///
    /// Never panics and never retries: every fault becomes
    /// [`ExportOutcome::Failed`].
    pub fn export_at(
        &self,
        request: &ExportRequest<'_>,
        format: ExportFormat,
        generated_at: NaiveDateTime,
    ) -> ExportOutcome {
        let mut state = ExportState::Idle;
        transition(&mut state, ExportState::Validating);

        if request.dataset.is_empty() {
            transition(&mut state, ExportState::Aborted);
            warn!("Export of '{}' skipped: dataset is empty", request.filename);
            return ExportOutcome::NoData;
        }

        transition(&mut state, ExportState::Rendering);
        match self.run(request, format, &generated_at) {
            Ok(artifact) => {
                transition(&mut state, ExportState::Succeeded);
                info!(
                    "Exported {} records to {} ({} bytes)",
                    artifact.rows,
                    artifact.filename,
                    artifact.bytes.len()
                );
                ExportOutcome::Success(artifact)
            }
            Err(e) => {
                transition(&mut state, ExportState::Failed);
                warn!("Export of '{}' failed: {}", request.filename, e);
                ExportOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn run(
        &self,
        request: &ExportRequest<'_>,
        format: ExportFormat,
        generated_at: &NaiveDateTime,
    ) -> Result<ExportArtifact> {
        let matrix = projector::project(request.dataset, request.columns)?;
        let bytes = self.render(&matrix, request.title, format, generated_at)?;

        Ok(ExportArtifact {
            format,
            filename: format!("{}.{}", request.filename, format.extension()),
            bytes,
            rows: matrix.row_count(),
        })
    }

    fn render(
        &self,
        matrix: &ProjectedMatrix,
        title: &str,
        format: ExportFormat,
        generated_at: &NaiveDateTime,
    ) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Document => self.document.render(matrix, title, generated_at),
            ExportFormat::Workbook => self.workbook.render(matrix, self.workbook.sheet_name()),
        }
    }
}

fn transition(state: &mut ExportState, next: ExportState) {
    debug!("Export state {:?} -> {:?}", state, next);
    *state = next;
}
