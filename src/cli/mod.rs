//! Command-line interface for recexport
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and CLI overrides
//! - Loading record datasets and column definitions
//! - Running exports and previews

pub mod completion;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, LogLevel, validate_sheet_name};
use crate::error::{ConfigError, Result};
use crate::export::{
    ColumnFile, ColumnSpec, DocumentRenderer, ExportFormat, ExportOutcome, ExportRequest,
    Exporter, Record, WorkbookRenderer, project,
};
use crate::formatter::{Colorizer, Formatter, TableFormatter, TableStyle};
use crate::presets::{self, PRESET_NAMES};

/// Title used when neither the command line nor the columns provide one
const DEFAULT_TITLE: &str = "Export";

/// Base filename used when neither the command line nor the columns provide one
const DEFAULT_FILENAME: &str = "export";

/// Render business records to PDF documents and XLSX workbooks
#[derive(Parser, Debug)]
#[command(
    name = "recexport",
    version,
    about = "Export business records to PDF and Excel",
    long_about = "Render a JSON dataset of business records through an ordered column
definition into a paginated PDF document or an XLSX workbook."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for recexport
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a dataset to a PDF or XLSX file
    Export(ExportArgs),

    /// Show the projected table in the terminal
    Preview(PreviewArgs),

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show version information
    Version,
}

/// Where records and columns come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON file holding an array of records, or an object with a `data` array
    #[arg(short = 'd', long, value_name = "FILE")]
    pub data: PathBuf,

    #[command(flatten)]
    pub columns: ColumnSource,
}

/// Exactly one column source
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ColumnSource {
    /// TOML column definition file
    #[arg(long, value_name = "FILE")]
    pub columns: Option<PathBuf>,

    /// Built-in column set
    #[arg(
        long,
        value_name = "NAME",
        value_parser = PossibleValuesParser::new(PRESET_NAMES.iter().copied())
    )]
    pub preset: Option<String>,
}

/// Arguments of `recexport export`
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: FormatArg,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Base filename, without extension
    #[arg(long)]
    pub filename: Option<String>,

    /// Directory to write the file into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Worksheet name for XLSX output
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,
}

/// Arguments of `recexport preview`
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show at most this many rows
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Table style
    #[arg(long, value_enum, default_value = "modern")]
    pub style: StyleArg,

    /// Wrap cells wider than this many characters
    #[arg(long, value_name = "CHARS", default_value_t = 40)]
    pub max_width: usize,
}

/// Output format names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Pdf,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => ExportFormat::Document,
            FormatArg::Xlsx => ExportFormat::Workbook,
        }
    }
}

/// Table styles accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    Modern,
    Ascii,
    Rounded,
    Markdown,
    Psql,
}

impl From<StyleArg> for TableStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Modern => TableStyle::Modern,
            StyleArg::Ascii => TableStyle::Ascii,
            StyleArg::Rounded => TableStyle::Rounded,
            StyleArg::Markdown => TableStyle::Markdown,
            StyleArg::Psql => TableStyle::Psql,
        }
    }
}

/// Columns resolved from a preset or a definition file, with their defaults
pub struct ResolvedColumns {
    pub columns: Vec<ColumnSpec>,
    pub title: Option<String>,
    pub filename: Option<String>,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        // `config --validate` reports on the file itself
        let validating = matches!(args.command, Commands::Config { validate: true, .. });
        if !validating {
            if let Err(e) = config.validate() {
                let colorizer = Colorizer::new(!args.no_color);
                eprintln!(
                    "{}",
                    colorizer.warning(&format!("Warning: Configuration validation failed: {}", e))
                );
                eprintln!("Using default configuration instead.");
                config = Config::new();
            }
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.output.color_output = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if let Commands::Export(export) = &args.command {
            if let Some(dir) = &export.out_dir {
                config.output.directory = dir.clone();
            }
            if let Some(sheet) = &export.sheet {
                config.workbook.sheet_name = sheet.clone();
            }
        }
    }

    /// Run the selected subcommand
    ///
    /// # Returns
    /// * `Result<bool>` - False when the command ran but did not succeed
    ///   (no data, failed export, invalid configuration)
    pub fn run(&self) -> Result<bool> {
        match &self.args.command {
            Commands::Export(args) => self.run_export(args),
            Commands::Preview(args) => self.run_preview(args),
            Commands::Config { show, validate } => self.handle_config_command(*show, *validate),
            Commands::Completion { shell } => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Commands::Version => {
                self.show_version();
                Ok(true)
            }
        }
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.output.color_output)
    }

    /// Build an exporter from the effective configuration
    pub fn exporter(&self) -> Exporter {
        Exporter::new(
            DocumentRenderer::new(self.config.document.clone()),
            WorkbookRenderer::new(self.config.workbook.clone()),
        )
    }

    /// Run `recexport export`
    fn run_export(&self, args: &ExportArgs) -> Result<bool> {
        validate_sheet_name(&self.config.workbook.sheet_name)?;

        let dataset = load_records(&args.source.data)?;
        let resolved = resolve_columns(&args.source.columns)?;

        let title = args
            .title
            .clone()
            .or(resolved.title)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let filename = args
            .filename
            .clone()
            .or(resolved.filename)
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let format = ExportFormat::from(args.format);
        let request = ExportRequest::new(&dataset, &resolved.columns, &title, &filename);
        let outcome = self.exporter().export(&request, format);

        let formatter = self.formatter();
        let notice = outcome.notice(format);

        match &outcome {
            ExportOutcome::Success(artifact) => {
                let path = artifact.write_to(&self.config.output.directory)?;
                info!("Export written to {}", path.display());
                if !self.args.quiet {
                    println!("{}", formatter.format_notice(&notice));
                    println!("{}", formatter.format_written(artifact, &path));
                }
                Ok(true)
            }
            ExportOutcome::NoData | ExportOutcome::Failed { .. } => {
                eprintln!("{}", formatter.format_notice(&notice));
                Ok(false)
            }
        }
    }

    /// Run `recexport preview`
    fn run_preview(&self, args: &PreviewArgs) -> Result<bool> {
        let dataset = load_records(&args.source.data)?;
        let resolved = resolve_columns(&args.source.columns)?;
        let matrix = project(&dataset, &resolved.columns)?;

        let formatter = self.formatter();
        let table = TableFormatter::with_colors(formatter.colorizer().is_enabled())
            .with_style(args.style.into())
            .with_max_column_width(args.max_width)
            .with_max_rows(args.limit);
        let formatter = formatter.with_table(table);

        println!("{}", formatter.format_preview(&matrix));
        Ok(true)
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<bool> {
        let mut valid = true;
        if validate {
            valid = self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(valid)
    }

    /// Validate configuration file
    fn validate_config_file(&self) -> bool {
        let colorizer = *self.formatter().colorizer();
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("{}", colorizer.warning("❌ Configuration file does not exist"));
            return false;
        }

        match Config::load_from_file(Some(path.as_path())) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    println!("{}", colorizer.success("✅ Configuration is valid"));
                    true
                }
                Err(e) => {
                    println!(
                        "{}",
                        colorizer.error(&format!("❌ Configuration validation failed: {}", e))
                    );
                    false
                }
            },
            Err(e) => {
                println!(
                    "{}",
                    colorizer.error(&format!("❌ Failed to load configuration: {}", e))
                );
                false
            }
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_string()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Show version information
    fn show_version(&self) {
        println!("recexport version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }
}

/// Load a record dataset from a JSON file
///
/// Accepts a top-level array of records or an object with a `data` array.
///
/// # Arguments
/// * `path` - JSON file to read
///
/// # Returns
/// * `Result<Vec<Record>>` - Records in file order
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(format!("Data file not found: {}", path.display()).into());
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let records = match value {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut object) => match object.remove("data") {
            Some(serde_json::Value::Array(records)) => records,
            _ => {
                return Err(
                    "Expected a JSON array of records or an object with a `data` array".into(),
                );
            }
        },
        _ => {
            return Err("Expected a JSON array of records or an object with a `data` array".into());
        }
    };

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Resolve the column source to column specs and their default metadata
pub fn resolve_columns(source: &ColumnSource) -> Result<ResolvedColumns> {
    if let Some(name) = &source.preset {
        let preset = presets::preset(name).ok_or_else(|| ConfigError::InvalidValue {
            field: "preset".to_string(),
            value: name.clone(),
        })?;
        return Ok(ResolvedColumns {
            columns: preset.columns,
            title: Some(preset.title.to_string()),
            filename: Some(preset.filename.to_string()),
        });
    }

    if let Some(path) = &source.columns {
        let file = ColumnFile::load(path)?;
        let columns = file.compile()?;
        return Ok(ResolvedColumns {
            columns,
            title: file.title,
            filename: file.filename,
        });
    }

    Err(ConfigError::Generic("either --columns or --preset is required".to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cli(args: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(args).unwrap();
        CliInterface {
            args,
            config: Config::default(),
        }
    }

    #[test]
    fn test_cli_args_export() {
        let args = CliArgs::try_parse_from([
            "recexport",
            "export",
            "--data",
            "factures.json",
            "--preset",
            "invoices",
            "--format",
            "pdf",
        ])
        .unwrap();
        match args.command {
            Commands::Export(export) => {
                assert_eq!(export.format, FormatArg::Pdf);
                assert_eq!(export.source.columns.preset.as_deref(), Some("invoices"));
                assert!(export.source.columns.columns.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_args_require_one_column_source() {
        let none = CliArgs::try_parse_from(["recexport", "preview", "--data", "x.json"]);
        assert!(none.is_err());

        let both = CliArgs::try_parse_from([
            "recexport",
            "preview",
            "--data",
            "x.json",
            "--preset",
            "invoices",
            "--columns",
            "c.toml",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_cli_args_unknown_preset() {
        let result = CliArgs::try_parse_from([
            "recexport",
            "preview",
            "--data",
            "x.json",
            "--preset",
            "tickets",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_args_preview_options() {
        let args = CliArgs::try_parse_from([
            "recexport",
            "preview",
            "-d",
            "x.json",
            "--preset",
            "invoices",
            "--limit",
            "5",
            "--max-width",
            "12",
        ])
        .unwrap();
        match args.command {
            Commands::Preview(preview) => {
                assert_eq!(preview.limit, Some(5));
                assert_eq!(preview.max_width, 12);
                assert_eq!(preview.style, StyleArg::Modern);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_run_preview() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_file(
            dir.path(),
            "factures.json",
            r#"[{"invoice_number": "FAC-1", "amount": 10, "status": "paid"}]"#,
        );
        let cli = cli(&[
            "recexport",
            "--no-color",
            "preview",
            "-d",
            data.to_str().unwrap(),
            "--preset",
            "invoices",
            "--max-width",
            "10",
        ]);
        assert!(cli.run().unwrap());
    }

    #[test]
    fn test_cli_args_global_flags() {
        let args = CliArgs::try_parse_from(["recexport", "version", "--no-color", "-q"]).unwrap();
        assert!(args.no_color);
        assert!(args.quiet);
    }

    #[test]
    fn test_apply_args_to_config() {
        let args = CliArgs::try_parse_from([
            "recexport",
            "--vv",
            "--no-color",
            "export",
            "-d",
            "x.json",
            "--preset",
            "invoices",
            "-f",
            "xlsx",
            "-o",
            "out",
            "--sheet",
            "Factures",
        ])
        .unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);

        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(!config.output.color_output);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.workbook.sheet_name, "Factures");
    }

    #[test]
    fn test_load_records_array_and_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let array = write_file(dir.path(), "a.json", r#"[{"id": 1}, {"id": 2}]"#);
        let wrapped = write_file(dir.path(), "b.json", r#"{"data": [{"id": 3}]}"#);
        let scalar = write_file(dir.path(), "c.json", "42");

        assert_eq!(load_records(&array).unwrap().len(), 2);
        assert_eq!(load_records(&wrapped).unwrap(), vec![json!({ "id": 3 })]);
        assert!(load_records(&scalar).is_err());
        assert!(load_records(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_resolve_preset_columns() {
        let source = ColumnSource {
            columns: None,
            preset: Some("opportunities".to_string()),
        };
        let resolved = resolve_columns(&source).unwrap();
        assert_eq!(resolved.columns.len(), 7);
        assert_eq!(resolved.title.as_deref(), Some("Opportunités Commerciales"));
        assert_eq!(resolved.filename.as_deref(), Some("opportunites"));
    }

    #[test]
    fn test_run_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_file(
            dir.path(),
            "factures.json",
            r#"[{"invoice_number": "FAC-1", "amount": 10, "status": "paid"}]"#,
        );
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let cli = cli(&[
            "recexport",
            "-q",
            "export",
            "-d",
            data.to_str().unwrap(),
            "--preset",
            "invoices",
            "-f",
            "xlsx",
            "-o",
            out.to_str().unwrap(),
        ]);
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &cli.args);
        let cli = CliInterface { config, ..cli };

        assert!(cli.run().unwrap());
        assert!(out.join("factures.xlsx").exists());
    }

    #[test]
    fn test_config_validate_reports_file_state() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "good.toml", "[workbook]\nsheet_name = \"Factures\"\n");
        let bad = write_file(dir.path(), "bad.toml", "[workbook]\nmin_column_width = 0\n");

        let run = |path: &Path| {
            let args = CliArgs::try_parse_from([
                "recexport",
                "--no-color",
                "-c",
                path.to_str().unwrap(),
                "config",
                "--validate",
            ])
            .unwrap();
            CliInterface::from_args(args).unwrap().run().unwrap()
        };

        assert!(run(good.as_path()));
        assert!(!run(bad.as_path()));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_file(dir.path(), "bad.toml", "[workbook]\nsheet_name = \"a/b\"\n");
        let args = CliArgs::try_parse_from([
            "recexport",
            "-c",
            bad.to_str().unwrap(),
            "version",
        ])
        .unwrap();
        let cli = CliInterface::from_args(args).unwrap();
        assert_eq!(cli.config().workbook.sheet_name, "Data");
    }

    #[test]
    fn test_run_export_empty_dataset_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_file(dir.path(), "empty.json", "[]");
        let columns = write_file(
            dir.path(),
            "cols.toml",
            "[[columns]]\nheader = \"ID\"\nfield = \"id\"\n",
        );

        let cli = cli(&[
            "recexport",
            "export",
            "-d",
            data.to_str().unwrap(),
            "--columns",
            columns.to_str().unwrap(),
            "-f",
            "pdf",
        ]);
        assert!(!cli.run().unwrap());
    }
}
