//! recexport - Record Export CLI
//!
//! Exports JSON datasets of business records to PDF documents and XLSX
//! workbooks using built-in presets or column definition files.
//!
//! # Usage
//!
//! ```bash
//! # Export invoices to a PDF
//! recexport export -d invoices.json --preset invoices -f pdf
//!
//! # Preview what an export would contain
//! recexport preview -d deals.json --columns deals.toml --limit 20
//! ```

use tracing_subscriber::EnvFilter;

use recexport::Result;
use recexport::cli::CliInterface;

/// Application entry point
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the selected subcommand
///
/// # Returns
/// * `Result<bool>` - Whether the command succeeded
fn run() -> Result<bool> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.run()
}

/// Initialize logging from `RUST_LOG` or the configured level
///
/// Verbosity flags have already been folded into the configured level.
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;
    let level = logging.level.to_tracing_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
