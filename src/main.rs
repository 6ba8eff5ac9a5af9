// SolarMaint - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Loading the message sheet and building the report state
// 4. Printing the report and writing the optional export
//
// Any failure after argument parsing is reported as one error line on
// stderr with exit status 1. Loading, filter and export setup all run
// before the report is written, so those failures leave stdout empty.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use solarmaint::app::{ingest, state::AppState};
use solarmaint::core::export::{self, ExportFormat};
use solarmaint::core::filter::RecordFilter;
use solarmaint::core::model::Classification;
use solarmaint::platform::config::{self, AppConfig, PlatformPaths};
use solarmaint::ui::report::{self, ReportOptions};
use solarmaint::util::error::{FilterError, SolarMaintError};
use solarmaint::util::{constants, logging};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Export file format selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// SolarMaint - Solar plant maintenance report.
///
/// Reads a spreadsheet of maintenance chat messages, extracts the
/// `equipment[description]` records under each classification heading and
/// prints filtered tables and statistics.
#[derive(Parser, Debug)]
#[command(name = "solarmaint", version, about)]
struct Cli {
    /// Spreadsheet to read (xlsx, xlsm, xlsb, xls, ods or csv).
    path: PathBuf,

    /// First day of the period (YYYY-MM-DD). Defaults to the earliest message.
    #[arg(short = 's', long = "start")]
    start: Option<NaiveDate>,

    /// Last day of the period, inclusive (YYYY-MM-DD). Defaults to the latest message.
    #[arg(short = 'e', long = "end")]
    end: Option<NaiveDate>,

    /// Keep only records with this equipment type.
    #[arg(short = 't', long = "equipment-type")]
    equipment_type: Option<String>,

    /// Keep only records for this equipment.
    #[arg(short = 'q', long = "equipment")]
    equipment: Option<String>,

    /// Case-insensitive substring search on the description.
    #[arg(long = "search")]
    search: Option<String>,

    /// Regular expression matched against the description.
    #[arg(long = "regex")]
    regex: Option<String>,

    /// Show only one classification (e.g. corretiva, contencao-vegetal).
    #[arg(short = 'c', long = "classification")]
    classification: Option<String>,

    /// Write the filtered records to this file.
    #[arg(long = "export")]
    export: Option<PathBuf>,

    /// Export format. Defaults to the export file extension.
    #[arg(long = "format", value_enum)]
    format: Option<FormatArg>,

    /// Directory containing config.toml.
    #[arg(long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_dir);
    let (app_config, config_warnings) = config::load_config(&config_dir);

    logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "SolarMaint starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error processing file: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> solarmaint::util::error::Result<()> {
    let only = cli
        .classification
        .as_deref()
        .map(|name| {
            Classification::from_name(name).ok_or_else(|| FilterError::UnknownClassification {
                name: name.to_string(),
            })
        })
        .transpose()?;

    let mut filter = RecordFilter {
        equipment_type: cli.equipment_type.clone(),
        equipment: cli.equipment.clone(),
        description_search: cli.search.clone().unwrap_or_default(),
        description_regex: None,
    };
    filter.set_regex(cli.regex.as_deref().unwrap_or(""))?;

    let messages = ingest::load_messages(&cli.path, &app_config.columns)?;

    let mut state = AppState::new(messages);
    state.set_date_range(cli.start, cli.end)?;
    state.set_filter(filter);

    tracing::info!(
        records = state.records.len(),
        shown = state.filtered_indices.len(),
        "Report ready"
    );

    // Export setup runs before the report is printed.
    let export_target = match cli.export {
        Some(ref export_path) => {
            let format = cli
                .format
                .map(ExportFormat::from)
                .unwrap_or_else(|| ExportFormat::from_path(export_path));
            export::check_limit(state.filtered_indices.len(), app_config.max_export_records)?;
            let file = std::fs::File::create(export_path).map_err(|e| SolarMaintError::Io {
                path: export_path.clone(),
                operation: "create export file",
                source: e,
            })?;
            Some((export_path, format, file))
        }
        None => None,
    };

    let options = ReportOptions {
        bar_width: app_config.bar_width,
        max_cell_width: app_config.max_cell_width,
        only,
    };
    let rendered = report::render(&state, &options);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(rendered.as_bytes())
        .and_then(|()| handle.flush())
        .map_err(|e| SolarMaintError::Io {
            path: PathBuf::from("<stdout>"),
            operation: "write report",
            source: e,
        })?;

    if let Some((export_path, format, file)) = export_target {
        let count = export::export(
            &state.filtered_records(),
            format,
            BufWriter::new(file),
            export_path,
            app_config.max_export_records,
        )?;
        eprintln!("Exported {count} records to {}", export_path.display());
    }

    Ok(())
}
