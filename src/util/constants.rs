// SolarMaint - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SolarMaint";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SolarMaint";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Spreadsheet columns
// =============================================================================

/// Default header of the message date/time column.
pub const DEFAULT_DATE_COLUMN: &str = "Data";

/// Default header of the sender column.
pub const DEFAULT_SENDER_COLUMN: &str = "Enviado por";

/// Default header of the free-text message column.
pub const DEFAULT_TEXT_COLUMN: &str = "Texto";

/// File extensions read through the workbook reader. Anything else
/// except `.csv` is rejected before opening.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extension read through the CSV reader.
pub const CSV_EXTENSION: &str = "csv";

/// Maximum number of data rows read from a single sheet. Input files are
/// chat exports sized for interactive use; anything beyond this is
/// almost certainly the wrong file.
pub const MAX_INPUT_ROWS: usize = 200_000;

// =============================================================================
// Date coercion
// =============================================================================

/// Text formats tried, in order, when a date cell holds a string.
/// Slash and dash dates with the year last are read day-first, never
/// month-first: `05/03/2024` is 5 March.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Date-only text formats, interpreted as midnight.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Spreadsheet serial day count of 1970-01-01 (1900 date system with the
/// Lotus leap-year quirk already folded in).
pub const EXCEL_UNIX_EPOCH_DAYS: f64 = 25_569.0;

// =============================================================================
// Report rendering
// =============================================================================

/// Default width in characters of the longest bar in the distribution chart.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Minimum user-configurable bar width.
pub const MIN_BAR_WIDTH: usize = 5;

/// Maximum user-configurable bar width.
pub const MAX_BAR_WIDTH: usize = 200;

/// Default maximum width of a table cell before it is truncated with an
/// ellipsis.
pub const DEFAULT_MAX_CELL_WIDTH: usize = 48;

/// Minimum user-configurable cell width.
pub const MIN_CELL_WIDTH: usize = 8;

/// Maximum user-configurable cell width.
pub const MAX_CELL_WIDTH: usize = 400;

/// Placeholder shown in tables for absent classification or equipment type.
pub const ABSENT_PLACEHOLDER: &str = "-";

// =============================================================================
// Export
// =============================================================================

/// Default maximum number of records that can be exported in one operation.
pub const DEFAULT_MAX_EXPORT_RECORDS: usize = 1_000_000;

/// Hard upper bound on the export limit.
pub const ABSOLUTE_MAX_EXPORT_RECORDS: usize = 5_000_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a message line included in debug output.
/// Prevents long chat lines from flooding the log.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 120;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
