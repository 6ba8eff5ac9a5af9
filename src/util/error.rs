// SolarMaint - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Malformed bracket lines are not represented here: the parser skips them
// locally (see core::parser::BracketError) and they never reach the user.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SolarMaint operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SolarMaintError {
    /// Spreadsheet loading or date coercion failed.
    Load(LoadError),

    /// Filter construction failed.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SolarMaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SolarMaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors raised while reading the input spreadsheet and coercing its rows
/// into messages. Any of these aborts the whole run.
#[derive(Debug)]
pub enum LoadError {
    /// The file extension is not a supported spreadsheet format.
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The workbook could not be opened or decoded.
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    /// The workbook contains no worksheet.
    NoWorksheet { path: PathBuf },

    /// CSV decoding failed.
    Csv { path: PathBuf, source: csv::Error },

    /// The sheet has no header row.
    EmptySheet { path: PathBuf },

    /// A required column header was not found.
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A non-empty date cell could not be interpreted as a date.
    InvalidDate {
        row: usize,
        value: String,
    },

    /// The sheet exceeds the maximum row count.
    TooManyRows { count: usize, max: usize },

    /// I/O error reading the input file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path, extension } => write!(
                f,
                "'{}': unsupported file type '{extension}' (expected xlsx, xlsm, xlsb, xls, ods or csv)",
                path.display()
            ),
            Self::Workbook { path, source } => {
                write!(f, "Cannot read workbook '{}': {source}", path.display())
            }
            Self::NoWorksheet { path } => {
                write!(f, "Workbook '{}' contains no worksheet", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "Cannot read CSV '{}': {source}", path.display())
            }
            Self::EmptySheet { path } => {
                write!(f, "'{}' has no header row", path.display())
            }
            Self::MissingColumn { column, available } => write!(
                f,
                "Required column '{column}' not found. Available columns: {}",
                available.join(", ")
            ),
            Self::InvalidDate { row, value } => {
                write!(f, "Row {row}: cannot interpret '{value}' as a date")
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Sheet has {count} rows, exceeds maximum of {max}"
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Workbook { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LoadError> for SolarMaintError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter operations.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// The date range start lies after its end.
    InvertedRange { start: String, end: String },

    /// A classification name did not match any known category.
    UnknownClassification { name: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
            Self::InvertedRange { start, end } => {
                write!(f, "Date range start {start} is after end {end}")
            }
            Self::UnknownClassification { name } => write!(
                f,
                "Unknown classification '{name}'. Expected one of: \
                 corretiva, preventiva, contencao-vegetal, lavagem-de-modulos, materiais"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for SolarMaintError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for SolarMaintError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Convenience type alias for SolarMaint results.
pub type Result<T> = std::result::Result<T, SolarMaintError>;
