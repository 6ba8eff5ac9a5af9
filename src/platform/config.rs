// SolarMaint - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::dataset::ColumnMap;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SolarMaint configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/solarmaint/ or %APPDATA%\SolarMaint\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[columns]` section.
    pub columns: ColumnsSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[columns]` config section: header names in the input sheet.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ColumnsSection {
    pub date: Option<String>,
    pub sender: Option<String>,
    pub text: Option<String>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Width of the longest bar in the distribution chart.
    pub bar_width: Option<usize>,
    /// Table cells longer than this are truncated.
    pub max_cell_width: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Refuse exports above this many records.
    pub max_records: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Input sheet column headers.
    pub columns: ColumnMap,
    /// Distribution chart bar width.
    pub bar_width: usize,
    /// Maximum table cell width.
    pub max_cell_width: usize,
    /// Export record cap.
    pub max_export_records: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            bar_width: constants::DEFAULT_BAR_WIDTH,
            max_cell_width: constants::DEFAULT_MAX_CELL_WIDTH,
            max_export_records: constants::DEFAULT_MAX_EXPORT_RECORDS,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings.
/// If the file is unreadable or unparseable, returns defaults with a warning.
///
/// Called before logging is initialised (the log level lives in this file),
/// so problems are reported only through the returned warnings.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            let config = validate(raw, &mut warnings);
            (config, warnings)
        }
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            (AppConfig::default(), warnings)
        }
    }
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Columns --
    let mut set_column = |target: &mut String, value: Option<String>, key: &str| {
        if let Some(name) = value {
            if name.trim().is_empty() {
                warnings.push(format!(
                    "[columns] {key} is empty. Using default (\"{target}\")."
                ));
            } else {
                *target = name;
            }
        }
    };
    set_column(&mut config.columns.date, raw.columns.date, "date");
    set_column(&mut config.columns.sender, raw.columns.sender, "sender");
    set_column(&mut config.columns.text, raw.columns.text, "text");

    // -- Report: bar_width --
    if let Some(width) = raw.report.bar_width {
        if (constants::MIN_BAR_WIDTH..=constants::MAX_BAR_WIDTH).contains(&width) {
            config.bar_width = width;
        } else {
            warnings.push(format!(
                "[report] bar_width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_BAR_WIDTH,
                constants::MAX_BAR_WIDTH,
                constants::DEFAULT_BAR_WIDTH,
            ));
        }
    }

    // -- Report: max_cell_width --
    if let Some(width) = raw.report.max_cell_width {
        if (constants::MIN_CELL_WIDTH..=constants::MAX_CELL_WIDTH).contains(&width) {
            config.max_cell_width = width;
        } else {
            warnings.push(format!(
                "[report] max_cell_width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_CELL_WIDTH,
                constants::MAX_CELL_WIDTH,
                constants::DEFAULT_MAX_CELL_WIDTH,
            ));
        }
    }

    // -- Export: max_records --
    if let Some(max) = raw.export.max_records {
        if (1..=constants::ABSOLUTE_MAX_EXPORT_RECORDS).contains(&max) {
            config.max_export_records = max;
        } else {
            warnings.push(format!(
                "[export] max_records = {max} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_EXPORT_RECORDS,
                constants::DEFAULT_MAX_EXPORT_RECORDS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config() {
        let dir = write_config(
            r#"
[columns]
date = "Timestamp"
text = "Mensagem"

[report]
bar_width = 20

[logging]
level = "DEBUG"

[unknown]
ignored = true
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.columns.date, "Timestamp");
        assert_eq!(config.columns.sender, constants::DEFAULT_SENDER_COLUMN);
        assert_eq!(config.columns.text, "Mensagem");
        assert_eq!(config.bar_width, 20);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let dir = write_config(
            r#"
[columns]
sender = "  "

[report]
bar_width = 1
max_cell_width = 10000

[export]
max_records = 0

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 5, "{warnings:?}");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unparseable_file_warns() {
        let dir = write_config("[report\nbar_width = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }
}
