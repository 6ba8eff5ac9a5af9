// SolarMaint - core/export.rs
//
// CSV and JSON export of filtered records.
// Core layer: writes to any Write trait object.

use crate::core::model::ParsedRecord;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from a file extension. Anything other than `.json`
    /// is written as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Column headers written to CSV, in order.
pub const CSV_HEADERS: [&str; 5] = [
    "classification",
    "equipment_type",
    "equipment",
    "description",
    "sender",
];

/// Export records to CSV format.
///
/// Absent classification and equipment type are written as empty fields.
pub fn export_csv<'a, W, I>(
    records: I,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS).map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        csv_writer
            .write_record([
                record.classification.map(|c| c.keyword()).unwrap_or(""),
                record.equipment_type.as_deref().unwrap_or(""),
                record.equipment.as_str(),
                record.description.as_str(),
                record.sender.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export records to JSON format (array of objects).
pub fn export_json<'a, W, I>(
    records: I,
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let records: Vec<&ParsedRecord> = records.into_iter().collect();
    serde_json::to_writer_pretty(&mut writer, &records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// Fail with `TooManyRecords` when `count` exceeds `max_records`.
pub fn check_limit(count: usize, max_records: usize) -> Result<(), ExportError> {
    if count > max_records {
        return Err(ExportError::TooManyRecords {
            count,
            max: max_records,
        });
    }
    Ok(())
}

/// Export in the given format after checking the record limit.
pub fn export<W: Write>(
    records: &[&ParsedRecord],
    format: ExportFormat,
    writer: W,
    export_path: &Path,
    max_records: usize,
) -> Result<usize, ExportError> {
    check_limit(records.len(), max_records)?;

    let count = match format {
        ExportFormat::Csv => export_csv(records.iter().copied(), writer, export_path)?,
        ExportFormat::Json => export_json(records.iter().copied(), writer, export_path)?,
    };

    tracing::info!(
        path = %export_path.display(),
        ?format,
        records = count,
        "Export complete"
    );
    Ok(count)
}
