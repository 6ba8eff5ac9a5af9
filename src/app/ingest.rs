// SolarMaint - app/ingest.rs
//
// Reads the input spreadsheet from disk and hands a format-neutral
// RawTable to the core layer.
//
// Workbooks (xlsx, xlsm, xlsb, xls, ods) go through calamine; only the
// first worksheet is read. CSV files go through the csv crate with
// numeric-looking fields decoded as numbers so both paths produce the
// same cell kinds.

use crate::core::dataset::{self, ColumnMap};
use crate::core::model::{Cell, RawMessage, RawTable};
use crate::util::constants;
use crate::util::error::LoadError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read the sheet at `path`, dispatching on the file extension.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    std::fs::metadata(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if extension == constants::CSV_EXTENSION {
        read_csv(path)?
    } else if constants::WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)?
    } else {
        return Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    };

    if table.rows.len() > constants::MAX_INPUT_ROWS {
        return Err(LoadError::TooManyRows {
            count: table.rows.len(),
            max: constants::MAX_INPUT_ROWS,
        });
    }

    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Sheet read"
    );
    Ok(table)
}

/// Read the sheet at `path` and convert its rows into messages.
pub fn load_messages(path: &Path, columns: &ColumnMap) -> Result<Vec<RawMessage>, LoadError> {
    let table = read_table(path)?;
    let messages = dataset::coerce_messages(&table, columns)?;
    tracing::info!(
        path = %path.display(),
        messages = messages.len(),
        "Messages loaded"
    );
    Ok(messages)
}

// =============================================================================
// Workbook
// =============================================================================

fn read_workbook(path: &Path) -> Result<RawTable, LoadError> {
    let workbook_err = |e: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        source: e,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_err)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| LoadError::EmptySheet {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(|c| c.to_string())
        .collect();

    Ok(RawTable {
        headers,
        rows: rows.map(|row| row.iter().map(workbook_cell).collect()).collect(),
    })
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => dataset::parse_date_text(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

// =============================================================================
// CSV
// =============================================================================

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let csv_err = |e: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(LoadError::EmptySheet {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn csv_cell(field: &str) -> Cell {
    if field.trim().is_empty() {
        return Cell::Empty;
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_cell_kinds() {
        assert_eq!(csv_cell(""), Cell::Empty);
        assert_eq!(csv_cell("  "), Cell::Empty);
        assert_eq!(csv_cell("42"), Cell::Number(42.0));
        assert_eq!(csv_cell("A[x]"), Cell::Text("A[x]".into()));
        assert_eq!(csv_cell("NaN"), Cell::Text("NaN".into()));
    }

    #[test]
    fn test_read_csv_with_multiline_body() {
        let file = write_temp(
            ".csv",
            "Data,Enviado por,Texto\n2024-03-05 08:00,João,\"CORRETIVA\nA[x]\"\n2024-03-06,Ana,\n",
        );
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Data", "Enviado por", "Texto"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], Cell::Text("CORRETIVA\nA[x]".into()));
        assert_eq!(table.rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".txt", "Data,Enviado por,Texto\n");
        assert!(matches!(
            read_table(file.path()),
            Err(LoadError::UnsupportedFormat { ref extension, .. }) if extension == "txt"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_table(Path::new("/nonexistent/solarmaint/input.xlsx"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_corrupt_workbook() {
        let file = write_temp(".xlsx", "this is not a zip archive");
        assert!(matches!(
            read_table(file.path()),
            Err(LoadError::Workbook { .. })
        ));
    }
}
