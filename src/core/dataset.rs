// SolarMaint - core/dataset.rs
//
// Turns a decoded sheet into messages: header lookup and date coercion.
// Core layer: works on RawTable, the app layer does the file reading.

use crate::core::model::{Cell, RawMessage, RawTable};
use crate::util::constants;
use crate::util::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Header names of the three columns a message sheet must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: String,
    pub sender: String,
    pub text: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: constants::DEFAULT_DATE_COLUMN.to_string(),
            sender: constants::DEFAULT_SENDER_COLUMN.to_string(),
            text: constants::DEFAULT_TEXT_COLUMN.to_string(),
        }
    }
}

/// Locate a header. Exact match first, then a trimmed case-insensitive match
/// so stray spaces in exported headers do not break loading.
fn find_column(headers: &[String], name: &str) -> Result<usize, LoadError> {
    if let Some(idx) = headers.iter().position(|h| h == name) {
        return Ok(idx);
    }
    let wanted = name.trim().to_lowercase();
    headers
        .iter()
        .position(|h| h.trim().to_lowercase() == wanted)
        .ok_or_else(|| LoadError::MissingColumn {
            column: name.to_string(),
            available: headers.to_vec(),
        })
}

/// Convert every data row into a message.
///
/// Fails on the first missing column or unparseable date, so a bad file
/// produces no partial result. `row` numbers in errors are 1-based sheet
/// rows (the header is row 1).
pub fn coerce_messages(
    table: &RawTable,
    columns: &ColumnMap,
) -> Result<Vec<RawMessage>, LoadError> {
    let date_idx = find_column(&table.headers, &columns.date)?;
    let sender_idx = find_column(&table.headers, &columns.sender)?;
    let text_idx = find_column(&table.headers, &columns.text)?;

    let empty = Cell::Empty;
    let mut messages = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&empty);

        let date_cell = cell(date_idx);
        let timestamp = coerce_date(date_cell).map_err(|()| LoadError::InvalidDate {
            row: i + 2,
            value: date_cell.display_text(),
        })?;

        let text = match cell(text_idx) {
            Cell::Text(s) => Some(s.clone()),
            _ => None,
        };

        messages.push(RawMessage {
            timestamp,
            sender: cell(sender_idx).display_text(),
            text,
        });
    }

    tracing::debug!(
        rows = table.rows.len(),
        without_text = messages.iter().filter(|m| m.text.is_none()).count(),
        without_date = messages.iter().filter(|m| m.timestamp.is_none()).count(),
        "Rows coerced to messages"
    );

    Ok(messages)
}

/// Interpret one date cell. `Ok(None)` for an empty cell, `Err(())` when the
/// cell holds something that is not a date.
fn coerce_date(cell: &Cell) -> Result<Option<NaiveDateTime>, ()> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::DateTime(dt) => Ok(Some(*dt)),
        Cell::Number(serial) => from_excel_serial(*serial).map(Some).ok_or(()),
        Cell::Text(s) if s.trim().is_empty() => Ok(None),
        Cell::Text(s) => parse_date_text(s).map(Some).ok_or(()),
        Cell::Bool(_) | Cell::Error(_) => Err(()),
    }
}

/// Parse a textual timestamp, trying RFC 3339 and then the named formats.
pub fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in constants::DATE_TIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ndt);
        }
    }

    constants::DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Convert a spreadsheet serial day number (1900 date system) to a
/// date-time. The fractional part is the time of day.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let secs = ((serial - constants::EXCEL_UNIX_EPOCH_DAYS) * 86_400.0).round() as i64;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// Earliest and latest calendar date among messages that have one.
pub fn date_bounds(messages: &[RawMessage]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = messages.iter().filter_map(|m| m.timestamp.map(|t| t.date()));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn table(rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable {
            headers: vec!["Data".into(), "Enviado por".into(), "Texto".into()],
            rows,
        }
    }

    #[test]
    fn test_parse_date_text_formats() {
        let expected = ymd_hms(2024, 3, 5, 14, 30, 0);
        assert_eq!(parse_date_text("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_date_text("2024-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_date_text("05/03/2024 14:30"), Some(expected));
        assert_eq!(parse_date_text("2024/03/05 14:30"), Some(expected));
        assert_eq!(
            parse_date_text("2024-03-05"),
            Some(ymd_hms(2024, 3, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_date_text("2024-03-05T14:30:00-03:00"),
            Some(expected)
        );
        assert_eq!(parse_date_text("ontem"), None);
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(from_excel_serial(45356.0), Some(ymd_hms(2024, 3, 5, 0, 0, 0)));
        assert_eq!(
            from_excel_serial(45356.5),
            Some(ymd_hms(2024, 3, 5, 12, 0, 0))
        );
        assert_eq!(from_excel_serial(-3.0), None);
        assert_eq!(from_excel_serial(f64::NAN), None);
    }

    #[test]
    fn test_coerce_messages_basic() {
        let t = table(vec![
            vec![
                Cell::Text("2024-03-05 08:00".into()),
                Cell::Text("João".into()),
                Cell::Text("CORRETIVA\nA[x]".into()),
            ],
            vec![
                Cell::DateTime(ymd_hms(2024, 3, 6, 9, 0, 0)),
                Cell::Number(5511.0),
                Cell::Number(3.0),
            ],
        ]);
        let messages = coerce_messages(&t, &ColumnMap::default()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].timestamp, Some(ymd_hms(2024, 3, 5, 8, 0, 0)));
        assert_eq!(messages[0].text.as_deref(), Some("CORRETIVA\nA[x]"));
        assert_eq!(messages[1].sender, "5511");
        assert_eq!(messages[1].text, None);
    }

    #[test]
    fn test_short_row_and_empty_date() {
        let t = table(vec![vec![Cell::Empty, Cell::Text("Ana".into())]]);
        let messages = coerce_messages(&t, &ColumnMap::default()).unwrap();
        assert_eq!(messages[0].timestamp, None);
        assert_eq!(messages[0].text, None);
    }

    #[test]
    fn test_missing_column_is_error() {
        let t = RawTable {
            headers: vec!["Data".into(), "Texto".into()],
            rows: vec![],
        };
        let err = coerce_messages(&t, &ColumnMap::default()).unwrap_err();
        assert!(
            matches!(err, LoadError::MissingColumn { ref column, .. } if column == "Enviado por"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_header_match_tolerates_case_and_spaces() {
        let t = RawTable {
            headers: vec![" data ".into(), "ENVIADO POR".into(), "texto".into()],
            rows: vec![],
        };
        assert!(coerce_messages(&t, &ColumnMap::default()).is_ok());
    }

    #[test]
    fn test_invalid_date_reports_sheet_row() {
        let t = table(vec![
            vec![
                Cell::Text("2024-03-05".into()),
                Cell::Text("Ana".into()),
                Cell::Text("x".into()),
            ],
            vec![
                Cell::Text("amanhã".into()),
                Cell::Text("Ana".into()),
                Cell::Text("x".into()),
            ],
        ]);
        let err = coerce_messages(&t, &ColumnMap::default()).unwrap_err();
        assert!(
            matches!(err, LoadError::InvalidDate { row: 3, ref value } if value == "amanhã"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_date_bounds() {
        let msg = |d: Option<NaiveDateTime>| RawMessage {
            timestamp: d,
            sender: String::new(),
            text: None,
        };
        let messages = vec![
            msg(Some(ymd_hms(2024, 3, 9, 1, 0, 0))),
            msg(None),
            msg(Some(ymd_hms(2024, 3, 2, 23, 0, 0))),
        ];
        let (lo, hi) = date_bounds(&messages).unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(date_bounds(&[msg(None)]), None);
    }
}
