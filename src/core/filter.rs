// SolarMaint - core/filter.rs
//
// Date-range selection of messages and composable record filters.
// All active record filters are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::model::{Classification, ParsedRecord, RawMessage};
use crate::core::parser;
use crate::util::error::FilterError;
use chrono::NaiveDate;
use regex::Regex;

// =============================================================================
// Date range
// =============================================================================

/// Calendar-date range, inclusive on both ends. Only the date part of a
/// message timestamp is compared, so any time on `end` is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Messages without a timestamp are never inside a range.
    pub fn contains(&self, message: &RawMessage) -> bool {
        message
            .timestamp
            .map(|ts| (self.start..=self.end).contains(&ts.date()))
            .unwrap_or(false)
    }
}

/// Parse every in-range textual message and concatenate the records in
/// sheet order. Rows whose body is not text are skipped.
pub fn extract_records(messages: &[RawMessage], range: &DateRange) -> Vec<ParsedRecord> {
    let mut records = Vec::new();
    let mut in_range = 0usize;

    for message in messages.iter().filter(|m| range.contains(m)) {
        in_range += 1;
        match message.text {
            Some(ref text) => records.extend(parser::records(text, &message.sender)),
            None => tracing::trace!(sender = %message.sender, "Skipping row without text body"),
        }
    }

    tracing::debug!(
        start = %range.start,
        end = %range.end,
        messages = in_range,
        records = records.len(),
        "Records extracted"
    );

    records
}

// =============================================================================
// Record filter
// =============================================================================

/// Complete record filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Exact equipment type to keep. None = all.
    pub equipment_type: Option<String>,

    /// Exact equipment name to keep. None = all.
    pub equipment: Option<String>,

    /// Substring search on the description (case-insensitive). Empty = no filter.
    pub description_search: String,

    /// Compiled regex on the description. None = no regex filter.
    pub description_regex: Option<Regex>,
}

impl RecordFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.equipment_type.is_none()
            && self.equipment.is_none()
            && self.description_search.is_empty()
            && self.description_regex.is_none()
    }

    /// Set the description regex, compiling it.
    /// Returns an error if the pattern is invalid.
    pub fn set_regex(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.description_regex = None;
            return Ok(());
        }
        let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        self.description_regex = Some(regex);
        Ok(())
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
pub fn apply_filters(records: &[ParsedRecord], filter: &RecordFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    let search_lower = filter.description_search.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, filter, &search_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single record matches all active filters.
fn matches_all(record: &ParsedRecord, filter: &RecordFilter, search_lower: &str) -> bool {
    if let Some(ref wanted) = filter.equipment_type {
        if record.equipment_type.as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }

    if let Some(ref wanted) = filter.equipment {
        if record.equipment != *wanted {
            return false;
        }
    }

    if !search_lower.is_empty() && !record.description.to_lowercase().contains(search_lower) {
        return false;
    }

    if let Some(ref regex) = filter.description_regex {
        if !regex.is_match(&record.description) {
            return false;
        }
    }

    true
}

// =============================================================================
// Choice lists and classification split
// =============================================================================

/// Distinct equipment types in first-seen order. An absent type appears as
/// `None` once if any record lacks one.
pub fn distinct_equipment_types<'a, I>(records: I) -> Vec<Option<&'a str>>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut seen: Vec<Option<&str>> = Vec::new();
    for record in records {
        let value = record.equipment_type.as_deref();
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Distinct equipment names in first-seen order.
pub fn distinct_equipment<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        if !seen.contains(&record.equipment.as_str()) {
            seen.push(&record.equipment);
        }
    }
    seen
}

/// One subset per classification, in priority order. Always five entries;
/// a subset may be empty. Records without a classification appear in none.
pub fn partition_by_classification<'a, I>(
    records: I,
) -> Vec<(Classification, Vec<&'a ParsedRecord>)>
where
    I: IntoIterator<Item = &'a ParsedRecord>,
{
    let mut groups: Vec<(Classification, Vec<&ParsedRecord>)> = Classification::all()
        .iter()
        .map(|c| (*c, Vec::new()))
        .collect();

    for record in records {
        if let Some(class) = record.classification {
            if let Some((_, bucket)) = groups.iter_mut().find(|(c, _)| *c == class) {
                bucket.push(record);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn message(ts: Option<NaiveDateTime>, sender: &str, text: Option<&str>) -> RawMessage {
        RawMessage {
            timestamp: ts,
            sender: sender.to_string(),
            text: text.map(str::to_string),
        }
    }

    fn record(
        class: Option<Classification>,
        kind: Option<&str>,
        equipment: &str,
        description: &str,
    ) -> ParsedRecord {
        ParsedRecord {
            classification: class,
            equipment_type: kind.map(str::to_string),
            equipment: equipment.to_string(),
            description: description.to_string(),
            sender: "Ana".to_string(),
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            DateRange::new(date(2024, 3, 5), date(2024, 3, 1)),
            Err(FilterError::InvertedRange { .. })
        ));
        assert!(DateRange::new(date(2024, 3, 5), date(2024, 3, 5)).is_ok());
    }

    #[test]
    fn test_range_inclusive_on_both_bounds() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        assert!(range.contains(&message(Some(at(2024, 3, 1, 0)), "a", None)));
        assert!(range.contains(&message(Some(at(2024, 3, 5, 23)), "a", None)));
        assert!(!range.contains(&message(Some(at(2024, 3, 6, 0)), "a", None)));
        assert!(!range.contains(&message(Some(at(2024, 2, 29, 23)), "a", None)));
        assert!(!range.contains(&message(None, "a", None)));
    }

    #[test]
    fn test_extract_records_concatenates_in_order_and_skips_non_text() {
        let messages = vec![
            message(Some(at(2024, 3, 1, 8)), "Ana", Some("CORRETIVA\nA[x]")),
            message(Some(at(2024, 3, 2, 8)), "Bia", None),
            message(Some(at(2024, 3, 9, 8)), "Caio", Some("B[y]")),
            message(Some(at(2024, 3, 3, 8)), "Duda", Some("C[z]\nD[w]")),
        ];
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 3)).unwrap();
        let records = extract_records(&messages, &range);
        let names: Vec<_> = records.iter().map(|r| r.equipment.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
        assert_eq!(records[1].sender, "Duda");
        // Classification from the first message does not carry over.
        assert_eq!(records[1].classification, None);
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let records = vec![record(None, None, "A", "x"), record(None, None, "B", "y")];
        assert_eq!(apply_filters(&records, &RecordFilter::default()), vec![0, 1]);
    }

    #[test]
    fn test_equality_filters_combine() {
        let records = vec![
            record(None, Some("Inversores"), "I1", "a"),
            record(None, Some("Inversores"), "I2", "b"),
            record(None, Some("Trackers"), "I1", "c"),
            record(None, None, "I1", "d"),
        ];
        let by_type = RecordFilter {
            equipment_type: Some("Inversores".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &by_type), vec![0, 1]);

        let both = RecordFilter {
            equipment_type: Some("Inversores".into()),
            equipment: Some("I1".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &both), vec![0]);
    }

    #[test]
    fn test_description_search_and_regex() {
        let records = vec![
            record(None, None, "A", "Troca de FUSÍVEL"),
            record(None, None, "B", "Limpeza"),
            record(None, None, "C", "Fusível 15A"),
        ];
        let search = RecordFilter {
            description_search: "fusível".into(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &search), vec![0, 2]);

        let mut regex = RecordFilter::default();
        regex.set_regex(r"\d+A$").unwrap();
        assert_eq!(apply_filters(&records, &regex), vec![2]);
    }

    #[test]
    fn test_invalid_regex() {
        let mut filter = RecordFilter::default();
        assert!(filter.set_regex("[invalid").is_err());
        assert!(filter.set_regex("").is_ok());
        assert!(filter.description_regex.is_none());
    }

    #[test]
    fn test_distinct_lists_keep_first_seen_order() {
        let records = vec![
            record(None, Some("Trackers"), "T1", ""),
            record(None, None, "I1", ""),
            record(None, Some("Inversores"), "T1", ""),
            record(None, Some("Trackers"), "T2", ""),
        ];
        assert_eq!(
            distinct_equipment_types(&records),
            vec![Some("Trackers"), None, Some("Inversores")]
        );
        assert_eq!(distinct_equipment(&records), vec!["T1", "I1", "T2"]);
    }

    #[test]
    fn test_partition_has_all_five_groups() {
        let records = vec![
            record(Some(Classification::Materiais), None, "A", ""),
            record(None, None, "B", ""),
            record(Some(Classification::Corretiva), None, "C", ""),
            record(Some(Classification::Materiais), None, "D", ""),
        ];
        let groups = partition_by_classification(&records);
        assert_eq!(groups.len(), 5);
        assert_eq!(groups[0].0, Classification::Corretiva);
        assert_eq!(groups[0].1.len(), 1);
        assert!(groups[1].1.is_empty());
        let materials: Vec<_> = groups[4].1.iter().map(|r| r.equipment.as_str()).collect();
        assert_eq!(materials, vec!["A", "D"]);
    }
}
