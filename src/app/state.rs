// SolarMaint - app/state.rs
//
// Report state: the loaded messages, the selected period, the extracted
// records and the record filter. Owned by the CLI driver in main.rs.

use crate::core::dataset;
use crate::core::filter::{self, DateRange, RecordFilter};
use crate::core::model::{Classification, ParsedRecord, RawMessage, RecordSummary};
use crate::core::summary;
use crate::util::error::FilterError;
use chrono::NaiveDate;

/// Top-level report state.
#[derive(Debug)]
pub struct AppState {
    /// All messages from the input sheet.
    pub messages: Vec<RawMessage>,

    /// Earliest and latest message date, if any message has a date.
    pub available: Option<(NaiveDate, NaiveDate)>,

    /// Selected period. None when the sheet has no dated messages.
    pub date_range: Option<DateRange>,

    /// Records extracted from the messages inside `date_range`.
    pub records: Vec<ParsedRecord>,

    /// Current record filter.
    pub filter: RecordFilter,

    /// Indices of records matching the current filter (into `records`).
    pub filtered_indices: Vec<usize>,
}

impl AppState {
    /// Create state over the full available period with no record filter.
    pub fn new(messages: Vec<RawMessage>) -> Self {
        let available = dataset::date_bounds(&messages);
        let mut state = Self {
            messages,
            available,
            date_range: None,
            records: Vec::new(),
            filter: RecordFilter::default(),
            filtered_indices: Vec::new(),
        };
        if let Some((lo, hi)) = available {
            state.date_range = DateRange::new(lo, hi).ok();
        }
        state.extract();
        state
    }

    /// Select a period. Missing bounds default to the available bounds.
    /// Re-extracts records and re-applies the filter.
    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), FilterError> {
        let Some((lo, hi)) = self.available else {
            tracing::debug!("No dated messages; date range ignored");
            return Ok(());
        };
        self.date_range = Some(DateRange::new(start.unwrap_or(lo), end.unwrap_or(hi))?);
        self.extract();
        Ok(())
    }

    /// Replace the record filter and recompute the filtered view.
    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.apply_filters();
    }

    /// Recompute filtered indices from current records and filter.
    pub fn apply_filters(&mut self) {
        self.filtered_indices = filter::apply_filters(&self.records, &self.filter);
    }

    /// Records in the current filtered view, in order.
    pub fn filtered_records(&self) -> Vec<&ParsedRecord> {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.records.get(idx))
            .collect()
    }

    /// The filtered view split by classification.
    pub fn by_classification(&self) -> Vec<(Classification, Vec<&ParsedRecord>)> {
        filter::partition_by_classification(self.filtered_records())
    }

    /// Equipment types present in the selected period, first-seen order.
    pub fn equipment_type_choices(&self) -> Vec<Option<&str>> {
        filter::distinct_equipment_types(&self.records)
    }

    /// Equipment present in the selected period, narrowed to the selected
    /// equipment type when one is set. Other filters do not apply.
    pub fn equipment_choices(&self) -> Vec<&str> {
        match self.filter.equipment_type.as_deref() {
            Some(wanted) => filter::distinct_equipment(
                self.records
                    .iter()
                    .filter(|r| r.equipment_type.as_deref() == Some(wanted)),
            ),
            None => filter::distinct_equipment(&self.records),
        }
    }

    /// Statistics over the filtered view.
    pub fn summary(&self) -> RecordSummary {
        summary::summarise(self.filtered_records())
    }

    /// Number of messages inside the selected period.
    pub fn messages_in_range(&self) -> usize {
        match self.date_range {
            Some(ref range) => self.messages.iter().filter(|m| range.contains(m)).count(),
            None => 0,
        }
    }

    fn extract(&mut self) {
        self.records = match self.date_range {
            Some(ref range) => filter::extract_records(&self.messages, range),
            None => Vec::new(),
        };
        self.apply_filters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(day: u32, sender: &str, text: &str) -> RawMessage {
        RawMessage {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            sender: sender.to_string(),
            text: Some(text.to_string()),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sample() -> Vec<RawMessage> {
        vec![
            msg(1, "Ana", "CORRETIVA\n- Inversores:\nI1[falha]\nI2[alarme]"),
            msg(2, "Bia", "PREVENTIVA\n- Trackers:\nT1[lubrificação]"),
            msg(3, "Caio", "MATERIAIS\n- Inversores:\nI1[fusível]"),
        ]
    }

    #[test]
    fn test_new_covers_full_period() {
        let state = AppState::new(sample());
        assert_eq!(state.available, Some((date(1), date(3))));
        assert_eq!(state.records.len(), 4);
        assert_eq!(state.filtered_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_date_range_end_is_inclusive() {
        let mut state = AppState::new(sample());
        state.set_date_range(Some(date(2)), Some(date(3))).unwrap();
        assert_eq!(state.messages_in_range(), 2);
        assert_eq!(state.records.len(), 2);
        state.set_date_range(None, Some(date(1))).unwrap();
        assert_eq!(state.records.len(), 2);
        assert!(state.set_date_range(Some(date(3)), Some(date(1))).is_err());
    }

    #[test]
    fn test_filters_feed_summary_and_partitions() {
        let mut state = AppState::new(sample());
        state.set_filter(RecordFilter {
            equipment_type: Some("Inversores".into()),
            equipment: Some("I1".into()),
            ..Default::default()
        });
        let view = state.filtered_records();
        assert_eq!(view.len(), 2);

        let summary = state.summary();
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.distinct_equipment_types, 1);

        let groups = state.by_classification();
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[4].1.len(), 1);
    }

    #[test]
    fn test_choices_follow_selected_type() {
        let mut state = AppState::new(sample());
        assert_eq!(
            state.equipment_type_choices(),
            vec![Some("Inversores"), Some("Trackers")]
        );
        assert_eq!(state.equipment_choices(), vec!["I1", "I2", "T1"]);

        state.set_filter(RecordFilter {
            equipment_type: Some("Inversores".into()),
            equipment: Some("I2".into()),
            ..Default::default()
        });
        assert_eq!(state.equipment_choices(), vec!["I1", "I2"]);
    }

    #[test]
    fn test_filter_survives_range_change() {
        let mut state = AppState::new(sample());
        state.set_filter(RecordFilter {
            equipment: Some("T1".into()),
            ..Default::default()
        });
        state.set_date_range(Some(date(3)), None).unwrap();
        assert!(state.filtered_records().is_empty());
    }

    #[test]
    fn test_no_dated_messages() {
        let mut messages = sample();
        for m in &mut messages {
            m.timestamp = None;
        }
        let mut state = AppState::new(messages);
        assert!(state.date_range.is_none());
        assert!(state.records.is_empty());
        assert!(state.set_date_range(Some(date(1)), None).is_ok());
    }
}
