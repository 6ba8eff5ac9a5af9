// SolarMaint - core/summary.rs
//
// Statistics over a record collection.

use crate::core::filter::distinct_equipment_types;
use crate::core::model::{Classification, ParsedRecord, RecordSummary};

/// Compute totals, distinct equipment types and per-classification counts.
///
/// Classification counts are sorted by descending count; equal counts keep
/// priority order. Classifications with no records are omitted.
pub fn summarise<'a, I>(records: I) -> RecordSummary
where
    I: IntoIterator<Item = &'a ParsedRecord>,
    I::IntoIter: Clone,
{
    let iter = records.into_iter();

    let mut counts: Vec<(Classification, usize)> =
        Classification::all().iter().map(|c| (*c, 0)).collect();
    let mut total = 0usize;

    for record in iter.clone() {
        total += 1;
        if let Some(class) = record.classification {
            if let Some((_, n)) = counts.iter_mut().find(|(c, _)| *c == class) {
                *n += 1;
            }
        }
    }

    counts.retain(|(_, n)| *n > 0);
    // Stable sort keeps priority order for ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    RecordSummary {
        total_records: total,
        distinct_equipment_types: distinct_equipment_types(iter).len(),
        by_classification: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class: Option<Classification>, kind: Option<&str>) -> ParsedRecord {
        ParsedRecord {
            classification: class,
            equipment_type: kind.map(str::to_string),
            equipment: "E".into(),
            description: "d".into(),
            sender: "s".into(),
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarise(&Vec::<ParsedRecord>::new());
        assert_eq!(summary, RecordSummary::default());
    }

    #[test]
    fn test_counts_and_ordering() {
        let records = vec![
            record(Some(Classification::Preventiva), Some("Strings")),
            record(Some(Classification::Materiais), Some("Strings")),
            record(Some(Classification::Materiais), Some("Cabos")),
            record(Some(Classification::Corretiva), None),
            record(None, None),
        ];
        let summary = summarise(&records);
        assert_eq!(summary.total_records, 5);
        // Strings, Cabos and the absent type.
        assert_eq!(summary.distinct_equipment_types, 3);
        assert_eq!(
            summary.by_classification,
            vec![
                (Classification::Materiais, 2),
                (Classification::Corretiva, 1),
                (Classification::Preventiva, 1),
            ]
        );
    }

    #[test]
    fn test_summary_over_filtered_view() {
        let records = vec![
            record(Some(Classification::Corretiva), Some("A")),
            record(Some(Classification::Preventiva), Some("B")),
        ];
        let summary = summarise(
            records
                .iter()
                .filter(|r| r.equipment_type.as_deref() == Some("B")),
        );
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.by_classification, vec![(Classification::Preventiva, 1)]);
    }
}
