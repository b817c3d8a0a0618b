use crate::record::{Record, SourcedRecord};
use serde::Serialize;

/// Ordered, file-tagged records of one processing batch.
///
/// File order and within-file row order are preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<SourcedRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every record with `source_file` and append them in order.
    pub fn extend_from_file(&mut self, source_file: &str, records: Vec<Record>) {
        self.records
            .extend(records.into_iter().map(|record| SourcedRecord {
                record,
                source_file: source_file.to_string(),
            }));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourcedRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[SourcedRecord] {
        &self.records
    }

    /// Only the `Summary` rows, with their section, direction and file kept.
    pub fn summary(&self) -> ResultSet {
        ResultSet {
            records: self
                .records
                .iter()
                .filter(|sourced| sourced.record.interval.is_summary())
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SourcedRecord;
    type IntoIter = std::slice::Iter<'a, SourcedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Interval, Measurements, Section};

    fn record(section: Section, direction: &str, interval: Interval) -> Record {
        Record {
            section: Some(section),
            direction: Some(direction.to_string()),
            interval,
            measurements: Measurements::default(),
        }
    }

    #[test]
    fn test_summary_keeps_only_summary_rows() {
        let mut results = ResultSet::new();
        results.extend_from_file(
            "a.xlsx",
            vec![
                record(Section::Nwb, "Sentido Norte", Interval::Time("00:15:00".into())),
                record(Section::Nwb, "Sentido Norte", Interval::Summary),
            ],
        );
        results.extend_from_file(
            "b.xlsx",
            vec![record(Section::Seb, "Sentido Sul", Interval::Summary)],
        );

        let summary = results.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary.iter().all(|r| r.record.interval.is_summary()));
        assert_eq!(summary.records()[0].source_file, "a.xlsx");
        assert_eq!(summary.records()[0].record.section, Some(Section::Nwb));
        assert_eq!(summary.records()[1].source_file, "b.xlsx");
        assert_eq!(
            summary.records()[1].record.direction.as_deref(),
            Some("Sentido Sul")
        );
    }

    #[test]
    fn test_empty_result_set_serializes_as_empty_list() {
        let results = ResultSet::new();
        assert!(results.is_empty());
        assert_eq!(serde_json::to_string(&results).unwrap(), "[]");
    }
}
