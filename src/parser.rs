//! Stateful scanner that turns raw report rows into records.
//!
//! Reports have no header contract. Rows are reclassified by the text of
//! their first cell: a section code or a direction label updates the scan
//! state, a colon-delimited time token or the `Summary` marker emits a
//! record carrying the six measurements found in columns 1 to 6.

use crate::cell::CellValue;
use crate::record::{Interval, Measurements, Metric, Record, SUMMARY_LABEL, Section};
use log::debug;
use thiserror::Error;

/// Substring announcing a direction subsection
pub const DIRECTION_MARKER: &str = "Sentido";

const INTERVAL_PARTS: usize = 3;

/// A data row that was recognised but is too short to carry all measurements
#[derive(Clone, Debug, PartialEq, Error)]
#[error("missing column {column}")]
pub struct Skip {
    pub column: usize,
}

/// Classification of a row by its trimmed first-cell label
#[derive(Clone, Debug, PartialEq)]
pub enum RowKind<'a> {
    Section(Section),
    Direction(&'a str),
    /// A data row; both flags are checked independently
    Data { interval: bool, summary: bool },
    Other,
}

/// `true` when `label` splits on `:` into exactly three parts.
///
/// The test is structural only: `"a:b:c"` qualifies, `"12:34"` does not.
pub fn is_interval(label: &str) -> bool {
    label.split(':').count() == INTERVAL_PARTS
}

pub fn classify(label: &str) -> RowKind<'_> {
    if let Some(section) = Section::from_label(label) {
        return RowKind::Section(section);
    }
    if label.contains(DIRECTION_MARKER) {
        return RowKind::Direction(label);
    }

    let interval = is_interval(label);
    let summary = label == SUMMARY_LABEL;
    if interval || summary {
        RowKind::Data { interval, summary }
    } else {
        RowKind::Other
    }
}

/// Section and direction most recently seen in the current file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanState {
    pub section: Option<Section>,
    pub direction: Option<String>,
}

impl ScanState {
    /// Feed one row. Marker rows update the state and return nothing; data
    /// rows return one outcome per matching data kind.
    pub fn scan_row(&mut self, row: &[CellValue]) -> Vec<Result<Record, Skip>> {
        let label = row.first().map(CellValue::label).unwrap_or_default();
        let label = label.trim();

        match classify(label) {
            RowKind::Section(section) => {
                self.section = Some(section);
                Vec::new()
            }
            RowKind::Direction(direction) => {
                self.direction = Some(direction.to_string());
                Vec::new()
            }
            RowKind::Data { interval, summary } => {
                let mut outcomes = Vec::new();
                if interval {
                    outcomes.push(self.build_record(Interval::Time(label.to_string()), row));
                }
                if summary {
                    outcomes.push(self.build_record(Interval::Summary, row));
                }
                outcomes
            }
            RowKind::Other => Vec::new(),
        }
    }

    fn build_record(&self, interval: Interval, row: &[CellValue]) -> Result<Record, Skip> {
        let mut measurements = Measurements::default();
        for metric in Metric::ALL {
            measurements.set(metric, read_measurement(row, metric.position())?);
        }

        Ok(Record {
            section: self.section,
            direction: self.direction.clone(),
            interval,
            measurements,
        })
    }
}

/// Read one measurement cell. Only a missing column is fatal; a cell that
/// holds no number (placeholder text, booleans, dates) reads as absent.
fn read_measurement(row: &[CellValue], column: usize) -> Result<Option<f64>, Skip> {
    let cell = row.get(column).ok_or(Skip { column })?;

    let value = match cell {
        CellValue::Number(number) => Some(*number),
        CellValue::Text(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    if value.is_none() && !cell.is_empty() {
        debug!("Column {} holds no number: {:?}", column, cell.label());
    }

    Ok(value)
}

/// Scan all rows of one report and return the emitted records in row order.
///
/// Never fails: data rows too short to reach every measurement column are dropped.
pub fn parse<R: AsRef<[CellValue]>>(rows: &[R]) -> Vec<Record> {
    let (_, records) = rows.iter().enumerate().fold(
        (ScanState::default(), Vec::new()),
        |(mut state, mut records), (index, row)| {
            for outcome in state.scan_row(row.as_ref()) {
                match outcome {
                    Ok(record) => records.push(record),
                    Err(skip) => debug!("Skipping row {}: {}", index, skip),
                }
            }
            (state, records)
        },
    );
    records
}
