//! Presentation model built from the combined result set.

use crate::graph::{ChartKind, GroupedBars, grouped_bars};
use crate::labels::Labels;
use crate::record::Column;
use crate::result_set::ResultSet;
use serde::Serialize;

/// Outcome of one upload batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// No file was uploaded
    Waiting,
    /// At least one file produced records
    Processed { files: usize },
    /// No file produced any record
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub bars: GroupedBars,
}

/// Display-ready table: localised headers and formatted cells
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn table(results: &ResultSet, labels: &Labels) -> Table {
    Table {
        headers: labels.headers(),
        rows: results
            .iter()
            .map(|sourced| {
                Column::ALL
                    .iter()
                    .map(|column| sourced.field(*column).display())
                    .collect()
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub status: Status,
    /// Summary rows only
    pub summary: ResultSet,
    /// Every record, for the "show all data" view
    pub records: ResultSet,
    /// Empty when there is no summary row
    pub charts: Vec<Chart>,
}

impl Dashboard {
    pub fn build(records: ResultSet, uploaded_files: usize, labels: &Labels) -> Self {
        let status = if uploaded_files == 0 {
            Status::Waiting
        } else if records.is_empty() {
            Status::Failed
        } else {
            Status::Processed {
                files: uploaded_files,
            }
        };

        let summary = records.summary();
        let charts = if summary.is_empty() {
            Vec::new()
        } else {
            ChartKind::ALL
                .iter()
                .map(|kind| Chart {
                    kind: *kind,
                    title: kind.title(labels).to_string(),
                    bars: grouped_bars(&summary, kind.metric()),
                })
                .collect()
        };

        Self {
            status,
            summary,
            records,
            charts,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.status, Status::Processed { .. })
    }

    pub fn is_waiting(&self) -> bool {
        self.status == Status::Waiting
    }

    pub fn status_message(&self, labels: &Labels) -> String {
        match self.status {
            Status::Processed { files } => labels.processed_message(files),
            Status::Waiting => labels.waiting.clone(),
            Status::Failed => labels.failed.clone(),
        }
    }

    /// The no-summary warning, only for batches that did produce records
    pub fn warning(&self, labels: &Labels) -> Option<String> {
        (self.is_processed() && self.summary.is_empty()).then(|| labels.no_summary.clone())
    }

    pub fn summary_table(&self, labels: &Labels) -> Table {
        table(&self.summary, labels)
    }

    pub fn full_table(&self, labels: &Labels) -> Table {
        table(&self.records, labels)
    }
}
