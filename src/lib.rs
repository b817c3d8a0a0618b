/*!
# Traffic Report Dashboard

Reads traffic-simulation delay reports exported as spreadsheets and turns
them into summary tables and charts served as a web page.

## Overview

Report spreadsheets have no header contract. Their rows are a loose mix of
section codes, direction labels, one row per time interval and a closing
`Summary` row per direction. This crate scans those rows, rebuilds the
structure they describe and consolidates any number of reports into one
table.

## Architecture

### Core
- **loader**: opens `.xls`/`.xlsx` workbooks with calamine and yields the
  raw rows of the first worksheet
- **parser**: single-pass scanner carrying the current section and
  direction; emits interval and summary records
- **aggregator**: runs the loader and parser over many files and tags
  every record with its source file
- **result_set**: the combined, ordered result of a batch

### Presentation
- **labels**: localisation table for column names and messages
- **dashboard**: status, summary view and chart data for one batch
- **graph**: grouped-bar charts keyed by direction (SVG with plotters)
- **downloader**: CSV and XLSX exports
- **scratch**: temporary upload storage released after every cycle
- **app** / **settings**: axum routes and server configuration (`web` feature)

## Usage

```no_run
use traffic_dashboard::aggregator::aggregate;

let results = aggregate(&["reports/am_peak.xlsx", "reports/pm_peak.xls"]);
for record in results.summary().iter() {
    println!("{} {:?}", record.source_file, record.record.measurements);
}
```

## HTTP Endpoints

- `GET /` - Upload form
- `POST /report` - Dashboard page for the uploaded reports
- `POST /api/report` - Same result as JSON
- `POST /export/csv`, `POST /export/xlsx` - Combined table as a download
*/

pub mod aggregator;
pub mod cell;
pub mod dashboard;
pub mod downloader;
pub mod error;
pub mod graph;
pub mod labels;
pub mod loader;
pub mod parser;
pub mod record;
pub mod result_set;
pub mod scratch;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod settings;

pub use aggregator::{aggregate, aggregate_dir};
pub use error::{ReportError, Result};
pub use parser::parse;
pub use record::{Interval, Record, Section, SourcedRecord};
pub use result_set::ResultSet;
