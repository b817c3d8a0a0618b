use calamine::{Data, ExcelDateTime};
use chrono::{NaiveDateTime, NaiveTime};

/// A single spreadsheet cell as seen by the report scanner.
///
/// Workbook cells are converted into this type by the loader so the parser
/// never depends on the spreadsheet library directly.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A time-of-day value (Excel serial below one day)
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Text rendering of the cell, used to recognise marker rows.
    ///
    /// Numbers use their shortest decimal form, times render as `HH:MM:SS`
    /// and empty cells as the empty string. No trimming happens here.
    pub fn label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => number.to_string(),
            CellValue::Bool(flag) => flag.to_string(),
            CellValue::Time(time) => time.format("%H:%M:%S").to_string(),
            CellValue::DateTime(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(text) => CellValue::Text(text.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(datetime) => from_excel_datetime(datetime),
            Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
            // Formula errors such as #DIV/0! carry no measurement
            Data::Error(_) => CellValue::Empty,
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(number: f64) -> Self {
        CellValue::Number(number)
    }
}

fn from_excel_datetime(datetime: &ExcelDateTime) -> CellValue {
    match datetime.as_datetime() {
        Some(value) if datetime.as_f64() < 1.0 => CellValue::Time(value.time()),
        Some(value) => CellValue::DateTime(value),
        None => CellValue::Number(datetime.as_f64()),
    }
}
