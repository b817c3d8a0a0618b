use crate::dashboard::table;
use crate::labels::Labels;
use crate::result_set::ResultSet;

#[cfg(feature = "web")]
use crate::error::{ReportError, Result};

/// Convert a result set to CSV format
///
/// The header row uses the display names from `labels`. Values containing
/// commas, quotes or newlines are quoted, missing values are left empty.
///
/// # Examples
/// ```
/// use traffic_dashboard::downloader::to_csv;
/// use traffic_dashboard::labels::Labels;
/// use traffic_dashboard::result_set::ResultSet;
///
/// let csv = to_csv(&ResultSet::new(), &Labels::english());
/// assert!(csv.starts_with("Section,Direction,Interval"));
/// ```
pub fn to_csv(results: &ResultSet, labels: &Labels) -> String {
    let table = table(results, labels);
    let mut csv_content = String::new();

    push_csv_line(&mut csv_content, &table.headers);
    for row in &table.rows {
        push_csv_line(&mut csv_content, row);
    }

    csv_content
}

fn push_csv_line(csv_content: &mut String, values: &[String]) {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            csv_content.push(',');
        }
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            let escaped = value.replace('"', "\"\"");
            csv_content.push_str(&format!("\"{}\"", escaped));
        } else {
            csv_content.push_str(value);
        }
    }
    csv_content.push('\n');
}

/// Convert a result set to XLSX format
///
/// Numbers are written as numeric cells and text as strings, so the export
/// can be sorted and charted in any spreadsheet application.
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
#[cfg(feature = "web")]
pub fn to_xlsx(results: &ResultSet, labels: &Labels) -> Result<Vec<u8>> {
    write_xlsx(results, labels).map_err(|e| ReportError::Export(e.to_string()))
}

#[cfg(feature = "web")]
fn write_xlsx(
    results: &ResultSet,
    labels: &Labels,
) -> std::result::Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    use crate::record::{Column, Field};
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, column) in Column::ALL.iter().enumerate() {
        worksheet.write_string(0, c as u16, labels.column(*column))?;
    }

    for (r, sourced) in results.iter().enumerate() {
        let row = (r + 1) as u32;
        for (c, column) in Column::ALL.iter().enumerate() {
            match sourced.field(*column) {
                Field::Text(text) => {
                    worksheet.write_string(row, c as u16, text)?;
                }
                Field::Number(number) if number.is_finite() => {
                    worksheet.write_number(row, c as u16, number)?;
                }
                Field::Number(_) | Field::Missing => {}
            }
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Interval, Measurements, Metric, Record, Section};

    fn results() -> ResultSet {
        let mut measurements = Measurements::default();
        measurements.set(Metric::TotalDelayMin, Some(2.5));
        let mut results = ResultSet::new();
        results.extend_from_file(
            "rel, final.xlsx",
            vec![Record {
                section: Some(Section::Wb),
                direction: Some("Sentido \"Oeste\"".to_string()),
                interval: Interval::Summary,
                measurements,
            }],
        );
        results
    }

    #[test]
    fn test_csv_quotes_special_values() {
        let csv = to_csv(&results(), &Labels::english());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "WB,\"Sentido \"\"Oeste\"\"\",Summary,2.5,,,,,,\"rel, final.xlsx\""
        );
    }

    #[test]
    fn test_csv_uses_localised_headers() {
        let csv = to_csv(&ResultSet::new(), &Labels::portuguese());
        assert!(csv.starts_with("Seção,Direção,Intervalo,Atraso Total (min)"));
    }

    #[cfg(feature = "web")]
    #[test]
    fn test_xlsx_is_a_zip_container() {
        let bytes = to_xlsx(&results(), &Labels::english()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
