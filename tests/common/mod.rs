#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

/// One fixture cell
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Fraction of a day, written as an Excel time cell
    Time(f64),
    Empty,
}

pub fn text(value: &'static str) -> Vec<Cell> {
    vec![Cell::Text(value)]
}

pub fn data(label: &'static str, values: [f64; 6]) -> Vec<Cell> {
    let mut row = vec![Cell::Text(label)];
    row.extend(values.into_iter().map(Cell::Number));
    row
}

/// A report with one title row, two sections and two directions.
///
/// Yields 4 interval records and 2 summary records.
pub fn standard_report() -> Vec<Vec<Cell>> {
    vec![
        text("Relatório de Atrasos - Simulação"),
        text("NWB"),
        text("Sentido Norte"),
        data("00:15:00", [1.0, 10.0, 0.5, 5.0, 8.0, 0.4]),
        data("00:30:00", [2.0, 12.0, 0.7, 6.0, 9.0, 0.5]),
        data("Summary", [3.0, 11.0, 1.2, 5.5, 17.0, 0.45]),
        vec![Cell::Empty],
        text("SEB"),
        text("Sentido Sul"),
        data("00:15:00", [0.5, 4.0, 0.1, 1.0, 2.0, 0.1]),
        data("00:30:00", [0.6, 4.5, 0.2, 1.5, 3.0, 0.2]),
        data("Summary", [1.1, 4.25, 0.3, 1.25, 5.0, 0.15]),
    ]
}

/// A report whose rows only contain intervals, without a summary.
pub fn intervals_only_report() -> Vec<Vec<Cell>> {
    vec![
        text("Relatório parcial"),
        text("EB"),
        text("Sentido Leste"),
        data("07:00:00", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
    ]
}

/// Intervals stored as Excel time cells instead of text.
pub fn time_cell_report() -> Vec<Vec<Cell>> {
    let values = [1.0, 10.0, 0.5, 5.0, 8.0, 0.4].map(Cell::Number);
    let mut morning = vec![Cell::Time(0.25)];
    morning.extend(values);
    let mut noon = vec![Cell::Time(0.5)];
    noon.extend([2.0, 12.0, 0.7, 6.0, 9.0, 0.5].map(Cell::Number));
    vec![
        text("Relatório por horário"),
        text("WB"),
        text("Sentido Oeste"),
        morning,
        noon,
    ]
}

/// A summary row with placeholder text and a time-formatted stop time.
pub fn placeholder_report() -> Vec<Vec<Cell>> {
    vec![
        text("Relatório com lacunas"),
        text("NWB"),
        text("Sentido Norte"),
        vec![
            Cell::Text("Summary"),
            Cell::Number(3.0),
            Cell::Text("-"),
            Cell::Time(0.25),
            Cell::Text("n/a"),
            Cell::Number(17.0),
            Cell::Number(0.45),
        ],
    ]
}

/// A report with no recognisable rows.
pub fn unrelated_report() -> Vec<Vec<Cell>> {
    vec![
        text("Inventário"),
        vec![Cell::Text("Item"), Cell::Text("Quantidade")],
        vec![Cell::Text("Cones"), Cell::Number(12.0)],
    ]
}

fn build(rows: &[Vec<Cell>], first_column: u16) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let time_format = Format::new().set_num_format("hh:mm:ss");
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let col = first_column + c as u16;
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(r as u32, col, *value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(r as u32, col, *value)?;
                }
                Cell::Time(value) => {
                    worksheet.write_number_with_format(r as u32, col, *value, &time_format)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(workbook)
}

pub fn write_report(path: &Path, rows: &[Vec<Cell>]) {
    build(rows, 0).unwrap().save(path).unwrap();
}

/// Same as [`write_report`] but starting at another column than A
pub fn write_report_at(path: &Path, rows: &[Vec<Cell>], first_column: u16) {
    build(rows, first_column).unwrap().save(path).unwrap();
}

pub fn report_bytes(rows: &[Vec<Cell>]) -> Vec<u8> {
    build(rows, 0).unwrap().save_to_buffer().unwrap()
}
