//! Excel-family workbook parsing via `calamine`.
//!
//! Only the first worksheet is read and its first row is the header. The
//! container format (xls, xlsx, xlsb, ods) is detected from the bytes, not
//! from the declared content type.
//!
//! Text cells matching [`MISSING_TOKENS`] are missing, as in CSV input.
//! Purely numeric columns are typed as a whole: integers when every value is
//! whole, floats for every cell as soon as one value has a fraction. Other
//! columns keep each cell's native type.

use std::io::Cursor;

use calamine::{Data, Reader as _, open_workbook_auto_from_rs};
use crime_insights_dataset_models::{CellValue, Dataset};

use crate::csv_reader::MISSING_TOKENS;
use crate::{DatasetError, normalize_headers};

/// Whole floats beyond this magnitude are not exactly representable as `i64`.
const MAX_WHOLE: f64 = 9.0e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Native,
}

/// Parses workbook bytes into a [`Dataset`].
///
/// # Errors
///
/// * [`DatasetError::Spreadsheet`] if the bytes are not a readable workbook
/// * [`DatasetError::Parse`] if the workbook has no worksheet or the first
///   worksheet is empty
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DatasetError::Parse("Workbook contains no worksheets".to_owned()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(DatasetError::Parse(
            "No columns to parse from file".to_owned(),
        ));
    };

    let columns = normalize_headers(header.iter().map(header_name));
    let raw_rows: Vec<&[Data]> = rows.collect();

    let kinds: Vec<ColumnKind> = (0..columns.len())
        .map(|col| {
            let cells: Vec<&Data> = raw_rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|cell| !is_missing(cell))
                .collect();
            infer_kind(&cells)
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(&kinds)
                .map(|(cell, kind)| convert(cell, *kind))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Float(v) if is_whole(*v) => format!("{v:.0}"),
        other => other.to_string(),
    }
}

fn is_whole(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() < MAX_WHOLE
}

fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => MISSING_TOKENS.contains(&s.as_str()),
        _ => false,
    }
}

fn infer_kind(cells: &[&Data]) -> ColumnKind {
    if cells.is_empty() || !cells.iter().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        return ColumnKind::Native;
    }

    if cells
        .iter()
        .all(|c| !matches!(c, Data::Float(v) if !is_whole(*v)))
    {
        ColumnKind::Int
    } else {
        ColumnKind::Float
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert(cell: &Data, kind: ColumnKind) -> CellValue {
    match (kind, cell) {
        (ColumnKind::Float, Data::Int(i)) => CellValue::Float(*i as f64),
        (ColumnKind::Float, Data::Float(v)) => CellValue::Float(*v),
        _ => to_cell(cell),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_cell(cell: &Data) -> CellValue {
    if is_missing(cell) {
        return CellValue::Null;
    }

    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        // Workbooks store every number as a float; whole values read back as
        // integers.
        Data::Float(v) if is_whole(*v) => CellValue::Int(*v as i64),
        Data::Float(v) => CellValue::Float(*v),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn column(ds: &Dataset, name: &str) -> Vec<CellValue> {
        let idx = ds.column_index(name).unwrap();
        ds.rows().iter().map(|row| row[idx].clone()).collect()
    }

    #[test]
    fn converts_cells() {
        assert_eq!(to_cell(&Data::Empty), CellValue::Null);
        assert_eq!(to_cell(&Data::String(String::new())), CellValue::Null);
        assert_eq!(to_cell(&Data::String("n/a".to_string())), CellValue::Null);
        assert_eq!(
            to_cell(&Data::String("NY".to_string())),
            CellValue::Text("NY".to_string())
        );
        assert_eq!(to_cell(&Data::Float(2020.0)), CellValue::Int(2020));
        assert_eq!(to_cell(&Data::Float(1.25)), CellValue::Float(1.25));
        assert_eq!(to_cell(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(to_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn numeric_headers_drop_fraction() {
        assert_eq!(header_name(&Data::Float(2020.0)), "2020");
        assert_eq!(header_name(&Data::String("state".to_string())), "state");
        assert_eq!(header_name(&Data::Empty), "");
    }

    #[test]
    fn types_numeric_columns_as_a_whole() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "state").unwrap();
        sheet.write_number(0, 1, 2020).unwrap();
        sheet.write_string(0, 2, "count").unwrap();
        sheet.write_string(0, 3, "note").unwrap();
        for (row, (state, year, count)) in [("NY", 0.0, 1), ("CA", 1.5, 2), ("TX", 2.0, 3)]
            .into_iter()
            .enumerate()
        {
            let row = u32::try_from(row).unwrap() + 1;
            sheet.write_string(row, 0, state).unwrap();
            sheet.write_number(row, 1, year).unwrap();
            sheet.write_number(row, 2, count).unwrap();
        }
        sheet.write_number(1, 3, 5).unwrap();
        sheet.write_string(2, 3, "late").unwrap();
        sheet.write_string(4, 0, "NY").unwrap();
        sheet.write_number(4, 2, 4).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse_spreadsheet(&bytes).unwrap();

        assert_eq!(ds.columns(), &["state", "2020", "count", "note"]);
        assert_eq!(
            column(&ds, "2020"),
            vec![
                CellValue::Float(0.0),
                CellValue::Float(1.5),
                CellValue::Float(2.0),
                CellValue::Null,
            ]
        );
        assert_eq!(
            column(&ds, "count"),
            vec![
                CellValue::Int(1),
                CellValue::Int(2),
                CellValue::Int(3),
                CellValue::Int(4),
            ]
        );
        assert_eq!(
            column(&ds, "note"),
            vec![
                CellValue::Int(5),
                CellValue::Text("late".to_string()),
                CellValue::Null,
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn missing_value_text_becomes_null() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "crime_type").unwrap();
        sheet.write_string(0, 1, "2020").unwrap();
        for (row, crime) in ["Theft", "NA", "null", "Fraud"].into_iter().enumerate() {
            sheet
                .write_string(u32::try_from(row).unwrap() + 1, 0, crime)
                .unwrap();
        }
        sheet.write_number(1, 1, 7).unwrap();
        sheet.write_string(2, 1, "N/A").unwrap();
        sheet.write_number(3, 1, 8).unwrap();
        sheet.write_string(4, 1, "NaN").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse_spreadsheet(&bytes).unwrap();

        assert_eq!(
            column(&ds, "crime_type"),
            vec![
                CellValue::Text("Theft".to_string()),
                CellValue::Null,
                CellValue::Null,
                CellValue::Text("Fraud".to_string()),
            ]
        );
        assert_eq!(
            column(&ds, "2020"),
            vec![
                CellValue::Int(7),
                CellValue::Null,
                CellValue::Int(8),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn rejects_non_workbook_bytes() {
        let err = parse_spreadsheet(b"state,crime_type\nNY,Theft\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Spreadsheet(_) | DatasetError::Parse(_)
        ));
    }
}
