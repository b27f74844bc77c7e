//! CSV parsing with per-column type inference.
//!
//! The first record is the header. Cells matching one of [`MISSING_TOKENS`]
//! become [`CellValue::Null`]; each remaining column is typed as a whole
//! (integers, then floats, then booleans, falling back to text), so a column
//! holding `5` and `x` is all text rather than a mix.

use crime_insights_dataset_models::{CellValue, Dataset};

use crate::{DatasetError, normalize_headers};

/// Raw cell contents treated as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Parses CSV bytes into a [`Dataset`].
///
/// Rows shorter than the header are padded with missing values; rows longer
/// than the header are rejected.
///
/// # Errors
///
/// * [`DatasetError::Csv`] if the bytes are not valid UTF-8 or not tokenizable
/// * [`DatasetError::Parse`] if there is no header row or a row has too many
///   fields
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::Parse(
            "No columns to parse from file".to_owned(),
        ));
    }
    let columns = normalize_headers(headers.iter());
    let width = columns.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();

    for result in reader.records() {
        let record = result?;

        if record.len() > width {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(DatasetError::Parse(format!(
                "Expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| (!is_missing_token(cell)).then(|| cell.to_owned()))
            .collect();
        row.resize(width, None);
        raw_rows.push(row);
    }

    let kinds: Vec<ColumnKind> = (0..width)
        .map(|col| infer_kind(raw_rows.iter().filter_map(|row| row[col].as_deref())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(cell, kind)| cell.map_or(CellValue::Null, |s| convert(s, *kind)))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    let mut cells = cells.peekable();
    if cells.peek().is_none() {
        return ColumnKind::Text;
    }

    if cells.clone().all(|s| s.trim().parse::<i64>().is_ok()) {
        ColumnKind::Int
    } else if cells.clone().all(|s| s.trim().parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if cells.all(|s| parse_bool(s).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn convert(cell: String, kind: ColumnKind) -> CellValue {
    let parsed = match kind {
        ColumnKind::Int => cell.trim().parse().ok().map(CellValue::Int),
        ColumnKind::Float => cell.trim().parse().ok().map(CellValue::Float),
        ColumnKind::Bool => parse_bool(&cell).map(CellValue::Bool),
        ColumnKind::Text => None,
    };

    parsed.unwrap_or(CellValue::Text(cell))
}
