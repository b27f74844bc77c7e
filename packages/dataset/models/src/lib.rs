#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular dataset types shared by ingestion and analysis.
//!
//! A [`Dataset`] is an ordered list of column names plus rows of loosely
//! typed [`CellValue`]s. Nothing here is tied to a particular file format;
//! the parsers in `crime_insights_dataset` produce these values and the
//! aggregator in `crime_insights_analysis` consumes them.

use serde::ser::{Serialize, SerializeMap as _, Serializer};
use strum_macros::{AsRefStr, Display};

/// `text/csv`
pub const CSV_CONTENT_TYPE: &str = "text/csv";
/// Legacy Excel workbooks (`.xls`).
pub const XLS_CONTENT_TYPE: &str = "application/vnd.ms-excel";
/// Office Open XML workbooks (`.xlsx`).
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Upload formats accepted by the ingestion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DatasetFormat {
    /// Comma-separated text.
    Csv,
    /// Excel-family workbook.
    Spreadsheet,
}

impl DatasetFormat {
    /// Classifies a declared `Content-Type` header value.
    ///
    /// Parameters such as `; charset=utf-8` and letter case are ignored.
    /// Returns `None` for anything that is neither CSV nor a spreadsheet.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            CSV_CONTENT_TYPE => Some(Self::Csv),
            XLS_CONTENT_TYPE | XLSX_CONTENT_TYPE => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// A single cell in a [`Dataset`].
///
/// Serializes untagged, so `Null` becomes JSON `null`, numbers stay numbers
/// and text stays a string.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl CellValue {
    /// Whether this cell holds no value.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text content if this is a [`CellValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            // Whole floats keep a trailing `.0` so a written snapshot reads
            // back as a float column.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One row rendered as an ordered column → value mapping.
///
/// Serializes as a JSON object whose keys keep the dataset's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `(column, value)` pairs in column order.
    pub fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Looks up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// An in-memory table: ordered column names and rows of cells.
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Builds a dataset, padding short rows with [`CellValue::Null`] and
    /// truncating long ones to the header width.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Column names in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The first `n` rows as ordered records.
    #[must_use]
    pub fn head(&self, n: usize) -> Vec<Record> {
        self.rows
            .iter()
            .take(n)
            .map(|row| Record {
                fields: self.columns.iter().cloned().zip(row.iter().cloned()).collect(),
            })
            .collect()
    }
}
