#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion of uploaded crime datasets.
//!
//! Parses CSV ([`csv_reader`]) and Excel-family workbooks ([`spreadsheet`])
//! into a [`Dataset`], produces the row preview shown to the user, and
//! persists the parsed table as a CSV snapshot ([`snapshot`]).

pub mod csv_reader;
pub mod snapshot;
pub mod spreadsheet;

use std::path::Path;

pub use crime_insights_dataset_models::{CellValue, Dataset, DatasetFormat, Record};

/// Number of rows returned by [`upload`] as a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Errors that can occur while ingesting a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The declared content type is neither CSV nor a spreadsheet.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The payload is not a well-formed table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// CSV tokenization or UTF-8 decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses `bytes` according to `format`.
///
/// # Errors
///
/// * If the bytes are not a well-formed table for the given format
pub fn parse(bytes: &[u8], format: DatasetFormat) -> Result<Dataset, DatasetError> {
    let dataset = match format {
        DatasetFormat::Csv => csv_reader::parse_csv(bytes)?,
        DatasetFormat::Spreadsheet => spreadsheet::parse_spreadsheet(bytes)?,
    };

    log::debug!(
        "Parsed {format} payload of {} bytes into {} rows x {} columns",
        bytes.len(),
        dataset.len(),
        dataset.columns().len()
    );

    Ok(dataset)
}

/// Ingests an uploaded file.
///
/// Classifies `content_type`, parses the full payload, writes it to
/// `snapshot_path` (replacing any earlier snapshot), and returns the first
/// [`PREVIEW_ROWS`] rows in file order.
///
/// # Errors
///
/// * [`DatasetError::UnsupportedFormat`] if the content type is missing or is
///   neither CSV nor a spreadsheet, regardless of the bytes
/// * If parsing fails
/// * If the snapshot cannot be written
pub async fn upload(
    bytes: &[u8],
    content_type: Option<&str>,
    snapshot_path: &Path,
) -> Result<Vec<Record>, DatasetError> {
    let format = content_type
        .and_then(DatasetFormat::from_content_type)
        .ok_or_else(|| {
            DatasetError::UnsupportedFormat(content_type.unwrap_or("<none>").to_string())
        })?;

    let dataset = parse(bytes, format)?;
    let preview = dataset.head(PREVIEW_ROWS);

    snapshot::write_snapshot(&dataset, snapshot_path).await?;

    Ok(preview)
}

/// Turns raw header cells into unique column names.
///
/// Blank headers become `Unnamed: {index}` and repeated names get a `.N`
/// suffix (`state`, `state.1`, ...), so every column can be addressed by name.
pub(crate) fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = Vec::new();

    for (i, header) in raw.into_iter().enumerate() {
        let header = header.as_ref();
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }

    names
}
