//! On-disk snapshot of the most recently uploaded dataset.
//!
//! The table is serialized to CSV, written to a uniquely named sibling file
//! and renamed over the target, so concurrent uploads resolve to whichever
//! rename lands last and readers never see a partial file.

use std::path::{Path, PathBuf};

use crime_insights_dataset_models::Dataset;

use crate::DatasetError;

/// Serializes `dataset` as CSV: a header row, then one record per row with
/// missing cells left empty.
///
/// # Errors
///
/// * If the CSV writer fails
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, DatasetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }

    writer
        .into_inner()
        .map_err(|e| DatasetError::Io(e.into_error()))
}

/// Atomically replaces the snapshot at `path` with `dataset`.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// * If serialization fails
/// * If the temporary file cannot be written or renamed into place
pub async fn write_snapshot(dataset: &Dataset, path: &Path) -> Result<(), DatasetError> {
    let bytes = to_csv_bytes(dataset)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    log::info!(
        "Wrote snapshot of {} rows ({} bytes) to {}",
        dataset.len(),
        bytes.len(),
        path.display()
    );

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "snapshot".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()))
}
