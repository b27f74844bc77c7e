#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime-type aggregation for a single state and year column.
//!
//! Filters an uploaded dataset to one `state`, keeps the rows that have a
//! value in the selected year column, and counts `crime_type` occurrences.
//! Counts and percentages come from the same filtered row set, so
//! `percentage == count / total * 100` always holds.

use std::collections::HashMap;

use crime_insights_dataset::{DatasetError, csv_reader};
use crime_insights_dataset_models::Dataset;

pub use crime_insights_analysis_models::{AggregationResult, CategoryShare};

/// Column holding the state value rows are filtered on.
pub const STATE_COLUMN: &str = "state";
/// Column holding the crime category label.
pub const CRIME_TYPE_COLUMN: &str = "crime_type";

/// Errors that can occur during analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The uploaded bytes could not be parsed as CSV.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The requested year column does not exist.
    #[error("Year column '{column}' is not available in the dataset")]
    MissingColumn {
        /// The requested column name.
        column: String,
    },

    /// A column the aggregation always needs is absent.
    #[error("Dataset has no '{column}' column")]
    MissingRequiredColumn {
        /// The absent column name.
        column: &'static str,
    },

    /// No rows match the requested state.
    #[error("No data available for state '{state}'")]
    NoDataForState {
        /// The requested state.
        state: String,
    },

    /// Rows exist for the state, but none with both a year value and a
    /// crime type.
    #[error("No crime data available for year '{year}' and state '{state}'")]
    NoDataForSelection {
        /// The requested state.
        state: String,
        /// The requested year column.
        year: String,
    },
}

/// Parses `bytes` as UTF-8 CSV and aggregates it.
///
/// # Errors
///
/// * [`AnalysisError::Dataset`] if the bytes are not a well-formed CSV
/// * Any error from [`analyze_dataset`]
pub fn analyze(bytes: &[u8], state: &str, year: &str) -> Result<AggregationResult, AnalysisError> {
    let dataset = csv_reader::parse_csv(bytes)?;
    analyze_dataset(&dataset, state, year)
}

/// Aggregates crime types for `state` over rows with a value in `year`.
///
/// Checks run in this order, each ending the analysis on failure: the year
/// column exists; some row has `state` equal to the requested state; at
/// least one of those rows has both a year value and a crime type.
///
/// The highest-count category wins ties by first appearance in the data.
///
/// # Errors
///
/// * [`AnalysisError::MissingColumn`] if `year` is not a column
/// * [`AnalysisError::MissingRequiredColumn`] if `state` or `crime_type` is
///   not a column
/// * [`AnalysisError::NoDataForState`] if no row matches `state`
/// * [`AnalysisError::NoDataForSelection`] if nothing is left to count
pub fn analyze_dataset(
    dataset: &Dataset,
    state: &str,
    year: &str,
) -> Result<AggregationResult, AnalysisError> {
    let year_idx = dataset
        .column_index(year)
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: year.to_string(),
        })?;
    let state_idx = required_column(dataset, STATE_COLUMN)?;

    let state_rows: Vec<&Vec<_>> = dataset
        .rows()
        .iter()
        .filter(|row| row[state_idx].as_text() == Some(state))
        .collect();

    if state_rows.is_empty() {
        return Err(AnalysisError::NoDataForState {
            state: state.to_string(),
        });
    }

    let crime_idx = required_column(dataset, CRIME_TYPE_COLUMN)?;

    let mut total: u64 = 0;
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in state_rows
        .iter()
        .filter(|row| !row[year_idx].is_missing())
    {
        total += 1;

        let crime = &row[crime_idx];
        if crime.is_missing() {
            continue;
        }

        let label = crime.to_string();
        if let Some(&pos) = positions.get(&label) {
            counts[pos].1 += 1;
        } else {
            positions.insert(label.clone(), counts.len());
            counts.push((label, 1));
        }
    }

    // Stable sort: equal counts stay in first-appearance order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let Some((highest, _)) = counts.first() else {
        return Err(AnalysisError::NoDataForSelection {
            state: state.to_string(),
            year: year.to_string(),
        });
    };
    let highest_count_crime = highest.clone();

    log::debug!(
        "Aggregated {} categories over {total} rows for state={state} year={year}",
        counts.len()
    );

    let categories = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    Ok(AggregationResult {
        highest_count_crime,
        categories,
        total,
    })
}

fn required_column(dataset: &Dataset, column: &'static str) -> Result<usize, AnalysisError> {
    dataset
        .column_index(column)
        .ok_or(AnalysisError::MissingRequiredColumn { column })
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: u64) -> f64 {
    count as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"state,crime_type,2020\n\
                            NY,Theft,5\n\
                            NY,Theft,3\n\
                            NY,Fraud,1\n";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn aggregates_counts_and_percentages() {
        let result = analyze(SAMPLE, "NY", "2020").unwrap();

        assert_eq!(result.highest_count_crime, "Theft");
        assert_eq!(result.total, 3);
        assert_eq!(
            result.counts().collect::<Vec<_>>(),
            vec![("Theft", 2), ("Fraud", 1)]
        );
        assert_close(result.share("Theft").unwrap().percentage, 66.67);
        assert_close(result.share("Fraud").unwrap().percentage, 33.33);
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let csv = b"state,crime_type,2021\n\
                    TX,Assault,1\nTX,Murder,1\nTX,Robbery,2\nTX,Assault,4\n\
                    TX,Theft,9\nTX,Theft,1\nTX,Fraud,0\n";
        let result = analyze(csv, "TX", "2021").unwrap();
        let sum: f64 = result.percentages().map(|(_, p)| p).sum();
        assert_close(sum, 100.0);
    }

    #[test]
    fn missing_year_column_fails_for_any_state() {
        for state in ["NY", "CA", ""] {
            let err = analyze(SAMPLE, state, "1999").unwrap_err();
            assert!(
                matches!(err, AnalysisError::MissingColumn { ref column } if column == "1999"),
                "{err}"
            );
        }
    }

    #[test]
    fn absent_state_has_no_data() {
        let err = analyze(SAMPLE, "CA", "2020").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataForState { .. }));
    }

    #[test]
    fn state_match_is_exact() {
        let err = analyze(SAMPLE, "ny", "2020").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataForState { .. }));
        let err = analyze(SAMPLE, " NY", "2020").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataForState { .. }));
    }

    #[test]
    fn rows_without_year_are_dropped() {
        let csv = b"state,crime_type,2019,2020\n\
                    NY,Theft,1,\n\
                    NY,Fraud,,4\n\
                    NY,Fraud,2,NA\n\
                    CA,Theft,3,3\n";
        let result = analyze(csv, "NY", "2019").unwrap();
        assert_eq!(
            result.counts().collect::<Vec<_>>(),
            vec![("Theft", 1), ("Fraud", 1)]
        );
        assert_eq!(result.total, 2);

        let result = analyze(csv, "NY", "2020").unwrap();
        assert_eq!(result.counts().collect::<Vec<_>>(), vec![("Fraud", 1)]);
        assert_close(result.share("Fraud").unwrap().percentage, 100.0);
    }

    #[test]
    fn no_year_values_for_state_is_no_selection() {
        let csv = b"state,crime_type,2020\nNY,Theft,\nCA,Theft,1\n";
        let err = analyze(csv, "NY", "2020").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataForSelection { .. }));
    }

    #[test]
    fn ties_resolve_to_first_appearance() {
        let csv = b"state,crime_type,2020\n\
                    NY,Fraud,1\nNY,Theft,1\nNY,Theft,1\nNY,Fraud,1\nNY,Murder,1\n";
        let result = analyze(csv, "NY", "2020").unwrap();
        assert_eq!(result.highest_count_crime, "Fraud");
        assert_eq!(
            result.counts().collect::<Vec<_>>(),
            vec![("Fraud", 2), ("Theft", 2), ("Murder", 1)]
        );
    }

    #[test]
    fn missing_crime_type_counts_toward_total_only() {
        let csv = b"state,crime_type,2020\nNY,Theft,1\nNY,,1\n";
        let result = analyze(csv, "NY", "2020").unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.counts().collect::<Vec<_>>(), vec![("Theft", 1)]);
        assert_close(result.share("Theft").unwrap().percentage, 50.0);
    }

    #[test]
    fn accepts_unlisted_categories() {
        let csv = b"state,crime_type,2020\nNY,Cyberstalking,1\n";
        let result = analyze(csv, "NY", "2020").unwrap();
        assert_eq!(result.highest_count_crime, "Cyberstalking");
    }

    #[test]
    fn missing_required_columns() {
        let csv = b"region,crime_type,2020\nNY,Theft,1\n";
        let err = analyze(csv, "NY", "2020").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingRequiredColumn { column: STATE_COLUMN }
        ));

        let csv = b"state,offense,2020\nNY,Theft,1\n";
        let err = analyze(csv, "NY", "2020").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingRequiredColumn {
                column: CRIME_TYPE_COLUMN
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = analyze(b"state,crime_type,2020\nN\xffY,Theft,1\n", "NY", "2020").unwrap_err();
        assert!(matches!(err, AnalysisError::Dataset(_)));
    }
}
