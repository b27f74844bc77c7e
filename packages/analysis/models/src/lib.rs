#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the crime-type aggregation.

use serde::{Deserialize, Serialize};

/// Frequency of one crime category within a filtered selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Crime category label as it appears in the dataset.
    pub category: String,
    /// Number of rows with this category.
    pub count: u64,
    /// `count / total * 100`.
    pub percentage: f64,
}

/// Outcome of aggregating one state/year selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Category with the highest count.
    pub highest_count_crime: String,
    /// Per-category shares, highest count first. Equal counts keep the order
    /// in which the categories first appear in the data.
    pub categories: Vec<CategoryShare>,
    /// Rows in the selection with a non-missing year value; the denominator
    /// of every percentage.
    pub total: u64,
}

impl AggregationResult {
    /// `(category, count)` pairs in result order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.categories
            .iter()
            .map(|share| (share.category.as_str(), share.count))
    }

    /// `(category, percentage)` pairs in result order.
    pub fn percentages(&self) -> impl Iterator<Item = (&str, f64)> {
        self.categories
            .iter()
            .map(|share| (share.category.as_str(), share.percentage))
    }

    /// Looks up a single category.
    #[must_use]
    pub fn share(&self, category: &str) -> Option<&CategoryShare> {
        self.categories.iter().find(|s| s.category == category)
    }
}
