#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime insights server.
//!
//! These types are serialized to JSON for the REST API. Field names follow
//! the wire contract the frontend already consumes, which is why the
//! analysis response uses `snake_case` while the health check uses
//! `camelCase`.

use crime_insights_analysis_models::AggregationResult;
use crime_insights_dataset_models::Record;
use serde::ser::{SerializeMap as _, Serializer};
use serde::{Deserialize, Serialize};

/// `GET /states` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesResponse {
    /// State keys in catalog order.
    pub states: Vec<String>,
}

/// `POST /upload-dataset` response.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    /// First rows of the uploaded dataset.
    pub preview: Vec<Record>,
}

/// `POST /crime-analysis` response.
#[derive(Debug, Clone, Serialize)]
pub struct CrimeAnalysisResponse {
    /// Category with the highest count.
    pub highest_count_crime: String,
    /// Category → percentage share, in aggregation order.
    pub pie_data: OrderedMap<f64>,
    /// Category → raw count, in aggregation order.
    pub bar_data: OrderedMap<u64>,
}

impl From<AggregationResult> for CrimeAnalysisResponse {
    fn from(result: AggregationResult) -> Self {
        let pie_data = OrderedMap(
            result
                .percentages()
                .map(|(category, pct)| (category.to_string(), pct))
                .collect(),
        );
        let bar_data = OrderedMap(
            result
                .counts()
                .map(|(category, count)| (category.to_string(), count))
                .collect(),
        );

        Self {
            highest_count_crime: result.highest_count_crime,
            pie_data,
            bar_data,
        }
    }
}

/// String-keyed pairs that serialize as a JSON object without reordering.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable description.
    pub error: String,
}

/// Fingerprint of the classifier artifact loaded at startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClassifier {
    /// Path the artifact was read from.
    pub path: String,
    /// Artifact size in bytes.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the artifact.
    pub sha256: String,
    /// Output labels, indexed by label code.
    pub labels: Vec<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the state catalog loaded successfully.
    pub states_loaded: bool,
    /// Classifier artifact, if one was loaded.
    pub classifier: Option<ApiClassifier>,
}
