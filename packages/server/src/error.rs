//! Mapping of domain failures onto HTTP responses.
//!
//! Unsupported uploads are 400, missing columns and empty selections are
//! 404, and everything else is an opaque 500 carrying the failure's text.
//! The body is always `{"error": "..."}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use crime_insights_analysis::AnalysisError;
use crime_insights_dataset::DatasetError;
use crime_insights_server_models::ApiErrorBody;
use crime_insights_states::StateCatalogError;

/// An error reported to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upload with a content type that is neither CSV nor a spreadsheet.
    #[error("Unsupported file format. Please upload a CSV or Excel file.")]
    UnsupportedFormat,

    /// The selected year column does not exist.
    #[error("Selected year is not available in the dataset")]
    MissingColumn,

    /// No rows for the selected state.
    #[error("No data available for the given state")]
    NoDataForState,

    /// No countable rows for the selected state and year.
    #[error("No crime data available for the selected year and state")]
    NoDataForSelection,

    /// The multipart form could not be read.
    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    /// Any other failure.
    #[error("{context}: {message}")]
    Internal {
        /// What the handler was doing.
        context: &'static str,
        /// The underlying failure's description.
        message: String,
    },
}

impl ApiError {
    /// Converts a state catalog failure.
    pub fn states(err: &StateCatalogError) -> Self {
        log::error!("Error retrieving states: {err}");
        Self::Internal {
            context: "An error occurred",
            message: err.to_string(),
        }
    }

    /// Converts an ingestion failure.
    pub fn upload(err: DatasetError) -> Self {
        match err {
            DatasetError::UnsupportedFormat(content_type) => {
                log::warn!("Rejected upload with content type {content_type}");
                Self::UnsupportedFormat
            }
            other => {
                log::error!("Error during file upload: {other}");
                Self::Internal {
                    context: "An error occurred during file upload",
                    message: other.to_string(),
                }
            }
        }
    }

    /// Converts an analysis failure.
    pub fn analysis(err: AnalysisError) -> Self {
        log::error!("Error during analysis: {err}");
        match err {
            AnalysisError::MissingColumn { .. } => Self::MissingColumn,
            AnalysisError::NoDataForState { .. } => Self::NoDataForState,
            AnalysisError::NoDataForSelection { .. } => Self::NoDataForSelection,
            other @ (AnalysisError::Dataset(_) | AnalysisError::MissingRequiredColumn { .. }) => {
                Self::Internal {
                    context: "An error occurred during analysis",
                    message: other.to_string(),
                }
            }
        }
    }

    /// Error handler for the multipart extractor, so malformed forms also
    /// answer with a JSON body.
    pub fn from_multipart(
        err: actix_multipart::MultipartError,
        _req: &HttpRequest,
    ) -> actix_web::Error {
        log::error!("Error reading multipart form: {err}");
        Self::InvalidForm(err.to_string()).into()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedFormat | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::MissingColumn | Self::NoDataForState | Self::NoDataForSelection => {
                StatusCode::NOT_FOUND
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrorBody {
            error: self.to_string(),
        })
    }
}
