//! HTTP handler functions for the crime insights API.

use actix_files::NamedFile;
use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{HttpResponse, web};
use crime_insights_server_models::{
    ApiHealth, CrimeAnalysisResponse, PreviewResponse, StatesResponse,
};

use crate::AppState;
use crate::classifier::ClassifierArtifact;
use crate::error::ApiError;

/// Multipart body of `POST /upload-dataset`.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    /// The uploaded table; its part `Content-Type` selects the parser.
    pub file: Bytes,
}

/// Multipart body of `POST /crime-analysis`.
#[derive(Debug, MultipartForm)]
pub struct AnalysisForm {
    /// CSV dataset to analyze.
    pub file: Bytes,
    /// State value to filter on.
    pub state: Text<String>,
    /// Name of the year column.
    pub year: Text<String>,
}

/// `GET /health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        states_loaded: state.states.is_ok(),
        classifier: state.classifier.as_ref().map(ClassifierArtifact::to_api),
    })
}

/// `GET /states`
///
/// Returns the state catalog's keys in stored order.
pub async fn states(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let catalog = state.states.as_ref().map_err(ApiError::states)?;

    Ok(HttpResponse::Ok().json(StatesResponse {
        states: catalog
            .list_states()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    }))
}

/// `GET /`
///
/// Serves the frontend entry document; 404 when the build is absent.
pub async fn index(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.config.index_path()).await?)
}

/// `POST /upload-dataset`
///
/// Parses the uploaded CSV or workbook, replaces the on-disk snapshot, and
/// returns a preview of the first rows.
pub async fn upload_dataset(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, ApiError> {
    let content_type = form.file.content_type.as_ref().map(ToString::to_string);

    log::debug!(
        "Upload {:?} ({} bytes, content type {:?})",
        form.file.file_name,
        form.file.data.len(),
        content_type
    );

    let preview = crime_insights_dataset::upload(
        &form.file.data,
        content_type.as_deref(),
        &state.config.snapshot_path,
    )
    .await
    .map_err(ApiError::upload)?;

    Ok(HttpResponse::Ok().json(PreviewResponse { preview }))
}

/// `POST /crime-analysis`
///
/// Aggregates crime types for the submitted state and year column.
pub async fn crime_analysis(
    MultipartForm(form): MultipartForm<AnalysisForm>,
) -> Result<HttpResponse, ApiError> {
    let result =
        crime_insights_analysis::analyze(&form.file.data, form.state.as_str(), form.year.as_str())
            .map_err(ApiError::analysis)?;

    log::info!(
        "Analyzed state={} year={}: {} categories over {} rows",
        form.state.as_str(),
        form.year.as_str(),
        result.categories.len(),
        result.total
    );

    Ok(HttpResponse::Ok().json(CrimeAnalysisResponse::from(result)))
}
