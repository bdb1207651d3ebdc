//! Axum route handler for the Export API.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::export_academic_pdf;
use crate::models::report::{AcademicReportConfig, ExtractedData};

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub config: AcademicReportConfig,
    #[serde(default)]
    pub extracted_data: Vec<ExtractedData>,
}

/// POST /api/v1/reports/export
///
/// Returns the PDF as an attachment with an `x-page-count` header.
pub async fn handle_export_pdf(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    // Layout is CPU-bound; the request is moved into the blocking task.
    let artifact = tokio::task::spawn_blocking(move || {
        export_academic_pdf(
            &request.title,
            &request.content,
            &request.config,
            &request.extracted_data,
        )
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        artifact.filename
    ))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid filename header: {e}")))?;

    let mut response = artifact.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert("x-page-count", HeaderValue::from(artifact.page_count));
    headers.insert(
        "x-reading-time-minutes",
        HeaderValue::from(artifact.reading_time_minutes),
    );
    Ok(response)
}
