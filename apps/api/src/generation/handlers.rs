//! Axum route handlers for the Generation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_report, GenerateReportRequest, GeneratedReport,
};
use crate::models::report::ReportType;
use crate::state::AppState;

/// POST /api/v1/reports/generate
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GeneratedReport>, AppError> {
    let report = generate_report(state.writer.as_ref(), &request).await?;
    Ok(Json(report))
}

/// POST /api/v1/reports/generate/upload
///
/// Multipart form: `title`, `template`, `additional_instructions`, `report_type`,
/// `academic_details` (JSON) and a `file` field holding the source PDF.
pub async fn handle_generate_from_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GeneratedReport>, AppError> {
    let mut request = GenerateReportRequest {
        title: String::new(),
        template: "professional".to_string(),
        document_content: String::new(),
        additional_instructions: String::new(),
        report_type: ReportType::default(),
        academic_details: None,
    };
    let mut pdf_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            pdf_bytes = Some(bytes);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
        match name.as_str() {
            "title" => request.title = value,
            "template" if !value.trim().is_empty() => request.template = value,
            "additional_instructions" => request.additional_instructions = value,
            "report_type" => request.report_type = ReportType::from(value),
            "academic_details" if !value.trim().is_empty() => {
                request.academic_details = Some(serde_json::from_str(&value).map_err(|e| {
                    AppError::Validation(format!("academic_details must be JSON: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("A PDF file is required".to_string()))?;

    // Text extraction is CPU-bound.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))?
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    info!(chars = text.len(), "Extracted source document text");
    request.document_content = text;

    let report = generate_report(state.writer.as_ref(), &request).await?;
    Ok(Json(report))
}
