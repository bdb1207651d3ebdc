//! Axum route handlers for the Figures API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::figures::{ensure_figures_bucket, upload_figure, validate_figure, UploadedFigure};

#[derive(Debug, Serialize)]
pub struct EnsureBucketResponse {
    pub created: bool,
}

/// POST /api/v1/figures/ensure-bucket
pub async fn handle_ensure_bucket(
    State(state): State<AppState>,
) -> Result<Json<EnsureBucketResponse>, AppError> {
    let created = ensure_figures_bucket(
        &state.s3,
        &state.config.figures_bucket,
        &state.config.s3_region,
    )
    .await
    .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(Json(EnsureBucketResponse { created }))
}

/// POST /api/v1/figures
///
/// Multipart form with a single `file` field carrying the image.
pub async fn handle_upload_figure(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFigure>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let ext = validate_figure(&content_type, bytes.len())
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let size = bytes.len();
        let key = upload_figure(
            &state.s3,
            &state.config.figures_bucket,
            ext,
            &content_type,
            bytes,
        )
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

        return Ok(Json(UploadedFigure {
            url: state.config.figure_url(&key),
            key,
            content_type,
            size,
        }));
    }

    Err(AppError::Validation("A 'file' field is required".to_string()))
}
