pub mod health;

use axum::{routing::{get, post}, Router};

use crate::citations::handlers as citations;
use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::storage::handlers as figures;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reports API
        .route(
            "/api/v1/reports/generate",
            post(generation::handle_generate_report),
        )
        .route(
            "/api/v1/reports/generate/upload",
            post(generation::handle_generate_from_upload),
        )
        .route("/api/v1/reports/export", post(export::handle_export_pdf))
        // Citations API
        .route(
            "/api/v1/citations/preview",
            post(citations::handle_citation_preview),
        )
        // Figures API
        .route(
            "/api/v1/figures/ensure-bucket",
            post(figures::handle_ensure_bucket),
        )
        .route("/api/v1/figures", post(figures::handle_upload_figure))
        .with_state(state)
}
