use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::llm_client::ReportWriter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation backend. Default: the Perplexity chat-completions client.
    pub writer: Arc<dyn ReportWriter>,
    pub s3: S3Client,
    pub config: Config,
}
