//! Report generation: builds the prompts, makes one text-generation call and
//! cleans the returned markdown.
//!
//! Flow: validate request → build system/user prompts → `ReportWriter::complete`
//!       → strip word-count metadata → collapse blank runs → return content.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::metadata::{is_word_count_line, strip_word_count_metadata};
use crate::errors::AppError;
use crate::generation::prompts::{build_user_prompt, PromptInput, REPORT_SYSTEM};
use crate::llm_client::ReportWriter;
use crate::models::report::{AcademicDetails, ReportType};

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

fn default_template() -> String {
    "professional".to_string()
}

/// Request body for report generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReportRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub document_content: String,
    #[serde(default)]
    pub additional_instructions: String,
    #[serde(default)]
    pub report_type: ReportType,
    pub academic_details: Option<AcademicDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_report(
    writer: &dyn ReportWriter,
    request: &GenerateReportRequest,
) -> Result<GeneratedReport, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    info!(
        report_type = request.report_type.as_str(),
        document_chars = request.document_content.len(),
        "Generating report for title: {title}"
    );

    let user_prompt = build_user_prompt(&PromptInput {
        title,
        template: &request.template,
        document: &request.document_content,
        instructions: &request.additional_instructions,
        report_type: request.report_type,
        academic_details: request.academic_details.as_ref(),
    });

    let raw = writer.complete(REPORT_SYSTEM, &user_prompt).await?;
    let content = clean_generated_report(&raw);

    info!(length = content.len(), "Report generated");
    Ok(GeneratedReport { content })
}

/// Drops metadata-only lines, strips trailing word counts from content lines
/// and collapses three or more newlines into one blank line.
pub fn clean_generated_report(raw: &str) -> String {
    let cleaned: Vec<String> = raw
        .lines()
        .filter(|line| !is_word_count_line(line))
        .map(|line| {
            let stripped = strip_word_count_metadata(line);
            if stripped.len() == line.trim().len() {
                // Untouched: keep original indentation.
                line.trim_end().to_string()
            } else {
                stripped
            }
        })
        .collect();

    BLANK_RUNS
        .replace_all(&cleaned.join("\n"), "\n\n")
        .trim()
        .to_string()
}
