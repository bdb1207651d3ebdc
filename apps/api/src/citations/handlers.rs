//! Axum route handler for the Citations API.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::citations::{
    extract_citation_numbers, format_citation, format_in_text_citation,
    format_references_section, generate_mock_citations, Citation,
};
use crate::models::report::CitationStyle;

#[derive(Debug, Deserialize)]
pub struct CitationPreviewRequest {
    pub content: String,
    #[serde(default)]
    pub style: CitationStyle,
}

#[derive(Debug, Serialize)]
pub struct CitationPreviewEntry {
    pub number: u64,
    pub in_text: String,
    pub entry: String,
    pub citation: Citation,
}

#[derive(Debug, Serialize)]
pub struct CitationPreviewResponse {
    pub numbers: Vec<u64>,
    pub entries: Vec<CitationPreviewEntry>,
    pub references_markdown: String,
}

/// POST /api/v1/citations/preview
///
/// Resolves the `[N]` markers in `content` and formats the placeholder
/// references in the requested style, as the export would.
pub async fn handle_citation_preview(
    Json(request): Json<CitationPreviewRequest>,
) -> Json<CitationPreviewResponse> {
    let numbers = extract_citation_numbers(&request.content);
    let citations = generate_mock_citations(&numbers);

    let entries = numbers
        .iter()
        .zip(&citations)
        .map(|(&number, citation)| CitationPreviewEntry {
            number,
            in_text: format_in_text_citation(
                &citation.authors,
                citation.year,
                request.style,
                Some(number),
            ),
            entry: format_citation(citation, request.style),
            citation: citation.clone(),
        })
        .collect();

    Json(CitationPreviewResponse {
        references_markdown: format_references_section(&citations, request.style),
        numbers,
        entries,
    })
}
