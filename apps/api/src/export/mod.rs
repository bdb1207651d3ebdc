//! Academic PDF export: lays the document out on an A4 canvas and serialises it.
//!
//! `export_academic_pdf` is synchronous and CPU-bound; handlers call it from
//! `spawn_blocking` with owned inputs. One canvas per export, never shared.

pub mod handlers;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::layout::{render_academic_document, write_pdf, Canvas, SurfaceError};
use crate::models::report::{AcademicReportConfig, ExtractedData};

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub reading_time_minutes: usize,
}

/// Lowercases and replaces every non-alphanumeric character with `_`.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn export_filename(title: &str) -> String {
    format!("{}_Academic.pdf", sanitize_filename(title))
}

/// Minutes at 200 words per minute, rounded up.
pub fn calculate_reading_time(content: &str) -> usize {
    content.split_whitespace().count().div_ceil(WORDS_PER_MINUTE)
}

/// Groups auxiliary values by their type, preserving input order within a type.
pub fn group_extracted_data(items: &[ExtractedData]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for item in items {
        grouped
            .entry(item.kind.clone())
            .or_default()
            .push(item.value.clone());
    }
    grouped
}

pub fn export_academic_pdf(
    title: &str,
    content: &str,
    config: &AcademicReportConfig,
    extracted_data: &[ExtractedData],
) -> Result<ExportArtifact, SurfaceError> {
    let grouped = group_extracted_data(extracted_data);
    debug!(groups = grouped.len(), "Extracted data attached to export");

    let mut canvas = Canvas::a4();
    canvas.set_title(title);
    let report = render_academic_document(&mut canvas, title, content, config)?;
    let bytes = write_pdf(&canvas);

    let artifact = ExportArtifact {
        filename: export_filename(title),
        bytes,
        page_count: report.page_count,
        reading_time_minutes: calculate_reading_time(content),
    };

    info!(
        filename = %artifact.filename,
        pages = artifact.page_count,
        two_column = report.two_column,
        size = artifact.bytes.len(),
        "Academic PDF exported"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ReportType;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Deep Learning: A Survey!"), "deep_learning__a_survey_");
        assert_eq!(sanitize_filename("My Report: Draft #2!"), "my_report__draft__2_");
        assert_eq!(export_filename("X-Ray 2"), "x_ray_2_Academic.pdf");
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(calculate_reading_time(""), 0);
        assert_eq!(calculate_reading_time("one"), 1);
        assert_eq!(calculate_reading_time(&"w ".repeat(200)), 1);
        assert_eq!(calculate_reading_time(&"w ".repeat(201)), 2);
    }

    #[test]
    fn test_group_extracted_data() {
        let items = vec![
            ExtractedData {
                kind: "metric".into(),
                value: "92%".into(),
            },
            ExtractedData {
                kind: "date".into(),
                value: "2024".into(),
            },
            ExtractedData {
                kind: "metric".into(),
                value: "0.8".into(),
            },
        ];
        let grouped = group_extracted_data(&items);
        assert_eq!(grouped["metric"], vec!["92%", "0.8"]);
        assert_eq!(grouped["date"], vec!["2024"]);
    }

    #[test]
    fn test_export_produces_pdf() {
        let config = AcademicReportConfig {
            report_type: ReportType::ResearchPaper,
            ..Default::default()
        };
        let artifact = export_academic_pdf(
            "Sparse Attention",
            "# Abstract\nShort.\n# Introduction\nText [1].",
            &config,
            &[],
        )
        .unwrap();
        assert_eq!(artifact.filename, "sparse_attention_Academic.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-"));
        // Cover page, body, references.
        assert_eq!(artifact.page_count, 3);
        assert_eq!(artifact.reading_time_minutes, 1);
    }
}
