//! Structure defaults: per report type layout, citation style and section toggles.
//!
//! Resolution order for every field: user override, then the report type default,
//! then the global fallback. Margins and column geometry are in millimetres.

use serde::Serialize;

use crate::models::report::{
    CitationStyle, LayoutType, PartialStructure, ReportStructure, ReportType,
};

/// Gap between the two columns of a two-column page.
pub const COLUMN_GAP_MM: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnConfig {
    pub column_width: f32,
    pub column_gap: f32,
    pub left_column_x: f32,
    pub right_column_x: f32,
}

/// Returns the fixed structural defaults for a report type.
pub fn get_report_type_defaults(report_type: ReportType) -> PartialStructure {
    match report_type {
        ReportType::ResearchPaper => PartialStructure {
            layout: Some(LayoutType::TwoColumn),
            include_keywords: Some(true),
            include_abstract: Some(true),
            include_toc: Some(false),
            citation_style: Some(CitationStyle::Ieee),
            ..Default::default()
        },
        ReportType::Thesis => PartialStructure {
            layout: Some(LayoutType::SingleColumn),
            include_declaration: Some(true),
            include_acknowledgments: Some(true),
            include_list_of_figures: Some(true),
            include_list_of_tables: Some(true),
            include_toc: Some(true),
            include_abstract: Some(true),
            citation_style: Some(CitationStyle::Apa),
            ..Default::default()
        },
        ReportType::LabReport => PartialStructure {
            layout: Some(LayoutType::SingleColumn),
            include_abstract: Some(true),
            include_toc: Some(false),
            citation_style: Some(CitationStyle::Ieee),
            ..Default::default()
        },
        ReportType::CaseStudy => PartialStructure {
            layout: Some(LayoutType::SingleColumn),
            include_executive_summary: Some(true),
            include_abstract: Some(false),
            include_toc: Some(true),
            citation_style: Some(CitationStyle::Harvard),
            ..Default::default()
        },
        ReportType::LiteratureReview => PartialStructure {
            layout: Some(LayoutType::SingleColumn),
            include_abstract: Some(true),
            include_toc: Some(true),
            citation_style: Some(CitationStyle::Apa),
            ..Default::default()
        },
        ReportType::ProjectReport => PartialStructure {
            layout: Some(LayoutType::SingleColumn),
            include_abstract: Some(true),
            include_toc: Some(true),
            citation_style: Some(CitationStyle::Ieee),
            ..Default::default()
        },
    }
}

/// Merges user overrides onto the report type defaults.
///
/// Layout resolves as `user.layout`, else the type default, else single column.
pub fn merge_with_defaults(report_type: ReportType, user: &PartialStructure) -> ReportStructure {
    let defaults = get_report_type_defaults(report_type);
    let pick = |user: Option<bool>, default: Option<bool>, fallback: bool| {
        user.or(default).unwrap_or(fallback)
    };

    ReportStructure {
        include_toc: pick(user.include_toc, defaults.include_toc, true),
        include_abstract: pick(user.include_abstract, defaults.include_abstract, true),
        include_cover_page: pick(user.include_cover_page, defaults.include_cover_page, true),
        include_references: pick(user.include_references, defaults.include_references, true),
        citation_style: user
            .citation_style
            .or(defaults.citation_style)
            .unwrap_or_default(),
        layout: user.layout.or(defaults.layout).unwrap_or_default(),
        include_keywords: pick(user.include_keywords, defaults.include_keywords, false),
        include_declaration: pick(user.include_declaration, defaults.include_declaration, false),
        include_acknowledgments: pick(
            user.include_acknowledgments,
            defaults.include_acknowledgments,
            false,
        ),
        include_list_of_figures: pick(
            user.include_list_of_figures,
            defaults.include_list_of_figures,
            false,
        ),
        include_list_of_tables: pick(
            user.include_list_of_tables,
            defaults.include_list_of_tables,
            false,
        ),
        include_executive_summary: pick(
            user.include_executive_summary,
            defaults.include_executive_summary,
            false,
        ),
    }
}

/// An explicit layout wins; otherwise the report type's default layout decides.
pub fn should_use_two_column(report_type: ReportType, layout: Option<LayoutType>) -> bool {
    match layout {
        Some(layout) => layout == LayoutType::TwoColumn,
        None => get_report_type_defaults(report_type).layout == Some(LayoutType::TwoColumn),
    }
}

pub fn get_margins(report_type: ReportType, layout: Option<LayoutType>) -> Margins {
    if should_use_two_column(report_type, layout) {
        return Margins {
            top: 15.0,
            right: 15.0,
            bottom: 20.0,
            left: 15.0,
        };
    }

    // Wide left margin for binding.
    if report_type == ReportType::Thesis {
        return Margins {
            top: 25.0,
            right: 25.0,
            bottom: 25.0,
            left: 35.0,
        };
    }

    Margins {
        top: 25.0,
        right: 25.0,
        bottom: 25.0,
        left: 25.0,
    }
}

pub fn get_column_config(page_width: f32, margins: &Margins) -> ColumnConfig {
    let available_width = page_width - margins.left - margins.right;
    let column_width = (available_width - COLUMN_GAP_MM) / 2.0;

    ColumnConfig {
        column_width,
        column_gap: COLUMN_GAP_MM,
        left_column_x: margins.left,
        right_column_x: margins.left + column_width + COLUMN_GAP_MM,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
