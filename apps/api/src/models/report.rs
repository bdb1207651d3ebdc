use serde::{Deserialize, Serialize};

/// The kind of academic document being produced. Drives structural defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum ReportType {
    ResearchPaper,
    #[default]
    ProjectReport,
    Thesis,
    LabReport,
    CaseStudy,
    LiteratureReview,
}

impl ReportType {
    /// Wire identifier, e.g. `research-paper`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::ResearchPaper => "research-paper",
            ReportType::ProjectReport => "project-report",
            ReportType::Thesis => "thesis",
            ReportType::LabReport => "lab-report",
            ReportType::CaseStudy => "case-study",
            ReportType::LiteratureReview => "literature-review",
        }
    }

    /// Lower-case, space-separated name used in prompts and on the cover page.
    pub fn display_name(&self) -> String {
        self.as_str().replace('-', " ")
    }
}

/// Unknown identifiers fall back to the default report type instead of failing.
impl From<String> for ReportType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "research-paper" => ReportType::ResearchPaper,
            "project-report" => ReportType::ProjectReport,
            "thesis" => ReportType::Thesis,
            "lab-report" => ReportType::LabReport,
            "case-study" => ReportType::CaseStudy,
            "literature-review" => ReportType::LiteratureReview,
            _ => ReportType::default(),
        }
    }
}

/// Bibliography style. Exactly one is active for a whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    None,
    Apa,
    #[default]
    Ieee,
    Harvard,
    Mla,
    Chicago,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    #[default]
    SingleColumn,
    TwoColumn,
}

/// Author and institution metadata printed on the cover page.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicDetails {
    pub author_name: String,
    pub student_id: Option<String>,
    pub institution: String,
    pub department: Option<String>,
    pub course: Option<String>,
    pub supervisor_name: Option<String>,
    /// ISO date (`YYYY-MM-DD`).
    pub submission_date: String,
}

/// Partially specified structure options: a user's overrides or a report type's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialStructure {
    pub include_toc: Option<bool>,
    pub include_abstract: Option<bool>,
    pub include_cover_page: Option<bool>,
    pub include_references: Option<bool>,
    pub citation_style: Option<CitationStyle>,
    pub layout: Option<LayoutType>,
    pub include_keywords: Option<bool>,
    pub include_declaration: Option<bool>,
    pub include_acknowledgments: Option<bool>,
    pub include_list_of_figures: Option<bool>,
    pub include_list_of_tables: Option<bool>,
    pub include_executive_summary: Option<bool>,
}

/// Fully resolved structure options for one export. Layout never changes mid-document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStructure {
    pub include_toc: bool,
    pub include_abstract: bool,
    pub include_cover_page: bool,
    pub include_references: bool,
    pub citation_style: CitationStyle,
    pub layout: LayoutType,
    pub include_keywords: bool,
    pub include_declaration: bool,
    pub include_acknowledgments: bool,
    pub include_list_of_figures: bool,
    pub include_list_of_tables: bool,
    pub include_executive_summary: bool,
}

/// Everything the caller chose for one academic export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicReportConfig {
    pub report_type: ReportType,
    pub academic_details: AcademicDetails,
    pub structure: PartialStructure,
}

/// One auxiliary key/value item extracted from the source material.
/// Carried through the export untouched by layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}
