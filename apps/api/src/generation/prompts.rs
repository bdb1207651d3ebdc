// Prompt constants and builders for academic report generation.
// Templates use `{placeholder}` markers replaced before sending.

use crate::models::report::{AcademicDetails, ReportType};

/// System prompt: section skeleton, citation markers, formatting and the
/// ban on word-count metadata.
pub const REPORT_SYSTEM: &str = r#"You are an expert academic report writer and document analyst. You write comprehensive, well-structured academic reports that follow standard academic formatting.

FORMATTING:
1. Use markdown headings with numbered sections:
   - # 1. SECTION NAME (main sections, upper case)
   - ## 1.1 Subsection Name
   - ### 1.1.1 Sub-subsection (only when needed)

2. Academic reports MUST contain these sections, in order:
   ABSTRACT, INTRODUCTION, LITERATURE REVIEW, METHODOLOGY, RESULTS AND FINDINGS,
   DISCUSSION, CONCLUSION, REFERENCES (placeholder only).

3. Citations:
   - Place numeric markers [1], [2], [3] immediately after every claim drawn from research or sources.
   - Number markers consecutively in order of first appearance.
   - The reference list is generated automatically from the markers you use.

4. Style:
   - **bold** for key terms, *italic* for definitions and emphasis.
   - Tables with a header row for data; bullet and numbered lists where appropriate.
   - Formal, third-person academic tone with clear topic sentences.
   - Every major section at least 200-300 words of substantive analysis.

5. NEVER include word counts, word-count statistics, "(N words)" markers or any other
   metadata about section length. Output ONLY the report content."#;

/// User prompt when a source document is supplied.
pub const DOCUMENT_PROMPT_TEMPLATE: &str = r#"Analyze the following document and write a comprehensive {report_type} based on it.

=== DOCUMENT CONTENT ===
{document}
=== END OF DOCUMENT ===

Report Title: "{title}"
Report Type: {report_type}
Template Style: {template}
{academic_context}{instructions}
Write the COMPLETE report; do not truncate any section.

Add citation markers [1], [2], [3] throughout the report wherever sources, research or claims are referenced. This is mandatory.

Use these numbered sections:
# 1. ABSTRACT
# 2. INTRODUCTION
# 3. LITERATURE REVIEW
# 4. METHODOLOGY
# 5. RESULTS AND FINDINGS
# 6. DISCUSSION
# 7. CONCLUSION

Do not include word counts or any metadata about section length."#;

/// User prompt when only a topic (the title) is given.
pub const TOPIC_PROMPT_TEMPLATE: &str = r#"Write a comprehensive {report_type} on the topic: "{title}"

Report Type: {report_type}
Template Style: {template}
{academic_context}{instructions}
Write the COMPLETE report; every major section needs at least 200-300 words.

Add citation markers [1], [2], [3] throughout the report wherever sources, research or claims are referenced. This is mandatory.

Use these numbered sections:
# 1. ABSTRACT
(a 150-200 word summary of the whole report)

# 2. INTRODUCTION
## 2.1 Background
## 2.2 Objectives
## 2.3 Scope

# 3. LITERATURE REVIEW
## 3.1 Theoretical Framework
## 3.2 Previous Research
## 3.3 Current Trends

# 4. METHODOLOGY
## 4.1 Research Approach
## 4.2 Data Collection
## 4.3 Analysis Methods

# 5. RESULTS AND FINDINGS
## 5.1 Key Findings
## 5.2 Data Analysis
## 5.3 Observations

# 6. DISCUSSION
## 6.1 Interpretation of Results
## 6.2 Implications
## 6.3 Limitations

# 7. CONCLUSION
## 7.1 Summary
## 7.2 Recommendations
## 7.3 Future Work

Do not include word counts or any metadata about section length."#;

pub struct PromptInput<'a> {
    pub title: &'a str,
    pub template: &'a str,
    pub document: &'a str,
    pub instructions: &'a str,
    pub report_type: ReportType,
    pub academic_details: Option<&'a AcademicDetails>,
}

/// Author, institution and optional department/supervisor lines.
pub fn academic_context(details: &AcademicDetails) -> String {
    let or_unspecified = |v: &str| {
        if v.trim().is_empty() {
            "Not specified".to_string()
        } else {
            v.trim().to_string()
        }
    };
    let mut out = format!(
        "Author: {}\nInstitution: {}\n",
        or_unspecified(&details.author_name),
        or_unspecified(&details.institution)
    );
    if let Some(d) = details.department.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("Department: {d}\n"));
    }
    if let Some(s) = details
        .supervisor_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        out.push_str(&format!("Supervisor: {s}\n"));
    }
    out
}

/// Picks the document-analysis variant when source content is present.
pub fn build_user_prompt(input: &PromptInput<'_>) -> String {
    let has_document = !input.document.trim().is_empty();
    let template = if has_document {
        DOCUMENT_PROMPT_TEMPLATE
    } else {
        TOPIC_PROMPT_TEMPLATE
    };

    let academic = input
        .academic_details
        .map(|d| format!("\nAcademic Context:\n{}", academic_context(d)))
        .unwrap_or_default();

    let instructions = match input.instructions.trim() {
        "" => String::new(),
        text if has_document => format!(
            "\n=== USER INSTRUCTIONS ===\n{text}\n=== END OF INSTRUCTIONS ===\n\
             Follow these instructions when analyzing the document and writing the report.\n"
        ),
        text => format!("\nAdditional Context/Instructions:\n{text}\n"),
    };

    template
        .replace("{report_type}", &input.report_type.display_name())
        .replace("{title}", input.title)
        .replace("{template}", input.template)
        .replace("{academic_context}", &academic)
        .replace("{instructions}", &instructions)
        .replace("{document}", input.document)
}
