//! Citation resolver: finds `[N]` markers in body text, synthesises placeholder
//! bibliography records for them and formats those records per citation style.
//!
//! Records are never looked up anywhere; `generate_mock_citations` is a stand-in
//! keyed purely on the marker number.

pub mod handlers;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::report::CitationStyle;

static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("static regex"));

const MOCK_DOIS: [&str; 5] = [
    "10.1016/j.example",
    "10.1109/example",
    "10.1145/example",
    "10.1038/example",
    "10.1126/example",
];

const MOCK_URLS: [&str; 4] = [
    "https://example.com/research",
    "https://doi.org/10.1016/j.example",
    "https://arxiv.org/abs/example",
    "https://scholar.google.com/example",
];

/// A bibliographic record. Authors are written `Last, First`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}

/// Distinct citation numbers in `text`, sorted ascending by value.
///
/// Order of first appearance is not preserved: `"[3] [1] [3] [2]"` yields `[1, 2, 3]`.
/// Markers too large for a `u64` are ignored.
pub fn extract_citation_numbers(text: &str) -> Vec<u64> {
    CITATION_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Placeholder records for `numbers`, dated the current year.
pub fn generate_mock_citations(numbers: &[u64]) -> Vec<Citation> {
    generate_mock_citations_for_year(numbers, chrono::Utc::now().year())
}

pub fn generate_mock_citations_for_year(numbers: &[u64], year: i32) -> Vec<Citation> {
    numbers
        .iter()
        .map(|&n| Citation {
            id: format!("citation-{n}"),
            title: format!("Reference {n}: [Citation to be filled by author]"),
            authors: vec!["Author Name".to_string()],
            year: Some(year),
            journal: Some("Journal Title".to_string()),
            volume: Some("Volume".to_string()),
            pages: Some("Pages".to_string()),
            doi: Some(MOCK_DOIS[(n % MOCK_DOIS.len() as u64) as usize].to_string()),
            url: Some(MOCK_URLS[(n % MOCK_URLS.len() as u64) as usize].to_string()),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Author lists
// ────────────────────────────────────────────────────────────────────────────

/// Splits `Last, First` into its parts. Names without exactly one comma are kept whole.
fn split_name(author: &str) -> Option<(&str, &str)> {
    let mut parts = author.split(',').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(last), Some(first), None) => Some((last, first)),
        _ => None,
    }
}

fn initial(first: &str) -> String {
    first.chars().next().map(String::from).unwrap_or_default()
}

fn format_author_name(author: &str, style: CitationStyle) -> String {
    let Some((last, first)) = split_name(author) else {
        return author.to_string();
    };
    match style {
        CitationStyle::Apa | CitationStyle::Harvard => format!("{last}, {}.", initial(first)),
        CitationStyle::Ieee => format!("{}. {last}", initial(first)),
        CitationStyle::Mla | CitationStyle::Chicago => format!("{last}, {first}"),
        CitationStyle::None => author.to_string(),
    }
}

/// `a, b, and c`
fn join_with_final(names: &[String], conjunction: &str) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, {conjunction} {last}", init.join(", ")),
    }
}

pub fn format_authors(authors: &[String], style: CitationStyle) -> String {
    if authors.is_empty() {
        return String::new();
    }
    let names: Vec<String> = authors
        .iter()
        .map(|a| format_author_name(a, style))
        .collect();
    let first = &names[0];

    match style {
        CitationStyle::Apa => match names.len() {
            1 => first.clone(),
            2 => format!("{} & {}", names[0], names[1]),
            3..=20 => join_with_final(&names, "&"),
            _ => format!("{}, ... {}", names[..19].join(", "), names[names.len() - 1]),
        },
        CitationStyle::Ieee => {
            if names.len() <= 6 {
                join_with_final(&names, "and")
            } else {
                format!("{first} et al.")
            }
        }
        CitationStyle::Harvard => match names.len() {
            1 => first.clone(),
            2 => format!("{} and {}", names[0], names[1]),
            _ => format!("{first} et al."),
        },
        CitationStyle::Mla => match names.len() {
            1 => first.clone(),
            2 => format!("{}, and {}", names[0], names[1]),
            _ => format!("{first}, et al."),
        },
        CitationStyle::Chicago => {
            if names.len() <= 3 {
                join_with_final(&names, "and")
            } else {
                format!("{first} et al.")
            }
        }
        CitationStyle::None => names.join(", "),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reference entries
// ────────────────────────────────────────────────────────────────────────────

/// One reference-list entry. `*...*` marks italics (journal, APA volume).
///
/// When a record has both a DOI and a URL, the DOI is used.
pub fn format_citation(citation: &Citation, style: CitationStyle) -> String {
    if style == CitationStyle::None {
        return String::new();
    }

    let authors = format_authors(&citation.authors, style);
    let year = year_label(citation.year);
    let title = &citation.title;
    let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
    let journal = non_empty(&citation.journal);
    let volume = non_empty(&citation.volume);
    let pages = non_empty(&citation.pages);
    let doi = non_empty(&citation.doi);
    let url = non_empty(&citation.url);
    let doi_url = doi.as_ref().map(|d| format!("https://doi.org/{d}"));

    let mut out = String::new();
    match style {
        CitationStyle::Apa => {
            out.push_str(&format!("{authors} ({year}). {title}."));
            if let Some(j) = &journal {
                out.push_str(&format!(" *{j}*"));
            }
            if let Some(v) = &volume {
                out.push_str(&format!(", *{v}*"));
            }
            if let Some(p) = &pages {
                out.push_str(&format!(", {p}"));
            }
            out.push('.');
            if let Some(d) = &doi_url {
                out.push_str(&format!(" {d}"));
            } else if let Some(u) = &url {
                out.push_str(&format!(" Retrieved from {u}"));
            }
        }
        CitationStyle::Ieee => {
            out.push_str(&format!("{authors}, \"{title},\""));
            if let Some(j) = &journal {
                out.push_str(&format!(" *{j}*"));
            }
            if let Some(v) = &volume {
                out.push_str(&format!(", vol. {v}"));
            }
            if let Some(p) = &pages {
                out.push_str(&format!(", pp. {p}"));
            }
            out.push_str(&format!(", {year}."));
            if let Some(d) = &doi {
                out.push_str(&format!(" doi: {d}"));
            } else if let Some(u) = &url {
                out.push_str(&format!(" [Online]. Available: {u}"));
            }
        }
        CitationStyle::Harvard => {
            out.push_str(&format!("{authors} ({year}) '{title}'"));
            if let Some(j) = &journal {
                out.push_str(&format!(", *{j}*"));
            }
            if let Some(v) = &volume {
                out.push_str(&format!(", {v}"));
            }
            if let Some(p) = &pages {
                out.push_str(&format!(", pp. {p}"));
            }
            out.push('.');
            if let Some(link) = doi_url.as_ref().or(url.as_ref()) {
                out.push_str(&format!(" Available at: {link}"));
            }
        }
        CitationStyle::Mla => {
            out.push_str(&format!("{authors}. \"{title}.\""));
            if let Some(j) = &journal {
                out.push_str(&format!(" *{j}*"));
            }
            if let Some(v) = &volume {
                out.push_str(&format!(", vol. {v}"));
            }
            if let Some(p) = &pages {
                out.push_str(&format!(", pp. {p}"));
            }
            out.push_str(&format!(", {year}."));
            if let Some(link) = doi_url.as_ref().or(url.as_ref()) {
                out.push_str(&format!(" Web. {link}"));
            }
        }
        CitationStyle::Chicago => {
            out.push_str(&format!("{authors}. \"{title}.\""));
            if let Some(j) = &journal {
                out.push_str(&format!(" *{j}*"));
            }
            if let Some(v) = &volume {
                out.push_str(&format!(" {v}"));
            }
            if let Some(p) = &pages {
                out.push_str(&format!(": {p}"));
            }
            out.push_str(&format!(" ({year})."));
            if let Some(d) = &doi_url {
                out.push_str(&format!(" {d}."));
            } else if let Some(u) = &url {
                out.push_str(&format!(" Accessed {u}."));
            }
        }
        CitationStyle::None => {}
    }
    out
}

fn year_label(year: Option<i32>) -> String {
    match year {
        Some(y) if y != 0 => y.to_string(),
        _ => "n.d.".to_string(),
    }
}

/// Inline citation, e.g. `(Smith & Jones, 2021)` or `[4]`.
///
/// IEEE ignores authors and year; a missing number renders as `[?]`.
pub fn format_in_text_citation(
    authors: &[String],
    year: Option<i32>,
    style: CitationStyle,
    number: Option<u64>,
) -> String {
    let surname = |a: &String| a.split(',').next().unwrap_or_default().trim().to_string();
    let first = authors
        .first()
        .map(surname)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let year = year_label(year);

    match style {
        CitationStyle::None => String::new(),
        CitationStyle::Ieee => match number {
            Some(n) if n > 0 => format!("[{n}]"),
            _ => "[?]".to_string(),
        },
        CitationStyle::Apa | CitationStyle::Harvard => {
            let conjunction = if style == CitationStyle::Apa { "&" } else { "and" };
            match authors.len() {
                1 => format!("({first}, {year})"),
                2 => format!("({first} {conjunction} {}, {year})", surname(&authors[1])),
                _ => format!("({first} et al., {year})"),
            }
        }
        CitationStyle::Mla => {
            if authors.len() == 1 {
                format!("({first})")
            } else {
                format!("({first} et al.)")
            }
        }
        CitationStyle::Chicago => match authors.len() {
            1 => format!("({first} {year})"),
            2 | 3 => {
                let list: Vec<String> = authors.iter().map(surname).collect();
                format!("({} {year})", list.join(", "))
            }
            _ => format!("({first} et al. {year})"),
        },
    }
}

/// Markdown references block: `# REFERENCES` followed by a numbered list.
/// Empty when the style is `none` or there are no citations.
pub fn format_references_section(citations: &[Citation], style: CitationStyle) -> String {
    if style == CitationStyle::None || citations.is_empty() {
        return String::new();
    }
    let entries: Vec<String> = citations
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, format_citation(c, style)))
        .collect();
    format!("# REFERENCES\n\n{}", entries.join("\n"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Citation {
        Citation {
            id: "c1".into(),
            title: "Deep Learning for Graphs".into(),
            authors: authors(&["Smith, John", "Jones, Alice"]),
            year: Some(2021),
            journal: Some("Machine Learning Review".into()),
            volume: Some("12".into()),
            pages: Some("45-67".into()),
            doi: Some("10.1000/xyz".into()),
            url: Some("https://example.org/paper".into()),
        }
    }

    #[test]
    fn test_extract_citation_numbers_sorted_unique() {
        assert_eq!(
            extract_citation_numbers("A [3] claim [1] and [3] again [2]"),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_extract_sorts_numerically_not_lexically() {
        assert_eq!(extract_citation_numbers("[10] [9] [100]"), vec![9, 10, 100]);
    }

    #[test]
    fn test_extract_keeps_numbers_beyond_u32() {
        assert_eq!(
            extract_citation_numbers("a [1] b [4294967296] c [99999999999]"),
            vec![1, 4_294_967_296, 99_999_999_999]
        );
    }

    #[test]
    fn test_extract_ignores_non_numeric_brackets() {
        assert!(extract_citation_numbers("[a] [] [1a] [ 2 ]").is_empty());
    }

    #[test]
    fn test_mock_citations_deterministic_and_pooled() {
        let a = generate_mock_citations(&[5]);
        let b = generate_mock_citations(&[5]);
        assert_eq!(a, b);

        let c = &generate_mock_citations_for_year(&[5], 2024)[0];
        assert_eq!(c.id, "citation-5");
        assert_eq!(c.title, "Reference 5: [Citation to be filled by author]");
        assert_eq!(c.doi.as_deref(), Some("10.1016/j.example")); // 5 % 5 = 0
        assert_eq!(c.url.as_deref(), Some("https://doi.org/10.1016/j.example")); // 5 % 4 = 1
        assert_eq!(c.year, Some(2024));
    }

    #[test]
    fn test_format_citation_none_is_empty() {
        assert_eq!(format_citation(&sample(), CitationStyle::None), "");
    }

    #[test]
    fn test_format_citation_apa() {
        assert_eq!(
            format_citation(&sample(), CitationStyle::Apa),
            "Smith, J. & Jones, A. (2021). Deep Learning for Graphs. *Machine Learning Review*, *12*, 45-67. https://doi.org/10.1000/xyz"
        );
    }

    #[test]
    fn test_format_citation_ieee() {
        assert_eq!(
            format_citation(&sample(), CitationStyle::Ieee),
            "J. Smith, and A. Jones, \"Deep Learning for Graphs,\" *Machine Learning Review*, vol. 12, pp. 45-67, 2021. doi: 10.1000/xyz"
        );
    }

    #[test]
    fn test_format_citation_harvard_and_chicago() {
        assert_eq!(
            format_citation(&sample(), CitationStyle::Harvard),
            "Smith, J. and Jones, A. (2021) 'Deep Learning for Graphs', *Machine Learning Review*, 12, pp. 45-67. Available at: https://doi.org/10.1000/xyz"
        );
        assert_eq!(
            format_citation(&sample(), CitationStyle::Chicago),
            "Smith, John, and Jones, Alice. \"Deep Learning for Graphs.\" *Machine Learning Review* 12: 45-67 (2021). https://doi.org/10.1000/xyz."
        );
    }

    #[test]
    fn test_doi_wins_over_url_for_mla() {
        let out = format_citation(&sample(), CitationStyle::Mla);
        assert!(out.ends_with("Web. https://doi.org/10.1000/xyz"), "{out}");
    }

    #[test]
    fn test_url_used_when_no_doi() {
        let mut c = sample();
        c.doi = None;
        assert!(format_citation(&c, CitationStyle::Apa)
            .ends_with("Retrieved from https://example.org/paper"));
        assert!(format_citation(&c, CitationStyle::Ieee)
            .ends_with("[Online]. Available: https://example.org/paper"));
        assert!(format_citation(&c, CitationStyle::Chicago)
            .ends_with("Accessed https://example.org/paper."));
    }

    #[test]
    fn test_missing_year_renders_nd() {
        let mut c = sample();
        c.year = None;
        assert!(format_citation(&c, CitationStyle::Apa).contains("(n.d.)"));
    }

    #[test]
    fn test_ieee_seven_authors_collapse_to_et_al() {
        let seven = authors(&["A, Ann", "B, Bo", "C, Cy", "D, Di", "E, Ed", "F, Flo", "G, Gus"]);
        assert_eq!(format_authors(&seven, CitationStyle::Ieee), "A. A et al.");
        let plain: Vec<String> = (1..=7).map(|i| format!("FirstAuthor{i}")).collect();
        assert_eq!(
            format_authors(&plain, CitationStyle::Ieee),
            "FirstAuthor1 et al."
        );
    }

    #[test]
    fn test_apa_two_authors_use_ampersand() {
        assert_eq!(format_authors(&authors(&["A", "B"]), CitationStyle::Apa), "A & B");
    }

    #[test]
    fn test_apa_many_authors() {
        let three = authors(&["A", "B", "C"]);
        assert_eq!(format_authors(&three, CitationStyle::Apa), "A, B, & C");

        let many: Vec<String> = (1..=22).map(|i| format!("N{i}")).collect();
        let out = format_authors(&many, CitationStyle::Apa);
        assert!(out.starts_with("N1, N2,"));
        assert!(out.ends_with("N19, ... N22"), "{out}");
    }

    #[test]
    fn test_mla_and_chicago_author_lists() {
        let two = authors(&["Smith, John", "Jones, Alice"]);
        assert_eq!(
            format_authors(&two, CitationStyle::Mla),
            "Smith, John, and Jones, Alice"
        );
        let four = authors(&["A", "B", "C", "D"]);
        assert_eq!(format_authors(&four, CitationStyle::Mla), "A, et al.");
        assert_eq!(format_authors(&four, CitationStyle::Chicago), "A et al.");
        assert_eq!(
            format_authors(&four[..3], CitationStyle::Chicago),
            "A, B, and C"
        );
    }

    #[test]
    fn test_in_text_citations() {
        let one = authors(&["Smith, John"]);
        let two = authors(&["Smith, John", "Jones, Alice"]);
        let three = authors(&["Smith, J", "Jones, A", "Lee, K"]);

        assert_eq!(
            format_in_text_citation(&one, Some(2020), CitationStyle::Apa, None),
            "(Smith, 2020)"
        );
        assert_eq!(
            format_in_text_citation(&two, Some(2020), CitationStyle::Apa, None),
            "(Smith & Jones, 2020)"
        );
        assert_eq!(
            format_in_text_citation(&two, None, CitationStyle::Harvard, None),
            "(Smith and Jones, n.d.)"
        );
        assert_eq!(
            format_in_text_citation(&three, Some(2019), CitationStyle::Apa, None),
            "(Smith et al., 2019)"
        );
        assert_eq!(
            format_in_text_citation(&two, Some(2020), CitationStyle::Mla, None),
            "(Smith et al.)"
        );
        assert_eq!(
            format_in_text_citation(&three, Some(2019), CitationStyle::Chicago, None),
            "(Smith, Jones, Lee 2019)"
        );
        assert_eq!(
            format_in_text_citation(&one, Some(2019), CitationStyle::None, None),
            ""
        );
    }

    #[test]
    fn test_in_text_ieee_ignores_authors() {
        let one = authors(&["Smith, John"]);
        assert_eq!(
            format_in_text_citation(&one, Some(2020), CitationStyle::Ieee, Some(4)),
            "[4]"
        );
        assert_eq!(
            format_in_text_citation(&one, Some(2020), CitationStyle::Ieee, None),
            "[?]"
        );
    }

    #[test]
    fn test_references_section_markdown() {
        let cites = generate_mock_citations_for_year(&[1, 2], 2024);
        let md = format_references_section(&cites, CitationStyle::Ieee);
        assert!(md.starts_with("# REFERENCES\n\n1. "));
        assert!(md.contains("\n2. "));
        assert_eq!(format_references_section(&cites, CitationStyle::None), "");
        assert_eq!(format_references_section(&[], CitationStyle::Apa), "");
    }
}
