//! Heading numbering. Existing numbering tokens are stripped and replaced by
//! the running section counter, so generated `2.3 Methodology` and hand-written
//! `Methodology` both come out numbered consistently.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.]+\s*").expect("static regex"));
static SECTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^SECTION\s*\d+[:.]\s*").expect("static regex"));
static CHAPTER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CHAPTER\s*\d+[:.]\s*").expect("static regex"));

/// Removes `1.`, `2.1.3`, `SECTION 4:` or `CHAPTER 2.` prefixes, in that order.
pub fn strip_existing_numbering(text: &str) -> String {
    let s = LEADING_NUMBER.replace(text, "");
    let s = SECTION_PREFIX.replace(&s, "");
    let s = CHAPTER_PREFIX.replace(&s, "");
    s.trim().to_string()
}

/// `2. METHODOLOGY`
pub fn format_section_heading(section: u32, text: &str) -> String {
    format!("{section}. {}", strip_existing_numbering(text).to_uppercase())
}

/// `2.3 Methodology`
pub fn format_subsection_heading(section: u32, subsection: u32, text: &str) -> String {
    format!("{section}.{subsection} {}", strip_existing_numbering(text))
}

/// Running section/subsection numbers for one document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounter {
    section: u32,
    subsection: u32,
}

impl SectionCounter {
    pub fn section(&self) -> u32 {
        self.section
    }

    /// Advances to the next level-1 section and resets the subsection count.
    pub fn next_section(&mut self, text: &str) -> String {
        self.section += 1;
        self.subsection = 0;
        format_section_heading(self.section, text)
    }

    pub fn next_subsection(&mut self, text: &str) -> String {
        self.subsection += 1;
        format_subsection_heading(self.section, self.subsection, text)
    }
}
