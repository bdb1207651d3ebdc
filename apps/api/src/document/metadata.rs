//! Word-count metadata noise that text generators append to sections,
//! e.g. `(250 words)`, `**Word Count:** 250`, `***250 words***`.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing metadata on a content line. Applied repeatedly until nothing changes.
static TRAILING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*\(\s*\d+\s+words?\s*\)\s*$",
        r"(?i)\s*\*{1,3}\s*\d+\s+(?:words?|wc)\s*\*{1,3}\s*$",
        r"(?i)\s*\*{0,2}\s*word\s+count\s*\*{0,2}\s*:?\s*\*{0,2}\s*\d+\s*(?:words?)?\s*$",
        r"(?i)\s*\(\s*word\s+count\s*:?\s*\d+\s*(?:words?)?\s*\)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Lines that carry nothing but metadata and are dropped wholesale.
static WHOLE_LINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^[*\-]?\s*\*{0,3}\s*\d+\s+(?:words?|wc)\s*\*{0,3}\s*$",
        r"(?i)^\*{0,2}words?\*{0,2}\s*:\s*\*{0,2}\s*\d+\s*(?:words?)?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Removes word-count metadata from the end of `text`, keeping the content before it.
pub fn strip_word_count_metadata(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut changed = false;
        for re in TRAILING_PATTERNS.iter() {
            let next = re.replace(&current, "");
            if next.len() != current.len() {
                current = next.into_owned();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    current.trim().to_string()
}

/// True for a non-blank line that is metadata and nothing else.
pub fn is_word_count_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    WHOLE_LINE_PATTERNS.iter().any(|re| re.is_match(trimmed))
        || strip_word_count_metadata(trimmed).is_empty()
}
