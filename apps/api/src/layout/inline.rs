//! Inline emphasis: `**bold**` and `*italic*` split into a flat run list.
//!
//! Scans left to right. At the first `*` that has a partner, a `**…**` pair
//! wins over a `*…*` pair starting at the same position. Unpaired markers stay
//! as literal text; empty runs are dropped.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
            italic: false,
        }
    }
}

pub fn has_emphasis(text: &str) -> bool {
    text.contains('*')
}

pub fn parse_inline(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(open) = rest.find('*') else {
            runs.push(Run::plain(rest));
            break;
        };

        if rest[open..].starts_with("**") {
            if let Some(len) = rest[open + 2..].find("**") {
                runs.push(Run::plain(&rest[..open]));
                runs.push(Run {
                    text: rest[open + 2..open + 2 + len].to_string(),
                    bold: true,
                    italic: false,
                });
                rest = &rest[open + 2 + len + 2..];
                continue;
            }
        }

        if let Some(len) = rest[open + 1..].find('*') {
            runs.push(Run::plain(&rest[..open]));
            runs.push(Run {
                text: rest[open + 1..open + 1 + len].to_string(),
                bold: false,
                italic: true,
            });
            rest = &rest[open + 1 + len + 1..];
            continue;
        }

        runs.push(Run::plain(rest));
        break;
    }

    runs.retain(|r| !r.text.is_empty());
    runs
}

/// The text with emphasis markers removed.
pub fn strip_emphasis(text: &str) -> String {
    parse_inline(text).into_iter().map(|r| r.text).collect()
}
