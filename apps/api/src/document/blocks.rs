//! Line-oriented markdown parser producing the block sequence the layout engine consumes.
//!
//! Never fails: unterminated code fences and tables are closed at end of input,
//! and anything unrecognised becomes a paragraph.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::metadata::{is_word_count_line, strip_word_count_metadata};
use super::headings::strip_existing_numbering;

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("static regex"));
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---+$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    ListItem { text: String },
    OrderedListItem { text: String },
    Table { rows: Vec<Vec<String>> },
    Code { text: String },
    Space,
}

impl Block {
    /// Characters of content this block carries. Feeds the TOC page estimate.
    pub fn char_len(&self) -> usize {
        match self {
            Block::Heading { text, .. }
            | Block::Paragraph { text }
            | Block::ListItem { text }
            | Block::OrderedListItem { text }
            | Block::Code { text } => text.chars().count(),
            Block::Table { rows } => rows.iter().flatten().map(|c| c.chars().count()).sum(),
            Block::Space => 0,
        }
    }
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    in_code: bool,
    code_lines: Vec<String>,
    in_table: bool,
    table_rows: Vec<Vec<String>>,
    skipping_references: bool,
}

impl ParseState {
    fn flush_table(&mut self) {
        self.in_table = false;
        let rows = std::mem::take(&mut self.table_rows);
        if !rows.is_empty() {
            self.blocks.push(Block::Table { rows });
        }
    }

    fn flush_code(&mut self) {
        self.in_code = false;
        let lines = std::mem::take(&mut self.code_lines);
        self.blocks.push(Block::Code {
            text: lines.join("\n"),
        });
    }
}

/// Parses markdown into blocks. Pure: identical input always yields identical output.
pub fn parse_markdown_to_blocks(content: &str) -> Vec<Block> {
    let mut state = ParseState::default();

    for raw in content.lines() {
        let line = raw.trim_end_matches('\r');

        if is_word_count_line(line) {
            continue;
        }

        if state.skipping_references {
            if line.starts_with("# ") {
                state.skipping_references = false;
            } else {
                continue;
            }
        }

        // Code fences
        if line.trim_start().starts_with("```") {
            if state.in_code {
                state.flush_code();
            } else {
                if state.in_table {
                    state.flush_table();
                }
                state.in_code = true;
            }
            continue;
        }
        if state.in_code {
            state.code_lines.push(line.to_string());
            continue;
        }

        // Tables
        let trimmed = line.trim();
        if trimmed.starts_with('|') {
            state.in_table = true;
            if !is_separator_row(trimmed) {
                state.table_rows.push(split_row(trimmed));
            }
            continue;
        } else if state.in_table {
            state.flush_table();
        }

        // Headings
        if let Some((level, text)) = heading(line) {
            if level == 1 && is_references_heading(text) {
                state.skipping_references = true;
                continue;
            }
            state.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            continue;
        }

        if trimmed.is_empty() || HORIZONTAL_RULE.is_match(trimmed) {
            state.blocks.push(Block::Space);
        } else if ORDERED_ITEM.is_match(line) {
            let rest = ORDERED_ITEM.replace(line, "");
            state.blocks.push(Block::OrderedListItem {
                text: strip_word_count_metadata(&rest),
            });
        } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            state.blocks.push(Block::ListItem {
                text: strip_word_count_metadata(rest),
            });
        } else {
            state.blocks.push(Block::Paragraph {
                text: strip_word_count_metadata(line),
            });
        }
    }

    if state.in_code {
        state.flush_code();
    }
    if state.in_table {
        state.flush_table();
    }

    state.blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("#### ", 4), ("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (level, rest)))
}

fn is_references_heading(text: &str) -> bool {
    strip_existing_numbering(text).eq_ignore_ascii_case("references")
}

fn is_separator_row(line: &str) -> bool {
    line.chars()
        .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

/// Splits `| a | b |` into `["a", "b"]`, dropping the empty outer cells.
fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').collect();
    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
