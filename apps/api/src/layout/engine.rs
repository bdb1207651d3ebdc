//! Academic document layout: cover page, table of contents, body in one or two
//! columns, references and page furniture, drawn against any `Surface`.
//!
//! Measurements are millimetres on the page. Every block is placed through a
//! `Flow` cursor, so the single-column and two-column passes share the block
//! placement code and differ only in break policy and sizes.
//!
//! The engine raises no errors of its own. Missing optional details simply skip
//! their part of the page; the only failures are surface faults, which abort
//! the whole render.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::cursor::{ColumnState, Flow, PageCursor, PageGeometry};
use super::font_metrics::{FontSpec, FontStyle};
use super::inline::{has_emphasis, parse_inline, strip_emphasis, Run};
use super::surface::{Align, RectStyle, Rgb, Surface, SurfaceError};
use super::toc::{collect_toc_entries, draw_toc, toc_page_span, TocEntry};
use crate::citations::{extract_citation_numbers, format_citation, generate_mock_citations};
use crate::document::headings::{strip_existing_numbering, SectionCounter};
use crate::document::{parse_markdown_to_blocks, Block};
use crate::models::report::{
    AcademicDetails, AcademicReportConfig, CitationStyle, ReportStructure, ReportType,
};
use crate::structure::{get_column_config, get_margins, merge_with_defaults, should_use_two_column};

const ABSTRACT_PLACEHOLDER: &str = "[Abstract content will appear here from AI-generated report]";
const NO_CITATIONS_NOTE: &str =
    "No citations found in the document. Add citations using [1], [2], etc.";
const BULLET: &str = "\u{2022}";
const HEADER_TITLE_MAX: usize = 50;
const HEADER_TITLE_KEEP: usize = 47;
const TABLE_ROW_HEIGHT: f32 = 8.0;
const LIST_LINE_STEP: f32 = 6.0;

/// Bullet placement for one flow mode, in mm from the flow's left edge.
struct ListStyle {
    size: f32,
    bullet_indent: f32,
    text_indent: f32,
    /// Wrap width is the flow width less this.
    wrap_inset: f32,
    min_space: f32,
}

const SINGLE_COLUMN_LIST: ListStyle = ListStyle {
    size: 11.0,
    bullet_indent: 5.0,
    text_indent: 12.0,
    wrap_inset: 15.0,
    min_space: 0.0,
};

const TWO_COLUMN_LIST: ListStyle = ListStyle {
    size: 10.0,
    bullet_indent: 0.0,
    text_indent: 5.0,
    wrap_inset: 5.0,
    min_space: 10.0,
};

/// What a render produced, for logging and response headers.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub page_count: usize,
    pub two_column: bool,
    pub structure: ReportStructure,
    pub toc_entries: Vec<TocEntry>,
    pub citation_numbers: Vec<u64>,
    pub block_count: usize,
}

/// Lays out `content` (markdown) as an academic document on `surface`.
pub fn render_academic_document(
    surface: &mut dyn Surface,
    title: &str,
    content: &str,
    config: &AcademicReportConfig,
) -> Result<LayoutReport, SurfaceError> {
    let structure = merge_with_defaults(config.report_type, &config.structure);
    let two_column = should_use_two_column(config.report_type, Some(structure.layout));
    let margins = get_margins(config.report_type, Some(structure.layout));
    let (page_width, page_height) = surface.page_size();
    let geometry = PageGeometry::new(page_width, page_height, margins);

    let mut blocks = parse_markdown_to_blocks(content);
    let abstract_text = if two_column && structure.include_abstract {
        let lifted = lift_abstract(&mut blocks).filter(|t| !t.is_empty());
        Some(lifted.unwrap_or_else(|| ABSTRACT_PLACEHOLDER.to_string()))
    } else {
        None
    };

    if structure.include_cover_page {
        draw_cover_page(
            surface,
            &geometry,
            title,
            config.report_type,
            &config.academic_details,
        )?;
        surface.add_page();
    }

    let mut cursor = PageCursor::new(geometry, surface.current_page());

    let toc_entries = if structure.include_toc {
        collect_toc_entries(&blocks)
    } else {
        Vec::new()
    };
    if structure.include_toc {
        let first_content_page = cursor.page + toc_page_span(toc_entries.len(), &geometry);
        draw_toc(surface, &mut cursor, &toc_entries, first_content_page)?;
    }

    let mut sections = SectionCounter::default();
    if two_column {
        if let Some(text) = &abstract_text {
            draw_full_width_abstract(surface, &mut cursor, text)?;
        }
        let columns = get_column_config(page_width, &margins);
        let mut state = ColumnState::new(geometry, columns, cursor.y, cursor.page);
        for block in &blocks {
            place_block_two_column(surface, &mut state, block, &mut sections)?;
        }
    } else {
        for block in &blocks {
            cursor.ensure_space(surface, 20.0);
            place_block_single_column(surface, &mut cursor, block, &mut sections)?;
        }
    }

    let citation_numbers = extract_citation_numbers(content);
    if structure.include_references && structure.citation_style != CitationStyle::None {
        draw_references(
            surface,
            geometry,
            &mut sections,
            &citation_numbers,
            structure.citation_style,
        )?;
    }

    draw_page_furniture(surface, &geometry, title, structure.include_cover_page)?;

    let page_count = surface.page_count();
    debug!(
        page_count,
        two_column,
        blocks = blocks.len(),
        citations = citation_numbers.len(),
        "academic document laid out"
    );

    Ok(LayoutReport {
        page_count,
        two_column,
        structure,
        toc_entries,
        citation_numbers,
        block_count: blocks.len(),
    })
}

/// Removes the level-1 `Abstract` section from `blocks`, returning its text.
fn lift_abstract(blocks: &mut Vec<Block>) -> Option<String> {
    let start = blocks.iter().position(|b| {
        matches!(b, Block::Heading { level: 1, text }
            if strip_existing_numbering(text).eq_ignore_ascii_case("abstract"))
    })?;
    let end = blocks[start + 1..]
        .iter()
        .position(|b| matches!(b, Block::Heading { level: 1, .. }))
        .map(|i| start + 1 + i)
        .unwrap_or(blocks.len());

    let parts: Vec<String> = blocks
        .drain(start..end)
        .skip(1)
        .filter_map(|b| match b {
            Block::Paragraph { text }
            | Block::ListItem { text }
            | Block::OrderedListItem { text } => Some(strip_emphasis(&text)),
            _ => None,
        })
        .filter(|t| !t.is_empty())
        .collect();
    Some(parts.join(" "))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared placement helpers
// ────────────────────────────────────────────────────────────────────────────

fn set_times(surface: &mut dyn Surface, style: FontStyle, size: f32) {
    surface.set_font(FontSpec::times(style, size));
}

/// Word-wraps styled runs starting at the cursor, `indent` mm in from the flow's
/// left edge. Continuation lines may move to a new column or page. The cursor
/// ends one line below the last line drawn.
fn place_runs(
    surface: &mut dyn Surface,
    flow: &mut dyn Flow,
    runs: &[Run],
    indent: f32,
    size: f32,
    line_height: f32,
) -> Result<(), SurfaceError> {
    let mut left = flow.x() + indent;
    let max_width = flow.width() - indent;
    let mut x = left;

    for run in runs {
        let style = match (run.bold, run.italic) {
            (true, _) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Normal,
        };
        set_times(surface, style, size);

        let words: Vec<&str> = run.text.split(' ').collect();
        for (i, word) in words.iter().enumerate() {
            let piece = if i + 1 < words.len() {
                format!("{word} ")
            } else {
                (*word).to_string()
            };
            if piece.is_empty() {
                continue;
            }
            let piece_width = surface.text_width(&piece);

            if x + piece_width > left + max_width && x > left {
                flow.advance(line_height);
                flow.ensure_space(surface, line_height);
                left = flow.x() + indent;
                x = left;
            }

            surface.text(&piece, x, flow.y(), Align::Left)?;
            x += piece_width;
        }
    }

    set_times(surface, FontStyle::Normal, size);
    flow.advance(line_height);
    Ok(())
}

/// Bordered grid in the flow's frame. Header row shaded and bold; each cell
/// shows only the first wrapped line of its text. A table that fits a fresh
/// region moves there whole; a taller one is split by rows, repeating the
/// header at the top of every continuation.
fn place_table(
    surface: &mut dyn Surface,
    flow: &mut dyn Flow,
    rows: &[Vec<String>],
) -> Result<(), SurfaceError> {
    const KEEP_CLEAR: f32 = 25.0;

    let Some((header, body)) = rows.split_first() else {
        return Ok(());
    };
    let col_count = header.len();
    if col_count == 0 {
        return Ok(());
    }

    let mut start = 0;
    loop {
        let remaining = body.len() - start;
        let whole = KEEP_CLEAR + (remaining + 1) as f32 * TABLE_ROW_HEIGHT;
        let region = flow.bottom_limit() - flow.top();
        flow.ensure_space(
            surface,
            if whole <= region { whole } else { 2.0 * TABLE_ROW_HEIGHT },
        );

        let room = flow.bottom_limit() - flow.y();
        let fit = ((room / TABLE_ROW_HEIGHT).floor() as usize).saturating_sub(1).max(1);
        let chunk = &body[start..(start + fit).min(body.len())];

        draw_table_rows(surface, flow.x(), flow.y(), flow.width(), header, chunk)?;
        flow.advance((chunk.len() + 1) as f32 * TABLE_ROW_HEIGHT);

        start += chunk.len();
        if start >= body.len() {
            break;
        }
    }

    flow.advance(10.0);
    Ok(())
}

fn draw_table_rows(
    surface: &mut dyn Surface,
    origin_x: f32,
    origin_y: f32,
    width: f32,
    header: &[String],
    body: &[Vec<String>],
) -> Result<(), SurfaceError> {
    let col_count = header.len();
    let col_width = width / col_count as f32;

    surface.set_draw_color(Rgb::gray(150));
    surface.set_line_width(0.3);
    surface.set_fill_color(Rgb::gray(230));

    for (r, row) in std::iter::once(header).chain(body.iter().map(Vec::as_slice)).enumerate() {
        let is_header = r == 0;
        let y = origin_y + r as f32 * TABLE_ROW_HEIGHT;
        for (c, cell) in row.iter().take(col_count).enumerate() {
            let x = origin_x + c as f32 * col_width;
            if is_header {
                surface.rect(x, y, col_width, TABLE_ROW_HEIGHT, RectStyle::Fill)?;
            }
            surface.rect(x, y, col_width, TABLE_ROW_HEIGHT, RectStyle::Stroke)?;

            let style = if is_header {
                FontStyle::Bold
            } else {
                FontStyle::Normal
            };
            set_times(surface, style, 9.0);
            let first_line = surface
                .split_text_to_size(cell, col_width - 4.0)
                .into_iter()
                .next()
                .unwrap_or_default();
            surface.text(&first_line, x + 2.0, y + 5.0, Align::Left)?;
        }
    }
    Ok(())
}

/// Bulleted item, one wrapped line at a time. The item is kept together when
/// it fits a fresh region; otherwise its lines continue in the next region.
fn place_list_item(
    surface: &mut dyn Surface,
    flow: &mut dyn Flow,
    text: &str,
    style: &ListStyle,
) -> Result<(), SurfaceError> {
    set_times(surface, FontStyle::Normal, style.size);
    let lines =
        surface.split_text_to_size(&strip_emphasis(text), flow.width() - style.wrap_inset);

    let height = (lines.len() as f32 * LIST_LINE_STEP).max(style.min_space);
    let region = flow.bottom_limit() - flow.top();
    flow.ensure_space(surface, height.min(region));
    surface.text(BULLET, flow.x() + style.bullet_indent, flow.y(), Align::Left)?;

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            flow.ensure_space(surface, LIST_LINE_STEP);
        }
        surface.text(line, flow.x() + style.text_indent, flow.y(), Align::Left)?;
        flow.advance(LIST_LINE_STEP);
    }
    flow.advance(2.0);
    Ok(())
}

/// Monospaced lines on a shaded panel. A listing too long for the remaining
/// space continues on a fresh panel in the next column or page.
fn place_code(
    surface: &mut dyn Surface,
    flow: &mut dyn Flow,
    text: &str,
) -> Result<(), SurfaceError> {
    const LINE_STEP: f32 = 4.0;
    const PADDING: f32 = 8.0;

    let lines: Vec<&str> = text.split('\n').collect();
    let mut start = 0;

    while start < lines.len() {
        flow.ensure_space(surface, 25.0);
        let room = flow.bottom_limit() - flow.y();
        let fit = (((room - PADDING) / LINE_STEP).floor().max(1.0)) as usize;
        let chunk = &lines[start..(start + fit).min(lines.len())];

        let x = flow.x();
        let y = flow.y();
        let height = (chunk.len() as f32 * LINE_STEP + PADDING).max(15.0);

        surface.set_fill_color(Rgb::gray(245));
        surface.rect(x, y - 3.0, flow.width(), height, RectStyle::Fill)?;
        surface.set_font(FontSpec::courier(9.0));
        for (i, line) in chunk.iter().enumerate() {
            surface.text(line, x + 3.0, y + i as f32 * LINE_STEP, Align::Left)?;
        }

        flow.advance(height + 5.0);
        start += chunk.len();
    }

    set_times(surface, FontStyle::Normal, 11.0);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Single column
// ────────────────────────────────────────────────────────────────────────────

fn place_block_single_column(
    surface: &mut dyn Surface,
    cursor: &mut PageCursor,
    block: &Block,
    sections: &mut SectionCounter,
) -> Result<(), SurfaceError> {
    let x = cursor.geometry().margins.left;
    let width = cursor.geometry().content_width();

    match block {
        Block::Heading { level, text } => {
            let (heading, pre_check, gap, size, step, after) = match level {
                1 => (sections.next_section(text), 25.0, 10.0, 14.0, 7.0, 8.0),
                2 => (sections.next_subsection(text), 20.0, 6.0, 12.0, 6.0, 6.0),
                _ => (
                    strip_emphasis(&strip_existing_numbering(text)),
                    15.0,
                    4.0,
                    11.0,
                    5.0,
                    5.0,
                ),
            };
            cursor.ensure_space(surface, pre_check);
            cursor.advance(gap);
            set_times(surface, FontStyle::Bold, size);
            let lines = surface.split_text_to_size(&heading, width);
            surface.text_lines(&lines, x, cursor.y, step, Align::Left)?;
            cursor.advance(lines.len() as f32 * step + after);
        }

        Block::Paragraph { text } => {
            if text.trim().is_empty() {
                return Ok(());
            }
            if has_emphasis(text) {
                place_runs(surface, cursor, &parse_inline(text), 10.0, 11.0, 6.0)?;
            } else {
                set_times(surface, FontStyle::Normal, 11.0);
                let lines = surface.split_text_to_size(text, width - 10.0);
                // First line indented, continuation lines flush left.
                for (i, line) in lines.iter().enumerate() {
                    if i == 0 {
                        surface.text(line, x + 10.0, cursor.y, Align::Left)?;
                    } else {
                        cursor.ensure_space(surface, 6.0);
                        surface.text(line, x, cursor.y, Align::Left)?;
                    }
                    cursor.advance(6.0);
                }
            }
            cursor.advance(3.0);
        }

        Block::ListItem { text } | Block::OrderedListItem { text } => {
            place_list_item(surface, cursor, text, &SINGLE_COLUMN_LIST)?;
        }

        Block::Table { rows } => place_table(surface, cursor, rows)?,

        Block::Code { text } => place_code(surface, cursor, text)?,

        Block::Space => cursor.advance(4.0),
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Two columns
// ────────────────────────────────────────────────────────────────────────────

/// Centered `ABSTRACT` title and italic text across the full content width,
/// breaking onto new pages as needed. Leaves the cursor where column flow
/// starts.
fn draw_full_width_abstract(
    surface: &mut dyn Surface,
    cursor: &mut PageCursor,
    text: &str,
) -> Result<(), SurfaceError> {
    const LINE_STEP: f32 = 5.0;

    let geometry = *cursor.geometry();
    cursor.ensure_space(surface, 10.0 + LINE_STEP);
    set_times(surface, FontStyle::Bold, 12.0);
    surface.text("ABSTRACT", geometry.width / 2.0, cursor.y, Align::Center)?;
    cursor.advance(10.0);

    set_times(surface, FontStyle::Italic, 10.0);
    for line in surface.split_text_to_size(text, geometry.content_width()) {
        cursor.ensure_space(surface, LINE_STEP);
        surface.text(&line, geometry.margins.left, cursor.y, Align::Left)?;
        cursor.advance(LINE_STEP);
    }
    cursor.advance(10.0);
    cursor.ensure_space(surface, 20.0);
    Ok(())
}

fn place_block_two_column(
    surface: &mut dyn Surface,
    state: &mut ColumnState,
    block: &Block,
    sections: &mut SectionCounter,
) -> Result<(), SurfaceError> {
    match block {
        Block::Heading { level, text } => {
            let (heading, pre_check, gap, size, step, after) = match level {
                1 => (sections.next_section(text), 15.0, 8.0, 12.0, 6.0, 6.0),
                2 => (sections.next_subsection(text), 12.0, 5.0, 11.0, 6.0, 4.0),
                _ => (
                    strip_emphasis(&strip_existing_numbering(text)),
                    12.0,
                    4.0,
                    10.0,
                    5.0,
                    4.0,
                ),
            };
            state.ensure_space(surface, pre_check);
            state.advance(gap);
            set_times(surface, FontStyle::Bold, size);
            let lines = surface.split_text_to_size(&heading, state.width());
            surface.text_lines(&lines, state.x(), state.y(), step, Align::Left)?;
            state.advance(lines.len() as f32 * step + after);
            set_times(surface, FontStyle::Normal, 10.0);
        }

        Block::Paragraph { text } => {
            if text.trim().is_empty() {
                return Ok(());
            }
            state.ensure_space(surface, 15.0);
            place_runs(surface, state, &parse_inline(text), 0.0, 10.0, 6.0)?;
            state.advance(4.0);
        }

        Block::ListItem { text } | Block::OrderedListItem { text } => {
            place_list_item(surface, state, text, &TWO_COLUMN_LIST)?;
        }

        Block::Table { rows } => place_table(surface, state, rows)?,

        Block::Code { text } => place_code(surface, state, text)?,

        Block::Space => state.advance(4.0),
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Cover, references, page furniture
// ────────────────────────────────────────────────────────────────────────────

fn draw_cover_page(
    surface: &mut dyn Surface,
    geometry: &PageGeometry,
    title: &str,
    report_type: ReportType,
    details: &AcademicDetails,
) -> Result<(), SurfaceError> {
    let center = geometry.width / 2.0;
    let width = geometry.content_width();
    let mut y = geometry.margins.top;

    let institution = details.institution.trim();
    if !institution.is_empty() {
        set_times(surface, FontStyle::Bold, 16.0);
        let lines = surface.split_text_to_size(&institution.to_uppercase(), width);
        surface.text_lines(&lines, center, y, 7.0, Align::Center)?;
        y += lines.len() as f32 * 7.0 + 5.0;
    }

    if let Some(department) = non_blank(details.department.as_deref()) {
        set_times(surface, FontStyle::Normal, 12.0);
        surface.text(department, center, y, Align::Center)?;
    }

    y = geometry.height * 0.35;
    set_times(surface, FontStyle::Bold, 24.0);
    let title_lines = surface.split_text_to_size(&title.to_uppercase(), width);
    surface.text_lines(&title_lines, center, y, 10.0, Align::Center)?;
    y += title_lines.len() as f32 * 10.0 + 10.0;

    set_times(surface, FontStyle::Italic, 12.0);
    let label = format!("A {}", report_type.display_name().to_uppercase());
    surface.text(&label, center, y, Align::Center)?;

    y = geometry.height * 0.65;
    let author = details.author_name.trim();
    if !author.is_empty() {
        set_times(surface, FontStyle::Normal, 11.0);
        surface.text("Submitted by:", center, y, Align::Center)?;
        y += 8.0;

        set_times(surface, FontStyle::Bold, 14.0);
        surface.text(author, center, y, Align::Center)?;
        y += 8.0;

        if let Some(id) = non_blank(details.student_id.as_deref()) {
            set_times(surface, FontStyle::Normal, 11.0);
            surface.text(&format!("ID: {id}"), center, y, Align::Center)?;
            y += 12.0;
        }
    }

    if let Some(supervisor) = non_blank(details.supervisor_name.as_deref()) {
        y += 5.0;
        set_times(surface, FontStyle::Normal, 11.0);
        surface.text("Under the guidance of:", center, y, Align::Center)?;
        y += 8.0;

        set_times(surface, FontStyle::Bold, 12.0);
        surface.text(supervisor, center, y, Align::Center)?;
    }

    if let Some(date) = format_submission_date(&details.submission_date) {
        set_times(surface, FontStyle::Normal, 11.0);
        surface.text(&date, center, geometry.height - 40.0, Align::Center)?;
    }

    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `2025-03-14` (or a timestamp starting with it) → `March 2025`.
pub fn format_submission_date(raw: &str) -> Option<String> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%B %Y").to_string())
}

fn draw_references(
    surface: &mut dyn Surface,
    geometry: PageGeometry,
    sections: &mut SectionCounter,
    numbers: &[u64],
    style: CitationStyle,
) -> Result<(), SurfaceError> {
    let mut cursor = PageCursor::new(geometry, surface.current_page());
    cursor.new_page(surface);
    let x = geometry.margins.left;

    set_times(surface, FontStyle::Bold, 14.0);
    surface.text(&sections.next_section("REFERENCES"), x, cursor.y, Align::Left)?;
    cursor.advance(15.0);

    if numbers.is_empty() {
        set_times(surface, FontStyle::Italic, 11.0);
        surface.set_text_color(Rgb::gray(100));
        surface.text(NO_CITATIONS_NOTE, x, cursor.y, Align::Left)?;
        surface.set_text_color(Rgb::BLACK);
        return Ok(());
    }

    for (i, citation) in generate_mock_citations(numbers).iter().enumerate() {
        cursor.ensure_space(surface, 10.0);
        set_times(surface, FontStyle::Normal, 11.0);
        surface.text(&format!("[{}]", i + 1), x, cursor.y, Align::Left)?;

        let entry = format_citation(citation, style);
        place_runs(surface, &mut cursor, &parse_inline(&entry), 15.0, 11.0, 6.0)?;
        cursor.advance(4.0);
    }

    Ok(())
}

/// Shortens long titles for the running header.
pub fn header_title(title: &str) -> String {
    if title.chars().count() > HEADER_TITLE_MAX {
        let kept: String = title.chars().take(HEADER_TITLE_KEEP).collect();
        format!("{kept}...")
    } else {
        title.to_string()
    }
}

/// Page numbers on every page; running title on every page but the cover.
fn draw_page_furniture(
    surface: &mut dyn Surface,
    geometry: &PageGeometry,
    title: &str,
    has_cover: bool,
) -> Result<(), SurfaceError> {
    let header = header_title(title);
    let first_with_header = if has_cover { 2 } else { 1 };

    for page in 1..=surface.page_count() {
        surface.set_page(page)?;
        set_times(surface, FontStyle::Normal, 10.0);
        surface.set_text_color(Rgb::gray(100));
        surface.text(
            &page.to_string(),
            geometry.width / 2.0,
            geometry.height - 12.0,
            Align::Center,
        )?;

        if page >= first_with_header {
            set_times(surface, FontStyle::Italic, 9.0);
            surface.text(
                &header,
                geometry.width - geometry.margins.right,
                12.0,
                Align::Right,
            )?;
        }
    }

    surface.set_text_color(Rgb::BLACK);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::{Canvas, DrawOp};
    use crate::models::report::{LayoutType, PartialStructure};

    fn config(report_type: ReportType, structure: PartialStructure) -> AcademicReportConfig {
        AcademicReportConfig {
            report_type,
            academic_details: AcademicDetails::default(),
            structure,
        }
    }

    fn bare(layout: LayoutType) -> PartialStructure {
        PartialStructure {
            include_toc: Some(false),
            include_abstract: Some(false),
            include_cover_page: Some(false),
            include_references: Some(false),
            layout: Some(layout),
            ..Default::default()
        }
    }

    fn text_op(canvas: &Canvas, needle: &str) -> (usize, f32, f32, FontSpec) {
        match canvas.find_text(needle) {
            Some((page, DrawOp::Text { x, y, font, .. })) => (page, *x, *y, *font),
            _ => panic!("text {needle:?} not drawn"),
        }
    }

    #[test]
    fn test_two_column_fills_left_before_right_on_one_page() {
        let content: Vec<String> = (1..=40).map(|i| format!("Para{i:02}")).collect();
        let cfg = config(ReportType::ResearchPaper, bare(LayoutType::TwoColumn));
        let mut canvas = Canvas::a4();
        let report =
            render_academic_document(&mut canvas, "Columns", &content.join("\n"), &cfg).unwrap();

        assert!(report.two_column);
        assert_eq!(report.page_count, 1, "40 short paragraphs fit two columns");

        let margins = get_margins(ReportType::ResearchPaper, Some(LayoutType::TwoColumn));
        let cols = get_column_config(210.0, &margins);
        let xs: Vec<f32> = (1..=40)
            .map(|i| text_op(&canvas, &format!("Para{i:02}")).1)
            .collect();

        let first_right = xs
            .iter()
            .position(|x| (*x - cols.right_column_x).abs() < 1e-3)
            .expect("right column used");
        assert!(first_right > 20, "left column filled first");
        assert!(xs[..first_right]
            .iter()
            .all(|x| (*x - cols.left_column_x).abs() < 1e-3));
        assert!(xs[first_right..]
            .iter()
            .all(|x| (*x - cols.right_column_x).abs() < 1e-3));

        // Right column starts back at the top margin.
        let (_, _, y, _) = text_op(&canvas, &format!("Para{:02}", first_right + 1));
        assert!((y - margins.top).abs() < 1e-3);
    }

    #[test]
    fn test_two_column_overflow_starts_new_page_in_left_column() {
        let content: Vec<String> = (1..=60).map(|i| format!("Para{i:02}")).collect();
        let cfg = config(ReportType::ResearchPaper, bare(LayoutType::TwoColumn));
        let mut canvas = Canvas::a4();
        let report =
            render_academic_document(&mut canvas, "Columns", &content.join("\n"), &cfg).unwrap();
        assert_eq!(report.page_count, 2);

        let (page, x, _, _) = text_op(&canvas, "Para60");
        assert_eq!(page, 2);
        assert!((x - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_two_column_abstract_lifted_full_width() {
        let md = "# Abstract\nWe study *graphs*.\n# Introduction\nBody";
        let mut structure = bare(LayoutType::TwoColumn);
        structure.include_abstract = Some(true);
        let cfg = config(ReportType::ResearchPaper, structure);
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", md, &cfg).unwrap();

        let texts = canvas.page_texts(1);
        assert!(texts.contains(&"ABSTRACT"));
        assert!(texts.contains(&"We study graphs."));
        assert!(texts.contains(&"1. INTRODUCTION"), "abstract is not numbered");
        assert!(!texts.iter().any(|t| t.contains("1. ABSTRACT")));
    }

    #[test]
    fn test_two_column_abstract_placeholder_when_missing() {
        let mut structure = bare(LayoutType::TwoColumn);
        structure.include_abstract = Some(true);
        let cfg = config(ReportType::ResearchPaper, structure);
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", "# Intro\nBody", &cfg).unwrap();
        assert!(canvas.page_texts(1).contains(&ABSTRACT_PLACEHOLDER));
    }

    #[test]
    fn test_single_column_headings_numbered() {
        let md = "# 1. Introduction\n## Background\n## 1.2 Scope\n# Methods\n### Detail **x**";
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", md, &cfg).unwrap();

        let texts = canvas.page_texts(1);
        for expected in [
            "1. INTRODUCTION",
            "1.1 Background",
            "1.2 Scope",
            "2. METHODS",
            "Detail x",
        ] {
            assert!(texts.contains(&expected), "missing {expected:?} in {texts:?}");
        }
        let (_, x, _, font) = text_op(&canvas, "1. INTRODUCTION");
        assert_eq!(x, 25.0);
        assert_eq!(font, FontSpec::times(FontStyle::Bold, 14.0));
    }

    #[test]
    fn test_plain_paragraph_first_line_indented() {
        let long = "word ".repeat(80);
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", &long, &cfg).unwrap();

        let xs: Vec<f32> = canvas.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, .. } if text.starts_with("word") => Some(*x),
                _ => None,
            })
            .collect();
        assert!(xs.len() >= 2);
        assert_eq!(xs[0], 35.0);
        assert!(xs[1..].iter().all(|x| *x == 25.0));
    }

    #[test]
    fn test_formatted_paragraph_switches_fonts() {
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", "Plain **strong** *soft*", &cfg).unwrap();
        assert_eq!(text_op(&canvas, "strong").3.style, FontStyle::Bold);
        assert_eq!(text_op(&canvas, "soft").3.style, FontStyle::Italic);
        assert_eq!(text_op(&canvas, "Plain ").1, 35.0);
    }

    #[test]
    fn test_table_grid_and_header() {
        let md = "| Metric | Value |\n|---|---|\n| Accuracy | 0.93 |";
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", md, &cfg).unwrap();

        let ops = &canvas.pages()[0].ops;
        let fills = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { style: RectStyle::Fill, .. }))
            .count();
        let strokes = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { style: RectStyle::Stroke, .. }))
            .count();
        assert_eq!(fills, 2, "header cells shaded");
        assert_eq!(strokes, 4, "every cell bordered");
        assert_eq!(text_op(&canvas, "Metric").3.style, FontStyle::Bold);
        assert_eq!(text_op(&canvas, "Accuracy").3.style, FontStyle::Normal);
        // Second column starts half way across the 160mm content width.
        assert!((text_op(&canvas, "Value").1 - (25.0 + 80.0 + 2.0)).abs() < 1e-3);
    }

    /// Every body text op on every page, skipping the gray header and footer.
    fn body_text_ys(canvas: &Canvas) -> Vec<(usize, String, f32)> {
        canvas
            .pages()
            .iter()
            .enumerate()
            .flat_map(|(i, page)| {
                page.ops.iter().filter_map(move |op| match op {
                    DrawOp::Text { text, y, color, .. } if *color == Rgb::BLACK => {
                        Some((i + 1, text.clone(), *y))
                    }
                    _ => None,
                })
            })
            .collect()
    }

    #[test]
    fn test_tall_table_splits_by_rows_with_repeated_header() {
        let mut md = String::from("| Key | Value |\n|---|---|\n");
        for i in 0..45 {
            md.push_str(&format!("| r{i} | v{i} |\n"));
        }
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", &md, &cfg).unwrap();
        let limit = 297.0 - 25.0 - 15.0;

        assert_eq!(report.page_count, 2);
        assert_eq!(text_op(&canvas, "r0").0, 1, "no blank page before the table");
        assert_eq!(text_op(&canvas, "r44").0, 2);
        for page in 1..=2 {
            assert!(canvas.page_texts(page).contains(&"Key"), "header on page {page}");
        }
        for i in 0..45 {
            let label = format!("r{i}");
            let drawn = body_text_ys(&canvas)
                .iter()
                .filter(|(_, text, _)| *text == label)
                .count();
            assert_eq!(drawn, 1, "{label} drawn once");
        }
        for page in canvas.pages() {
            for op in &page.ops {
                if let DrawOp::Rect { y, h, .. } = op {
                    assert!(y + h <= limit + 1e-3, "row bottom {} past {limit}", y + h);
                }
            }
        }
    }

    #[test]
    fn test_table_at_top_of_page_does_not_add_blank_page() {
        let mut md = String::from("| A |\n");
        for i in 0..60 {
            md.push_str(&format!("| x{i} |\n"));
        }
        let cfg = config(ReportType::ResearchPaper, bare(LayoutType::TwoColumn));
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", &md, &cfg).unwrap();

        let margins = get_margins(ReportType::ResearchPaper, Some(LayoutType::TwoColumn));
        let limit = PageGeometry::new(210.0, 297.0, margins).bottom_limit();
        assert_eq!(text_op(&canvas, "x0").0, 1);
        assert!(body_text_ys(&canvas).iter().all(|(_, _, y)| *y <= limit));
    }

    #[test]
    fn test_long_list_item_continues_on_next_page() {
        let md = format!("- {}", "item ".repeat(2000));
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", &md, &cfg).unwrap();
        let limit = 297.0 - 25.0 - 15.0;

        assert!(report.page_count >= 2);
        let ys = body_text_ys(&canvas);
        assert!(ys.iter().all(|(_, _, y)| *y <= limit));
        assert_eq!(ys.iter().filter(|(_, t, _)| t == BULLET).count(), 1);
        assert!(canvas.page_texts(1).contains(&BULLET));
    }

    #[test]
    fn test_long_abstract_paginates_before_columns() {
        let md = format!("# Abstract\n{}\n# Introduction\nBody", "result ".repeat(3000));
        let mut structure = bare(LayoutType::TwoColumn);
        structure.include_abstract = Some(true);
        let cfg = config(ReportType::ResearchPaper, structure);
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", &md, &cfg).unwrap();

        let margins = get_margins(ReportType::ResearchPaper, Some(LayoutType::TwoColumn));
        let limit = PageGeometry::new(210.0, 297.0, margins).bottom_limit();
        assert!(report.page_count >= 3);
        let ys = body_text_ys(&canvas);
        assert!(
            ys.iter().all(|(_, _, y)| *y <= limit),
            "text below {limit}: {:?}",
            ys.iter().find(|(_, _, y)| *y > limit)
        );

        let (intro_page, _, intro_y, _) = text_op(&canvas, "1. INTRODUCTION");
        let last_abstract_page = ys
            .iter()
            .filter(|(_, t, _)| t.starts_with("result"))
            .map(|(p, _, _)| *p)
            .max()
            .unwrap();
        assert!(intro_page >= last_abstract_page);
        assert!(intro_y <= limit);
    }

    #[test]
    fn test_long_code_block_continues_on_next_page() {
        let code: Vec<String> = (0..120).map(|i| format!("line_{i}")).collect();
        let md = format!("```\n{}\n```", code.join("\n"));
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", &md, &cfg).unwrap();

        assert!(report.page_count >= 2);
        assert_eq!(text_op(&canvas, "line_0").0, 1);
        assert_eq!(text_op(&canvas, "line_119").0, report.page_count);
        assert_eq!(text_op(&canvas, "line_0").3, FontSpec::courier(9.0));
    }

    #[test]
    fn test_references_page_with_entries() {
        let md = "# Intro\nClaim [2] and [1] and [2].";
        let structure = PartialStructure {
            include_references: Some(true),
            citation_style: Some(CitationStyle::Ieee),
            ..bare(LayoutType::SingleColumn)
        };
        let cfg = config(ReportType::LabReport, structure);
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", md, &cfg).unwrap();

        assert_eq!(report.citation_numbers, vec![1, 2]);
        assert_eq!(report.page_count, 2);
        let refs = canvas.page_texts(2);
        assert!(refs.contains(&"2. REFERENCES"));
        assert!(refs.contains(&"[1]"));
        assert!(refs.contains(&"[2]"));
        // Journal names are set in italics.
        let journal = canvas.pages()[1].ops.iter().find_map(|op| match op {
            DrawOp::Text { text, font, .. } if text.starts_with("Journal") => Some(font.style),
            _ => None,
        });
        assert_eq!(journal, Some(FontStyle::Italic));
    }

    #[test]
    fn test_references_placeholder_without_citations() {
        let structure = PartialStructure {
            include_references: Some(true),
            citation_style: Some(CitationStyle::Apa),
            ..bare(LayoutType::SingleColumn)
        };
        let cfg = config(ReportType::LabReport, structure);
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "T", "# Intro\nNo markers.", &cfg).unwrap();

        match canvas.find_text(NO_CITATIONS_NOTE) {
            Some((2, DrawOp::Text { color, font, .. })) => {
                assert_eq!(*color, Rgb::gray(100));
                assert_eq!(font.style, FontStyle::Italic);
            }
            other => panic!("placeholder missing: {other:?}"),
        }
    }

    #[test]
    fn test_no_references_page_for_style_none() {
        let structure = PartialStructure {
            include_references: Some(true),
            citation_style: Some(CitationStyle::None),
            ..bare(LayoutType::SingleColumn)
        };
        let cfg = config(ReportType::LabReport, structure);
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", "Text [1]", &cfg).unwrap();
        assert_eq!(report.page_count, 1);
    }

    #[test]
    fn test_cover_page_contents_and_header_skip() {
        let mut cfg = config(
            ReportType::ProjectReport,
            PartialStructure {
                include_cover_page: Some(true),
                include_toc: Some(false),
                include_references: Some(false),
                ..Default::default()
            },
        );
        cfg.academic_details = AcademicDetails {
            author_name: "Ada Lovelace".into(),
            student_id: Some("42".into()),
            institution: "Analytical College".into(),
            department: Some("Computing".into()),
            course: None,
            supervisor_name: Some("C. Babbage".into()),
            submission_date: "2025-03-14".into(),
        };
        let mut canvas = Canvas::a4();
        let report =
            render_academic_document(&mut canvas, "Engines", "# Intro\nBody", &cfg).unwrap();
        assert_eq!(report.page_count, 2);

        let cover = canvas.page_texts(1);
        for expected in [
            "ANALYTICAL COLLEGE",
            "Computing",
            "ENGINES",
            "A PROJECT REPORT",
            "Submitted by:",
            "Ada Lovelace",
            "ID: 42",
            "Under the guidance of:",
            "C. Babbage",
            "March 2025",
            "1",
        ] {
            assert!(cover.contains(&expected), "cover missing {expected:?}");
        }
        assert!(!cover.contains(&"Engines"), "no running header on cover");
        assert!(canvas.page_texts(2).contains(&"Engines"));

        let (_, _, title_y, _) = text_op(&canvas, "ENGINES");
        assert!((title_y - 297.0 * 0.35).abs() < 1e-3);
    }

    #[test]
    fn test_cover_omits_absent_details() {
        let cfg = config(
            ReportType::Thesis,
            PartialStructure {
                include_cover_page: Some(true),
                include_toc: Some(false),
                include_references: Some(false),
                ..Default::default()
            },
        );
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, "Title", "Body", &cfg).unwrap();
        let cover = canvas.page_texts(1);
        assert!(cover.contains(&"A THESIS"));
        assert!(!cover.contains(&"Submitted by:"));
        assert!(!cover.contains(&"Under the guidance of:"));
    }

    #[test]
    fn test_toc_rendered_with_estimated_pages() {
        let md = "# Intro\nText\n# Methods\n## Data";
        let structure = PartialStructure {
            include_toc: Some(true),
            ..bare(LayoutType::SingleColumn)
        };
        let cfg = config(ReportType::ProjectReport, structure);
        let mut canvas = Canvas::a4();
        let report = render_academic_document(&mut canvas, "T", md, &cfg).unwrap();

        assert_eq!(report.toc_entries.len(), 3);
        let toc = canvas.page_texts(1);
        assert!(toc.contains(&"TABLE OF CONTENTS"));
        assert!(toc.contains(&"2.1 Data"));
        // Content begins on page 2, right after the one-page TOC.
        assert!(toc.contains(&"2"));
        assert!(canvas.page_texts(2).contains(&"1. INTRO"));
    }

    #[test]
    fn test_footer_numbers_every_page_and_truncates_title() {
        let title = "A Remarkably Long Report Title That Keeps Going Past Fifty";
        let structure = PartialStructure {
            include_references: Some(true),
            ..bare(LayoutType::SingleColumn)
        };
        let cfg = config(ReportType::LabReport, structure);
        let mut canvas = Canvas::a4();
        render_academic_document(&mut canvas, title, "Body [1]", &cfg).unwrap();

        let expected_header = header_title(title);
        assert_eq!(expected_header.chars().count(), 50);
        assert!(expected_header.ends_with("..."));
        for page in 1..=2 {
            let texts = canvas.page_texts(page);
            assert!(texts.contains(&page.to_string().as_str()));
            assert!(texts.contains(&expected_header.as_str()));
        }
        let (_, _, y, _) = text_op(&canvas, "2");
        assert!((y - (297.0 - 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_header_title_short_kept() {
        assert_eq!(header_title("Short"), "Short");
        assert_eq!(header_title(&"x".repeat(50)), "x".repeat(50));
    }

    #[test]
    fn test_format_submission_date() {
        assert_eq!(format_submission_date("2025-03-14").as_deref(), Some("March 2025"));
        assert_eq!(
            format_submission_date("2024-11-02T10:00:00Z").as_deref(),
            Some("November 2024")
        );
        assert_eq!(format_submission_date(""), None);
        assert_eq!(format_submission_date("not a date"), None);
    }

    /// Fails every text call once `budget` calls have succeeded.
    struct FailingSurface {
        inner: Canvas,
        budget: usize,
    }

    impl Surface for FailingSurface {
        fn page_size(&self) -> (f32, f32) {
            self.inner.page_size()
        }
        fn page_count(&self) -> usize {
            self.inner.page_count()
        }
        fn current_page(&self) -> usize {
            self.inner.current_page()
        }
        fn add_page(&mut self) {
            self.inner.add_page()
        }
        fn set_page(&mut self, page: usize) -> Result<(), SurfaceError> {
            self.inner.set_page(page)
        }
        fn font(&self) -> FontSpec {
            self.inner.font()
        }
        fn set_font(&mut self, font: FontSpec) {
            self.inner.set_font(font)
        }
        fn set_text_color(&mut self, color: Rgb) {
            self.inner.set_text_color(color)
        }
        fn set_fill_color(&mut self, color: Rgb) {
            self.inner.set_fill_color(color)
        }
        fn set_draw_color(&mut self, color: Rgb) {
            self.inner.set_draw_color(color)
        }
        fn set_line_width(&mut self, width: f32) {
            self.inner.set_line_width(width)
        }
        fn text(&mut self, s: &str, x: f32, y: f32, align: Align) -> Result<(), SurfaceError> {
            if self.budget == 0 {
                return Err(SurfaceError::InvalidCoordinate { x, y });
            }
            self.budget -= 1;
            self.inner.text(s, x, y, align)
        }
        fn rect(
            &mut self,
            x: f32,
            y: f32,
            w: f32,
            h: f32,
            style: RectStyle,
        ) -> Result<(), SurfaceError> {
            self.inner.rect(x, y, w, h, style)
        }
    }

    #[test]
    fn test_surface_failure_aborts_render() {
        let mut surface = FailingSurface {
            inner: Canvas::a4(),
            budget: 3,
        };
        let cfg = config(ReportType::LabReport, bare(LayoutType::SingleColumn));
        let result = render_academic_document(&mut surface, "T", "# A\n# B\n# C\n# D", &cfg);
        assert!(result.is_err());
    }
}
