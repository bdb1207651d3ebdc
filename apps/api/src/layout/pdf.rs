//! PDF serialisation of a `Canvas` using pdf-writer.
//!
//! Fonts are the Base-14 Type1 faces with WinAnsi encoding, so nothing is
//! embedded. Content streams are Flate-compressed.

use std::collections::BTreeMap;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use super::canvas::{Canvas, DrawOp};
use super::surface::{RectStyle, Rgb, Surface};

/// PostScript points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Serialises every page of `canvas` into a complete PDF file.
pub fn write_pdf(canvas: &Canvas) -> Vec<u8> {
    let (width_mm, height_mm) = canvas.page_size();
    let page_w = width_mm * PT_PER_MM;
    let page_h = height_mm * PT_PER_MM;

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Resource names F1.. in first-use order, keyed by base font name.
    let mut fonts: BTreeMap<&'static str, (String, Ref)> = BTreeMap::new();
    for page in canvas.pages() {
        for op in &page.ops {
            if let DrawOp::Text { font, .. } = op {
                let base = font.base_font_name();
                if !fonts.contains_key(base) {
                    let name = format!("F{}", fonts.len() + 1);
                    fonts.insert(base, (name, alloc()));
                }
            }
        }
    }

    let page_ids: Vec<Ref> = canvas.pages().iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = canvas.pages().iter().map(|_| alloc()).collect();

    for (i, page) in canvas.pages().iter().enumerate() {
        let mut content = Content::new();
        for op in &page.ops {
            match op {
                DrawOp::Text {
                    text,
                    x,
                    y,
                    font,
                    color,
                } => {
                    let Some((name, _)) = fonts.get(font.base_font_name()) else {
                        continue;
                    };
                    let (r, g, b) = unit_rgb(*color);
                    let bytes = encode_win_ansi(text);
                    content.set_fill_rgb(r, g, b);
                    content
                        .begin_text()
                        .set_font(Name(name.as_bytes()), font.size_pt)
                        .next_line(x * PT_PER_MM, page_h - y * PT_PER_MM)
                        .show(Str(&bytes))
                        .end_text();
                }
                DrawOp::Rect {
                    x,
                    y,
                    w,
                    h,
                    style,
                    fill,
                    stroke,
                    line_width,
                } => {
                    let rx = x * PT_PER_MM;
                    let ry = page_h - (y + h) * PT_PER_MM;
                    let rw = w * PT_PER_MM;
                    let rh = h * PT_PER_MM;
                    match style {
                        RectStyle::Fill => {
                            let (r, g, b) = unit_rgb(*fill);
                            content.set_fill_rgb(r, g, b);
                            content.rect(rx, ry, rw, rh);
                            content.fill_nonzero();
                        }
                        RectStyle::Stroke => {
                            let (r, g, b) = unit_rgb(*stroke);
                            content.set_stroke_rgb(r, g, b);
                            content.set_line_width(line_width * PT_PER_MM);
                            content.rect(rx, ry, rw, rh);
                            content.stroke();
                        }
                    }
                }
            }
        }

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    for (base, (_, font_ref)) in &fonts {
        pdf.type1_font(*font_ref)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for (i, page_id) in page_ids.iter().enumerate() {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in fonts.values() {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        if let Some(title) = canvas.title() {
            info.title(TextStr(title));
        }
        info.producer(TextStr("quill-api"));
    }

    let bytes = pdf.finish();
    debug!(
        pages = page_ids.len(),
        fonts = fonts.len(),
        bytes = bytes.len(),
        "PDF serialised"
    );
    bytes
}

fn unit_rgb(color: Rgb) -> (f32, f32, f32) {
    (
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
    )
}

/// Maps text onto WinAnsiEncoding. Characters with no WinAnsi slot become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' => b' ',
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{FontSpec, FontStyle};
    use crate::layout::surface::Align;

    #[test]
    fn test_encode_win_ansi_maps_specials() {
        assert_eq!(encode_win_ansi("A•B"), vec![b'A', 0x95, b'B']);
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("“x”"), vec![0x93, b'x', 0x94]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_write_pdf_produces_pdf_with_every_page() {
        let mut canvas = Canvas::a4();
        canvas.set_title("Quarterly Findings");
        canvas.set_font(FontSpec::times(FontStyle::Bold, 14.0));
        canvas.text("1. INTRODUCTION", 25.0, 25.0, Align::Left).unwrap();
        canvas.add_page();
        canvas.set_font(FontSpec::courier(9.0));
        canvas.text("fn main() {}", 28.0, 40.0, Align::Left).unwrap();
        canvas.rect(25.0, 37.0, 160.0, 15.0, RectStyle::Fill).unwrap();

        let bytes = write_pdf(&canvas);
        assert!(bytes.starts_with(b"%PDF-"));
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/Count 2"));
        assert!(raw.contains("/Times-Bold"));
        assert!(raw.contains("/Courier"));
        assert!(raw.contains("/WinAnsiEncoding"));
        assert!(raw.contains("Quarterly Findings"));
    }

    #[test]
    fn test_write_pdf_blank_canvas_still_valid() {
        let bytes = write_pdf(&Canvas::a4());
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("/Count 1"));
        assert!(raw.trim_end().ends_with("%%EOF"));
    }
}
