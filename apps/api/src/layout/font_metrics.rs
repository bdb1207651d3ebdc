//! Static font-metric tables for the Base-14 faces the academic layout uses.
//!
//! Widths are in em units (1/1000 of the AFM glyph widths). Tables cover ASCII
//! 0x20..=0x7E (95 printable characters); index = (char as usize) - 32.
//! Non-ASCII characters fall back to a per-table average, which is close enough
//! for wrap decisions since the PDF writer maps them onto WinAnsi anyway.

use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Font selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Body text, headings and the cover page.
    Times,
    /// Code blocks.
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

/// A fully specified font: family, style and size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size_pt: f32,
}

impl FontSpec {
    pub fn times(style: FontStyle, size_pt: f32) -> Self {
        Self {
            family: FontFamily::Times,
            style,
            size_pt,
        }
    }

    pub fn courier(size_pt: f32) -> Self {
        Self {
            family: FontFamily::Courier,
            style: FontStyle::Normal,
            size_pt,
        }
    }

    /// Base-14 PostScript name, as written into the PDF font dictionary.
    pub fn base_font_name(&self) -> &'static str {
        match (self.family, self.style) {
            (FontFamily::Times, FontStyle::Normal) => "Times-Roman",
            (FontFamily::Times, FontStyle::Bold) => "Times-Bold",
            (FontFamily::Times, FontStyle::Italic) => "Times-Italic",
            (FontFamily::Courier, FontStyle::Normal) => "Courier",
            (FontFamily::Courier, FontStyle::Bold) => "Courier-Bold",
            (FontFamily::Courier, FontStyle::Italic) => "Courier-Oblique",
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::times(FontStyle::Normal, 16.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
    /// Width of U+2022, used for list bullets.
    pub bullet_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else if c == '\u{2022}' {
                    self.bullet_width
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

/// Width of `s` in millimetres when set in `font`.
pub fn text_width_mm(font: &FontSpec, s: &str) -> f32 {
    get_metrics(font.family, font.style).measure_str(s) * font.size_pt * MM_PER_PT
}

// Times-Roman (AFM widths / 1000)
static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    widths: [
        // sp    !      "      #      $      %      &      '
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180,
        // (     )      *      +      ,      -      .      /
        0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {     |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.47,
    bullet_width: 0.350,
};

// Times-Bold
static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    widths: [
        // sp    !      "      #      $      %      &      '
        0.250, 0.333, 0.555, 0.500, 0.500, 1.000, 0.833, 0.278,
        // (     )      *      +      ,      -      .      /
        0.333, 0.333, 0.500, 0.570, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.570, 0.570, 0.570, 0.500, 0.930,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.778, 0.389, 0.500, 0.778, 0.667, 0.944,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.611, 0.778, 0.722, 0.556, 0.667, 0.722, 0.722, 1.000, 0.722, 0.722, 0.667,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.581, 0.500, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.556, 0.444, 0.556, 0.444, 0.333, 0.500, 0.556, 0.278, 0.333, 0.556, 0.278, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.500, 0.556, 0.556, 0.444, 0.389, 0.333, 0.556, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {     |      }      ~
        0.394, 0.220, 0.394, 0.520,
    ],
    average_char_width: 0.50,
    bullet_width: 0.350,
};

// Times-Italic
static TIMES_ITALIC_TABLE: FontMetricTable = FontMetricTable {
    widths: [
        // sp    !      "      #      $      %      &      '
        0.250, 0.333, 0.420, 0.500, 0.500, 0.833, 0.778, 0.214,
        // (     )      *      +      ,      -      .      /
        0.333, 0.333, 0.500, 0.675, 0.250, 0.333, 0.250, 0.278,
        // 0-9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.675, 0.675, 0.675, 0.500, 0.920,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.611, 0.611, 0.667, 0.722, 0.611, 0.611, 0.722, 0.722, 0.333, 0.444, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.667, 0.722, 0.611, 0.722, 0.611, 0.500, 0.556, 0.722, 0.611, 0.833, 0.611, 0.556, 0.556,
        // [     \      ]      ^      _      `
        0.389, 0.278, 0.389, 0.422, 0.500, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.500, 0.444, 0.500, 0.444, 0.278, 0.500, 0.500, 0.278, 0.278, 0.444, 0.278, 0.722,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.389, 0.389, 0.278, 0.500, 0.444, 0.667, 0.444, 0.444, 0.389,
        // {     |      }      ~
        0.400, 0.275, 0.400, 0.541,
    ],
    average_char_width: 0.46,
    bullet_width: 0.350,
};

// Courier and its variants are monospaced at 600/1000.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.600; 95],
    average_char_width: 0.600,
    bullet_width: 0.600,
};

/// Returns the static metric table for a face.
pub fn get_metrics(family: FontFamily, style: FontStyle) -> &'static FontMetricTable {
    match (family, style) {
        (FontFamily::Times, FontStyle::Normal) => &TIMES_ROMAN_TABLE,
        (FontFamily::Times, FontStyle::Bold) => &TIMES_BOLD_TABLE,
        (FontFamily::Times, FontStyle::Italic) => &TIMES_ITALIC_TABLE,
        (FontFamily::Courier, _) => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
