//! Text rendering of packed glyphs for eyeballing conversion results.
//!
//! Pixels are read straight from the packed bitmap with the same addressing
//! a firmware reader uses (`byte = i / 8`, `bit = 7 - i % 8`), so a preview
//! that looks right means the bytes are right.

use crate::{bits::packed_bit, glyph::NormalizedGlyph};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewStyle {
    /// Two character cells per pixel, indented, no border.
    #[default]
    Blocks,
    /// One character cell per pixel inside a `+--+` frame.
    Framed,
}

pub fn render(glyph: &NormalizedGlyph, style: PreviewStyle) -> String {
    let width = glyph.width as usize;
    let (on, off) = match style {
        PreviewStyle::Blocks => ("██", "  "),
        PreviewStyle::Framed => ("█", " "),
    };

    let mut rows = Vec::with_capacity(glyph.height as usize);
    for y in 0..glyph.height as usize {
        let row: String = (0..width)
            .map(|x| if packed_bit(&glyph.data, y * width + x) { on } else { off })
            .collect();
        rows.push(row);
    }

    match style {
        PreviewStyle::Blocks => rows.iter().map(|row| format!("  {row}\n")).collect(),
        PreviewStyle::Framed => {
            let border = format!("+{}+\n", "-".repeat(width));
            let mut result = border.clone();
            for row in rows {
                result.push_str(&format!("|{row}|\n"));
            }
            result.push_str(&border);
            result
        }
    }
}

/// One line summary, e.g. `'A' (U+0041) 5x7`.
pub fn describe(glyph: &NormalizedGlyph) -> String {
    match glyph.as_char().filter(|c| !c.is_control()) {
        Some(ch) => format!("'{ch}' (U+{:04X}) {}x{}", glyph.codepoint, glyph.width, glyph.height),
        None => format!("U+{:04X} {}x{}", glyph.codepoint, glyph.width, glyph.height),
    }
}

/// Parses a hex codepoint as typed on a command line: `4E2D`, `0x4E2D` or
/// `U+4E2D`. The error is a message ready for clap.
pub fn parse_codepoint(arg: &str) -> Result<u32, String> {
    let digits = arg
        .strip_prefix("U+")
        .or_else(|| arg.strip_prefix("u+"))
        .or_else(|| arg.strip_prefix("0x"))
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    u32::from_str_radix(digits, 16).map_err(|err| format!("'{arg}' is not a hex codepoint: {err}"))
}
