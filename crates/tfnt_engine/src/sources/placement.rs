//! Places baseline-relative bitmap glyphs onto a fixed size canvas.
//!
//! BDF coordinates have their origin at the left end of the baseline with y
//! growing upwards, the canvas has its origin top-left with y growing
//! downwards. The baseline sits on canvas row `ascent - 1`.

use crate::{
    bits::BitRaster,
    glyph::{BitmapGlyph, GlyphSource, NormalizedGlyph},
    metrics::CanvasSize,
    sources::Normalize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub canvas: CanvasSize,
    pub ascent: u32,
}

impl Placement {
    pub fn new(canvas: CanvasSize, ascent: u32) -> Self {
        Self { canvas, ascent }
    }

    /// Draws `glyph` onto a blank canvas. Pixels falling outside the canvas
    /// are clipped.
    pub fn place(&self, glyph: &BitmapGlyph) -> BitRaster {
        let mut canvas = BitRaster::new(self.canvas.width, self.canvas.height);
        if glyph.width == 0 || glyph.height == 0 || glyph.rows.is_empty() {
            return canvas;
        }

        // i64 so extreme BBX values clip instead of overflowing
        let baseline_row = i64::from(self.ascent) - 1;
        let top = baseline_row - (i64::from(glyph.offset_y) + i64::from(glyph.height) - 1);
        let left = i64::from(glyph.offset_x);

        // glyph columns that land on the canvas
        let first_col = (-left).clamp(0, i64::from(glyph.width));
        let end_col = (i64::from(self.canvas.width) - left).clamp(first_col, i64::from(glyph.width));

        for (row_idx, row) in glyph.rows.iter().enumerate() {
            let y = top + row_idx as i64;
            if y < 0 {
                continue;
            }
            if y >= i64::from(self.canvas.height) {
                break;
            }
            for x in first_col..end_col {
                if row.bit(x as u32, glyph.width) {
                    canvas.set_pixel((left + x) as i32, y as i32, true);
                }
            }
        }
        canvas
    }
}

impl Normalize for Placement {
    fn normalize(&self, source: &GlyphSource) -> Option<NormalizedGlyph> {
        match source {
            GlyphSource::Bitmap(glyph) => Some(NormalizedGlyph::from_raster(glyph.codepoint, &self.place(glyph))),
            GlyphSource::Outline(glyph) => {
                log::debug!("Placement can't handle outline glyph U+{:04X}", glyph.codepoint);
                None
            }
        }
    }
}
