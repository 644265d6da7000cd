//! Outline font glyph source.
//!
//! Glyphs are rendered at their natural size, cropped to the ink and
//! thresholded to one bit per pixel. There is no scaling, so every glyph
//! keeps its own dimensions and ends up in the variable size layout.

use std::path::Path;

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale};

use crate::{
    bits::BitRaster,
    glyph::{GlyphSource, NormalizedGlyph, OutlineGlyph},
    sources::Normalize,
    FontError, Result,
};

/// Gray levels above this value become set pixels. Deliberately low so thin
/// strokes of small pixel fonts survive.
pub const INK_THRESHOLD: u8 = 30;

/// Blank border around the render canvas, keeps anti-aliased edges from
/// being clipped before the crop.
pub const RENDER_MARGIN: u32 = 1;

/// Codepoints below this are control characters and never exported.
pub const FIRST_PRINTABLE: u32 = 0x20;

const SPACE: u32 = 0x20;

/// Pixel rectangle, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InkBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl InkBounds {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// 8 bit grayscale canvas, 0 = background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Stores `value` unless the pixel already is brighter. Out of bounds
    /// writes are ignored.
    pub fn blend(&mut self, x: u32, y: u32, value: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let px = &mut self.pixels[(y * self.width + x) as usize];
        *px = (*px).max(value);
    }

    /// Extent of all non-zero pixels, `None` for a blank canvas.
    pub fn content_bounds(&self) -> Option<InkBounds> {
        let mut bounds: Option<InkBounds> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) == 0 {
                    continue;
                }
                let (x, y) = (x as i32, y as i32);
                bounds = Some(match bounds {
                    None => InkBounds {
                        left: x,
                        top: y,
                        right: x + 1,
                        bottom: y + 1,
                    },
                    Some(b) => InkBounds {
                        left: b.left.min(x),
                        top: b.top.min(y),
                        right: b.right.max(x + 1),
                        bottom: b.bottom.max(y + 1),
                    },
                });
            }
        }
        bounds
    }

    pub fn crop(&self, bounds: InkBounds) -> GrayRaster {
        let mut result = GrayRaster::new(bounds.width(), bounds.height());
        for y in 0..result.height {
            for x in 0..result.width {
                let value = self.get((bounds.left + x as i32) as u32, (bounds.top + y as i32) as u32);
                result.blend(x, y, value);
            }
        }
        result
    }

    /// Pixels strictly brighter than `level` are set.
    pub fn threshold(&self, level: u8) -> BitRaster {
        let mut raster = BitRaster::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                raster.set_pixel(x as i32, y as i32, self.get(x, y) > level);
            }
        }
        raster
    }
}

/// Access to an outline font renderer.
pub trait OutlineRasterizer {
    /// Unicode codepoints present in the font's character map.
    fn codepoints(&self) -> Vec<u32>;

    /// Ink bounds of `ch` at `size` pixels per em. `None` if the font has no
    /// glyph for `ch` or the glyph has no ink.
    fn measure(&self, ch: char, size: u32) -> Option<InkBounds>;

    /// Renders `ch` onto a canvas of `bounds` grown by `margin` pixels on
    /// every side, the ink starting at `(margin, margin)`.
    fn render(&self, ch: char, size: u32, bounds: InkBounds, margin: u32) -> GrayRaster;
}

/// [`OutlineRasterizer`] backed by `ab_glyph`, for TrueType and OpenType
/// fonts.
pub struct AbGlyphRasterizer {
    font: FontVec,
}

impl AbGlyphRasterizer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|err| FontError::FontLoad { message: err.to_string() })?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|err| FontError::open_file(path, err.to_string()))?;
        Self::from_bytes(data)
    }

    /// Scale for `size` pixels per em. `PxScale` is relative to the font
    /// height (ascent - descent), not to the em square.
    fn em_scale(&self, size: u32) -> Option<PxScale> {
        let units_per_em = self.font.units_per_em()?;
        Some(PxScale::from(size as f32 * self.font.height_unscaled() / units_per_em))
    }

    fn outline(&self, ch: char, size: u32) -> Option<OutlinedGlyph> {
        let id = self.font.glyph_id(ch);
        // glyph 0 is .notdef
        if id.0 == 0 {
            return None;
        }
        self.font.outline_glyph(id.with_scale(self.em_scale(size)?))
    }
}

impl OutlineRasterizer for AbGlyphRasterizer {
    fn codepoints(&self) -> Vec<u32> {
        self.font.codepoint_ids().map(|(_, ch)| ch as u32).collect()
    }

    fn measure(&self, ch: char, size: u32) -> Option<InkBounds> {
        let bounds = self.outline(ch, size)?.px_bounds();
        let ink = InkBounds {
            left: bounds.min.x as i32,
            top: bounds.min.y as i32,
            right: bounds.max.x as i32,
            bottom: bounds.max.y as i32,
        };
        if ink.is_empty() {
            None
        } else {
            Some(ink)
        }
    }

    fn render(&self, ch: char, size: u32, bounds: InkBounds, margin: u32) -> GrayRaster {
        let mut canvas = GrayRaster::new(bounds.width() + 2 * margin, bounds.height() + 2 * margin);
        if let Some(outlined) = self.outline(ch, size) {
            outlined.draw(|x, y, coverage| {
                let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                canvas.blend(x + margin, y + margin, value);
            });
        }
        canvas
    }
}

/// Turns outline glyph sources into normalized glyphs.
pub struct OutlineAdapter<R> {
    rasterizer: R,
}

impl<R: OutlineRasterizer> OutlineAdapter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// One source per printable codepoint of the font, ascending.
    pub fn sources(&self, size: u32) -> Vec<GlyphSource> {
        let mut codepoints: Vec<u32> = self.rasterizer.codepoints().into_iter().filter(|&cp| cp >= FIRST_PRINTABLE).collect();
        codepoints.sort_unstable();
        codepoints.dedup();
        codepoints
            .into_iter()
            .map(|codepoint| {
                GlyphSource::Outline(OutlineGlyph {
                    codepoint,
                    requested_size: size,
                })
            })
            .collect()
    }

    /// Renders a single glyph. `None` means the glyph is unavailable and
    /// should be skipped.
    pub fn render_glyph(&self, source: &OutlineGlyph) -> Option<NormalizedGlyph> {
        let codepoint = source.codepoint;
        let size = source.requested_size;
        let Some(ch) = char::from_u32(codepoint) else {
            log::debug!("U+{codepoint:04X} is not a valid character");
            return None;
        };

        let Some(bounds) = self.rasterizer.measure(ch, size).filter(|b| !b.is_empty()) else {
            // space has no ink but still needs its advance
            if codepoint == SPACE && size >= 3 {
                return Some(NormalizedGlyph::blank(codepoint, size / 3, size));
            }
            log::debug!("U+{codepoint:04X} has no ink at {size}px");
            return None;
        };

        let canvas = self.rasterizer.render(ch, size, bounds, RENDER_MARGIN);
        let Some(content) = canvas.content_bounds() else {
            log::debug!("U+{codepoint:04X} rendered blank at {size}px");
            return None;
        };
        let raster = canvas.crop(content).threshold(INK_THRESHOLD);
        Some(NormalizedGlyph::from_raster(codepoint, &raster))
    }
}

impl<R: OutlineRasterizer> Normalize for OutlineAdapter<R> {
    fn normalize(&self, source: &GlyphSource) -> Option<NormalizedGlyph> {
        match source {
            GlyphSource::Outline(glyph) => self.render_glyph(glyph),
            GlyphSource::Bitmap(glyph) => {
                log::debug!("Outline adapter can't handle bitmap glyph U+{:04X}", glyph.codepoint);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Glyphs drawn from ASCII art: '#' full ink, '+' faint ink, '.' none.
    struct ArtRasterizer {
        glyphs: HashMap<char, Vec<&'static str>>,
    }

    impl ArtRasterizer {
        fn new(glyphs: &[(char, Vec<&'static str>)]) -> Self {
            Self {
                glyphs: glyphs.iter().cloned().collect(),
            }
        }
    }

    impl OutlineRasterizer for ArtRasterizer {
        fn codepoints(&self) -> Vec<u32> {
            let mut result: Vec<u32> = self.glyphs.keys().map(|&c| c as u32).collect();
            result.push(0x0A);
            result
        }

        fn measure(&self, ch: char, _size: u32) -> Option<InkBounds> {
            let rows = self.glyphs.get(&ch)?;
            if rows.iter().all(|r| r.chars().all(|c| c == '.')) {
                return None;
            }
            Some(InkBounds {
                left: 0,
                top: -(rows.len() as i32),
                right: rows[0].len() as i32,
                bottom: 0,
            })
        }

        fn render(&self, ch: char, _size: u32, bounds: InkBounds, margin: u32) -> GrayRaster {
            let mut canvas = GrayRaster::new(bounds.width() + 2 * margin, bounds.height() + 2 * margin);
            for (y, row) in self.glyphs[&ch].iter().enumerate() {
                for (x, c) in row.chars().enumerate() {
                    let value = match c {
                        '#' => 255,
                        '+' => 20,
                        _ => 0,
                    };
                    canvas.blend(x as u32 + margin, y as u32 + margin, value);
                }
            }
            canvas
        }
    }

    fn outline(codepoint: u32, size: u32) -> OutlineGlyph {
        OutlineGlyph {
            codepoint,
            requested_size: size,
        }
    }

    #[test]
    fn test_crop_and_threshold() {
        let adapter = OutlineAdapter::new(ArtRasterizer::new(&[('i', vec!["....", ".+#.", "..#.", "..#.", "...."])]));
        let glyph = adapter.render_glyph(&outline('i' as u32, 12)).unwrap();

        // faint pixel keeps the crop wide but does not set a bit
        assert_eq!((glyph.width, glyph.height), (2, 3));
        assert_eq!(glyph.to_string(), " 0-#\n 1-#\n 2-#\n---");
    }

    #[test]
    fn test_space_exception() {
        let adapter = OutlineAdapter::new(ArtRasterizer::new(&[(' ', vec!["...."])]));
        let glyph = adapter.render_glyph(&outline(0x20, 16)).unwrap();
        assert_eq!((glyph.width, glyph.height), (5, 16));
        assert_eq!(glyph.data.len(), 10);
        assert!(glyph.is_empty());
    }

    #[test]
    fn test_missing_glyph_is_unavailable() {
        let adapter = OutlineAdapter::new(ArtRasterizer::new(&[('x', vec!["#"])]));
        assert!(adapter.render_glyph(&outline('y' as u32, 12)).is_none());
        assert!(adapter.render_glyph(&outline(0xD800, 12)).is_none());
        assert!(adapter.normalize(&GlyphSource::Outline(outline('x' as u32, 12))).is_some());
    }

    #[test]
    fn test_sources_skip_control_characters() {
        let adapter = OutlineAdapter::new(ArtRasterizer::new(&[('b', vec!["#"]), ('a', vec!["#"])]));
        let codepoints: Vec<u32> = adapter.sources(9).iter().map(GlyphSource::codepoint).collect();
        assert_eq!(codepoints, vec!['a' as u32, 'b' as u32]);
    }

    #[test]
    fn test_gray_raster_bounds() {
        let mut canvas = GrayRaster::new(5, 4);
        assert_eq!(canvas.content_bounds(), None);
        canvas.blend(1, 2, 7);
        canvas.blend(3, 1, 200);
        canvas.blend(9, 9, 200);
        assert_eq!(
            canvas.content_bounds(),
            Some(InkBounds {
                left: 1,
                top: 1,
                right: 4,
                bottom: 3
            })
        );
        assert_eq!(canvas.threshold(INK_THRESHOLD).pack(), vec![0, 0x80, 0]);
    }

    #[test]
    fn test_invalid_font_data() {
        let err = AbGlyphRasterizer::from_bytes(b"definitely not a font".to_vec()).err().unwrap();
        assert!(matches!(err, FontError::FontLoad { .. }));
    }
}
