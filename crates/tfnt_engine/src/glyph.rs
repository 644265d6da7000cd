use std::fmt::Display;

use crate::bits::{packed_bit, packed_len, BitRaster};

/// A glyph in its final 1-bit form, independent of the source it came from.
///
/// `data` holds `ceil(width * height / 8)` bytes packed MSB-first, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGlyph {
    pub codepoint: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl NormalizedGlyph {
    pub fn from_raster(codepoint: u32, raster: &BitRaster) -> Self {
        Self {
            codepoint,
            width: raster.width(),
            height: raster.height(),
            data: raster.pack(),
        }
    }

    /// A glyph with all pixels off.
    pub fn blank(codepoint: u32, width: u32, height: u32) -> Self {
        Self {
            codepoint,
            width,
            height,
            data: vec![0; packed_len(width, height)],
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        packed_bit(&self.data, (y * self.width + x) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    pub fn to_raster(&self) -> BitRaster {
        BitRaster::unpack(self.width, self.height, &self.data)
    }

    /// The codepoint as a `char`, if it is a valid Unicode scalar value.
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

impl Display for NormalizedGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        for y in 0..self.height {
            s.push_str(&format!("{y:2}"));
            for x in 0..self.width {
                if self.get_pixel(x, y) {
                    s.push('#');
                } else {
                    s.push('-');
                }
            }
            s.push('\n');
        }
        write!(f, "{s}---")
    }
}

/// One bitmap row as written in the source: an unsigned integer stored as
/// big-endian bytes. Only the low `ceil(width / 8) * 8` bits are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitmapRow(pub Vec<u8>);

impl BitmapRow {
    /// Returns pixel `x` of a row that is `width` pixels wide.
    ///
    /// Pixels are read MSB-first from the byte aligned row, so short rows
    /// behave as if left-padded with zeros and extra leading bytes are
    /// ignored.
    pub fn bit(&self, x: u32, width: u32) -> bool {
        let aligned = width.div_ceil(8) * 8;
        if x >= aligned {
            return false;
        }
        let from_lsb = (aligned - 1 - x) as usize;
        let byte_from_end = from_lsb / 8;
        if byte_from_end >= self.0.len() {
            return false;
        }
        let byte = self.0[self.0.len() - 1 - byte_from_end];
        byte & (1 << (from_lsb % 8)) != 0
    }
}

/// A glyph read from a bitmap font description, placed relative to the
/// baseline: `(offset_x, offset_y)` is the lower left corner of the
/// bounding box, with y growing upwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitmapGlyph {
    pub codepoint: u32,
    pub name: String,
    pub device_width: i32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub rows: Vec<BitmapRow>,
}

/// A glyph that is rasterized on demand from an outline font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineGlyph {
    pub codepoint: u32,
    /// Size in pixels per em.
    pub requested_size: u32,
}

/// A glyph as delivered by one of the source adapters.
///
/// The encoder never sees this type; every variant is projected to a
/// [`NormalizedGlyph`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphSource {
    Bitmap(BitmapGlyph),
    Outline(OutlineGlyph),
}

impl GlyphSource {
    pub fn codepoint(&self) -> u32 {
        match self {
            GlyphSource::Bitmap(glyph) => glyph.codepoint,
            GlyphSource::Outline(glyph) => glyph.codepoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_bits_byte_aligned() {
        // 5 px wide row "A8" = 1010 1000
        let row = BitmapRow(vec![0xA8]);
        let bits: Vec<bool> = (0..5).map(|x| row.bit(x, 5)).collect();
        assert_eq!(bits, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_row_bits_wide() {
        // 12 px wide row "FFF0"
        let row = BitmapRow(vec![0xFF, 0xF0]);
        assert!((0..12).all(|x| row.bit(x, 12)));
        assert!(!row.bit(12, 12));
    }

    #[test]
    fn test_row_bits_right_aligned() {
        // extra leading byte is ignored, a short row is padded on the left
        let long = BitmapRow(vec![0xFF, 0x80]);
        assert!(long.bit(0, 5));
        assert!(!long.bit(1, 5));

        let short = BitmapRow(vec![0x10]);
        assert!(!short.bit(3, 12));
        assert!(short.bit(11, 12));
    }

    #[test]
    fn test_display() {
        let mut raster = BitRaster::new(3, 2);
        raster.set_pixel(0, 0, true);
        raster.set_pixel(2, 1, true);
        let glyph = NormalizedGlyph::from_raster('x' as u32, &raster);
        assert_eq!(glyph.to_string(), " 0#--\n 1--#\n---");
        assert_eq!(glyph.as_char(), Some('x'));
    }

    #[test]
    fn test_blank() {
        let glyph = NormalizedGlyph::blank(0x20, 4, 12);
        assert_eq!(glyph.data.len(), 6);
        assert!(glyph.is_empty());
    }
}
