//! 1-bit rasters and the MSB-first bit packing shared by every glyph source.
//!
//! A raster of `width * height` pixels is packed row-major with no padding
//! between rows: pixel index `i = y * width + x` lives in byte `i / 8` at bit
//! position `7 - (i % 8)`. The firmware reader addresses glyph bitmaps with
//! exactly this rule, so both the fixed canvas and the variable crop go
//! through [`BitRaster::pack`].

/// Number of bytes needed to hold a packed `width * height` raster.
#[inline]
pub const fn packed_len(width: u32, height: u32) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// Reads pixel `index` from packed data. Out of range indices read as off.
#[inline]
pub fn packed_bit(data: &[u8], index: usize) -> bool {
    match data.get(index / 8) {
        Some(byte) => byte & (0x80 >> (index % 8)) != 0,
        None => false,
    }
}

/// A row-major binary raster, one `bool` per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitRaster {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl BitRaster {
    /// Create a new raster with all pixels off.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get a pixel value at the given position.
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        match self.index_of(x, y) {
            Some(i) => self.pixels[i],
            None => false,
        }
    }

    /// Set a pixel value at the given position.
    ///
    /// Out of bounds coordinates are clipped silently.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, value: bool) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = value;
        }
    }

    /// Check if the raster is empty (all pixels off).
    pub fn is_empty(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Packs the raster MSB-first, row-major, without row padding.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = vec![0u8; packed_len(self.width, self.height)];
        for (i, &on) in self.pixels.iter().enumerate() {
            if on {
                data[i / 8] |= 0x80 >> (i % 8);
            }
        }
        data
    }

    /// Inverse of [`BitRaster::pack`].
    pub fn unpack(width: u32, height: u32, data: &[u8]) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..len).map(|i| packed_bit(data, i)).collect(),
        }
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(8, 1), 1);
        assert_eq!(packed_len(9, 9), 11);
        assert_eq!(packed_len(5, 3), 2);
        assert_eq!(packed_len(0, 12), 0);
    }

    #[test]
    fn test_rows_are_not_padded() {
        // 3x3 with the center column set: bits 1, 4 and 7
        let mut raster = BitRaster::new(3, 3);
        for y in 0..3 {
            raster.set_pixel(1, y, true);
        }
        assert_eq!(raster.pack(), vec![0b0100_1001, 0b0000_0000]);
    }

    #[test]
    fn test_msb_first() {
        let mut raster = BitRaster::new(10, 1);
        raster.set_pixel(0, 0, true);
        raster.set_pixel(9, 0, true);
        assert_eq!(raster.pack(), vec![0x80, 0x40]);
    }

    #[test]
    fn test_clipping() {
        let mut raster = BitRaster::new(2, 2);
        raster.set_pixel(-1, 0, true);
        raster.set_pixel(0, 2, true);
        raster.set_pixel(2, 1, true);
        assert!(raster.is_empty());
        assert!(!raster.get_pixel(5, 5));
    }

    #[test]
    fn test_unpack_matches_pack() {
        let mut raster = BitRaster::new(7, 5);
        raster.set_pixel(0, 0, true);
        raster.set_pixel(6, 4, true);
        raster.set_pixel(3, 2, true);
        let data = raster.pack();
        assert_eq!(BitRaster::unpack(7, 5, &data), raster);
        assert!(packed_bit(&data, 34));
        assert!(!packed_bit(&data, 100));
    }
}
