use std::path::Path;

use crate::{
    bits::packed_len,
    container::{FontContainer, FontHeader, IndexEntry, LayoutKind, HEADER_LEN},
    FontError, Result,
};

impl FontContainer {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|err| FontError::open_file(path, err.to_string()))?;
        Self::from_bytes(&data)
    }

    /// Parses and validates a container.
    ///
    /// Besides the header this checks what a firmware reader depends on:
    /// strictly ascending codepoints and a blob without gaps or overlaps
    /// that starts right after the index.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = FontHeader::read(data)?;
        let layout = header.layout;

        if layout == LayoutKind::Fixed {
            if header.aux as usize != HEADER_LEN {
                return Err(FontError::invalid_index(format!("unsupported index offset {}", header.aux)));
            }
            if header.dim_a == 0 || header.dim_b == 0 {
                return Err(FontError::InvalidCanvas {
                    width: header.dim_a as u32,
                    height: header.dim_b as u32,
                });
            }
        }

        let count = header.glyph_count as usize;
        let blob_start = count
            .checked_mul(layout.entry_len())
            .and_then(|len| len.checked_add(HEADER_LEN))
            .ok_or_else(|| FontError::invalid_index(format!("glyph count {count} too large")))?;
        if data.len() < blob_start {
            return Err(FontError::Truncated {
                expected: blob_start,
                actual: data.len(),
            });
        }

        let mut br = &data[HEADER_LEN..blob_start];
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(count);
        let mut expected_offset = blob_start;
        for _ in 0..count {
            let entry = IndexEntry::read(&mut br, layout, (header.dim_a, header.dim_b))?;
            if let Some(prev) = entries.last() {
                if entry.codepoint <= prev.codepoint {
                    return Err(FontError::invalid_index(format!(
                        "U+{:04X} follows U+{:04X}",
                        entry.codepoint, prev.codepoint
                    )));
                }
            }
            if entry.offset as usize != expected_offset {
                return Err(FontError::invalid_index(format!(
                    "U+{:04X} at offset {}, expected {expected_offset}",
                    entry.codepoint, entry.offset
                )));
            }
            expected_offset += packed_len(entry.width as u32, entry.height as u32);
            entries.push(entry);
        }

        if data.len() < expected_offset {
            return Err(FontError::Truncated {
                expected: expected_offset,
                actual: data.len(),
            });
        }
        if data.len() > expected_offset {
            log::warn!("Ignoring {} trailing bytes after the glyph blob", data.len() - expected_offset);
        }

        Ok(FontContainer {
            layout,
            width: header.dim_a,
            height: header.dim_b,
            entries,
            blob: data[blob_start..expected_offset].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{container::Layout, glyph::NormalizedGlyph, metrics::CanvasSize};

    fn sample() -> Vec<u8> {
        let glyphs = vec![
            NormalizedGlyph {
                codepoint: 0x41,
                width: 3,
                height: 3,
                data: vec![0xAA, 0x80],
            },
            NormalizedGlyph {
                codepoint: 0x42,
                width: 3,
                height: 3,
                data: vec![0x55, 0x00],
            },
        ];
        let (container, _) = FontContainer::encode(glyphs, Layout::Fixed(CanvasSize::new(3, 3))).unwrap();
        container.to_bytes().unwrap()
    }

    #[test]
    fn test_decode() {
        let container = FontContainer::from_bytes(&sample()).unwrap();
        assert_eq!(container.layout, LayoutKind::Fixed);
        assert_eq!((container.width, container.height), (3, 3));
        assert_eq!(container.glyph(0x42).unwrap().data, vec![0x55, 0x00]);
        assert!(container.glyph(0x43).is_none());
    }

    #[test]
    fn test_write_errors_are_reported() {
        let container = FontContainer::from_bytes(&sample()).unwrap();
        assert_eq!(container.to_bytes().unwrap().len(), container.file_len());

        let mut short = [0u8; 20];
        let result = container.write(&mut &mut short[..]);
        assert!(matches!(result, Err(FontError::Io(_))));
    }

    #[test]
    fn test_truncated_blob() {
        let data = sample();
        assert!(matches!(
            FontContainer::from_bytes(&data[..data.len() - 1]),
            Err(FontError::Truncated { expected: 32, actual: 31 })
        ));
        assert!(matches!(FontContainer::from_bytes(&data[..20]), Err(FontError::Truncated { expected: 28, .. })));
    }

    #[test]
    fn test_unsorted_index() {
        let mut data = sample();
        // swap the codepoints of both entries
        data[16] = 0x42;
        data[22] = 0x41;
        assert!(matches!(FontContainer::from_bytes(&data), Err(FontError::InvalidIndex { .. })));
    }

    #[test]
    fn test_gap_in_blob() {
        let mut data = sample();
        data[24] += 1;
        assert!(matches!(FontContainer::from_bytes(&data), Err(FontError::InvalidIndex { .. })));
    }
}
