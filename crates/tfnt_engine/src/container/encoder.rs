use crate::{
    bits::packed_len,
    container::{FontContainer, IndexEntry, LayoutKind, HEADER_LEN},
    glyph::NormalizedGlyph,
    metrics::CanvasSize,
    FontError, Result,
};

/// Requested container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// All glyphs are exactly `CanvasSize`, codepoints 1..=0xFFFF.
    Fixed(CanvasSize),
    /// Glyphs up to 255x255 each, any 32 bit codepoint.
    Variable,
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            Layout::Fixed(_) => LayoutKind::Fixed,
            Layout::Variable => LayoutKind::Variable,
        }
    }
}

#[derive(Debug, Default)]
pub struct EncodeReport {
    /// Source glyphs the adapter could not produce.
    pub unavailable: usize,
    /// Glyphs handed to the encoder.
    pub candidates: usize,
    /// Glyphs in the container.
    pub encoded: usize,
    /// Glyphs dropped because the layout can't express them.
    pub skipped: Vec<FontError>,
    /// Glyphs replaced by a later glyph with the same codepoint.
    pub duplicates: usize,
    pub blob_len: usize,
    pub file_len: usize,
}

impl FontContainer {
    /// Builds a container from normalized glyphs in any order.
    ///
    /// Glyphs the layout can't hold are skipped and listed in the report.
    /// Fails with [`FontError::EmptyResult`] if nothing is left.
    pub fn encode(glyphs: Vec<NormalizedGlyph>, layout: Layout) -> Result<(Self, EncodeReport)> {
        if let Layout::Fixed(canvas) = layout {
            canvas.validate()?;
        }

        let mut report = EncodeReport {
            candidates: glyphs.len(),
            ..Default::default()
        };

        let mut accepted = Vec::with_capacity(glyphs.len());
        for glyph in glyphs {
            match check_glyph(&glyph, layout) {
                Ok(()) => accepted.push(glyph),
                Err(err) => {
                    log::debug!("Skipping glyph: {err}");
                    report.skipped.push(err);
                }
            }
        }

        // stable, so for duplicates the input order is kept and the last one wins
        accepted.sort_by_key(|g| g.codepoint);
        let mut unique: Vec<NormalizedGlyph> = Vec::with_capacity(accepted.len());
        for glyph in accepted {
            if let Some(last) = unique.last_mut() {
                if last.codepoint == glyph.codepoint {
                    log::warn!("Duplicate glyph U+{:04X}, keeping the last one", glyph.codepoint);
                    report.duplicates += 1;
                    *last = glyph;
                    continue;
                }
            }
            unique.push(glyph);
        }

        if unique.is_empty() {
            return Err(FontError::EmptyResult);
        }

        let kind = layout.kind();
        let (width, height) = match layout {
            Layout::Fixed(canvas) => (canvas.width as u8, canvas.height as u8),
            Layout::Variable => (
                unique.iter().map(|g| g.width).max().unwrap_or(0) as u8,
                unique.iter().map(|g| g.height).max().unwrap_or(0) as u8,
            ),
        };

        let blob_start = HEADER_LEN + unique.len() * kind.entry_len();
        let mut entries = Vec::with_capacity(unique.len());
        let mut blob = Vec::new();
        for glyph in &unique {
            let offset = u32::try_from(blob_start + blob.len()).map_err(|_| FontError::invalid_index("container exceeds 4 GiB"))?;
            entries.push(IndexEntry {
                codepoint: glyph.codepoint,
                offset,
                width: glyph.width as u8,
                height: glyph.height as u8,
            });
            blob.extend_from_slice(&glyph.data);
        }

        let container = FontContainer {
            layout: kind,
            width,
            height,
            entries,
            blob,
        };
        report.encoded = container.glyph_count();
        report.blob_len = container.blob.len();
        report.file_len = container.file_len();
        log::info!(
            "Encoded {} of {} glyphs ({:?}, {}x{}), {} bytes",
            report.encoded,
            report.candidates,
            kind,
            width,
            height,
            report.file_len
        );
        Ok((container, report))
    }
}

fn check_glyph(glyph: &NormalizedGlyph, layout: Layout) -> Result<()> {
    let (min, max) = layout.kind().codepoint_range();
    if glyph.codepoint < min || glyph.codepoint > max {
        return Err(FontError::unsupported(glyph.codepoint, format!("outside {min:#X}..={max:#X}")));
    }
    match layout {
        Layout::Fixed(canvas) => {
            if glyph.width != canvas.width || glyph.height != canvas.height {
                return Err(FontError::unsupported(
                    glyph.codepoint,
                    format!("glyph is {}x{}, canvas is {}x{}", glyph.width, glyph.height, canvas.width, canvas.height),
                ));
            }
        }
        Layout::Variable => {
            if !(1..=255).contains(&glyph.width) || !(1..=255).contains(&glyph.height) {
                return Err(FontError::unsupported(
                    glyph.codepoint,
                    format!("glyph size {}x{} exceeds 255x255", glyph.width, glyph.height),
                ));
            }
        }
    }
    let expected = packed_len(glyph.width, glyph.height);
    if glyph.data.len() != expected {
        return Err(FontError::unsupported(
            glyph.codepoint,
            format!("bitmap has {} bytes, expected {expected}", glyph.data.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn glyph(codepoint: u32, width: u32, height: u32, fill: u8) -> NormalizedGlyph {
        NormalizedGlyph {
            codepoint,
            width,
            height,
            data: vec![fill; packed_len(width, height)],
        }
    }

    #[test]
    fn test_fixed_layout_bytes() {
        let glyphs = vec![glyph(0x42, 4, 4, 0xBB), glyph(0x41, 4, 4, 0xAA)];
        let (container, report) = FontContainer::encode(glyphs, Layout::Fixed(CanvasSize::new(4, 4))).unwrap();
        assert_eq!(report.encoded, 2);

        #[rustfmt::skip]
        let expected = vec![
            b'T', b'F', b'N', b'T', 1, 4, 4, 0, 2, 0, 0, 0, 16, 0, 0, 0,
            0x41, 0, 28, 0, 0, 0,
            0x42, 0, 30, 0, 0, 0,
            0xAA, 0xAA, 0xBB, 0xBB,
        ];
        assert_eq!(container.to_bytes().unwrap(), expected);
    }

    #[test]
    fn test_variable_layout_bytes() {
        let glyphs = vec![glyph(0x4E2D, 3, 3, 0xFF), glyph(0x21, 1, 5, 0xF8)];
        let (container, _) = FontContainer::encode(glyphs, Layout::Variable).unwrap();

        #[rustfmt::skip]
        let expected = vec![
            b'T', b'F', b'N', b'T', 1, 3, 5, 1, 2, 0, 0, 0, 0, 0, 0, 0,
            0x21, 0, 0, 0, 36, 0, 0, 0, 1, 5,
            0x2D, 0x4E, 0, 0, 37, 0, 0, 0, 3, 3,
            0xF8, 0xFF, 0xFF,
        ];
        assert_eq!(container.to_bytes().unwrap(), expected);
    }

    #[test]
    fn test_fixed_layout_range() {
        let glyphs = vec![glyph(0, 2, 2, 0), glyph(0x41, 2, 2, 0), glyph(0x1F600, 2, 2, 0), glyph(0x42, 3, 2, 0)];
        let (container, report) = FontContainer::encode(glyphs, Layout::Fixed(CanvasSize::new(2, 2))).unwrap();
        assert_eq!(container.glyph_count(), 1);
        assert_eq!(report.candidates, 4);
        assert_eq!(report.skipped.len(), 3);
        assert!(report
            .skipped
            .iter()
            .all(|err| matches!(err, FontError::UnsupportedCodepoint { .. })));
    }

    #[test]
    fn test_duplicates_last_wins() {
        let glyphs = vec![glyph(0x41, 8, 1, 0x01), glyph(0x40, 8, 1, 0x00), glyph(0x41, 8, 1, 0x02)];
        let (container, report) = FontContainer::encode(glyphs, Layout::Variable).unwrap();
        assert_eq!(report.duplicates, 1);
        assert_eq!(container.glyph(0x41).unwrap().data, vec![0x02]);
    }

    #[test]
    fn test_empty_result() {
        assert!(matches!(FontContainer::encode(Vec::new(), Layout::Variable), Err(FontError::EmptyResult)));

        let glyphs = vec![glyph(0x10000, 2, 2, 0)];
        assert!(matches!(
            FontContainer::encode(glyphs, Layout::Fixed(CanvasSize::new(2, 2))),
            Err(FontError::EmptyResult)
        ));
    }

    #[test]
    fn test_invalid_canvas() {
        let glyphs = vec![glyph(0x41, 300, 2, 0)];
        assert!(matches!(
            FontContainer::encode(glyphs, Layout::Fixed(CanvasSize::new(300, 2))),
            Err(FontError::InvalidCanvas { width: 300, height: 2 })
        ));
    }
}
