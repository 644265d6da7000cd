//! End-to-end conversions: source adapter, normalization, container.

use crate::{
    container::{EncodeReport, FontContainer, Layout},
    glyph::{GlyphSource, NormalizedGlyph},
    metrics::CanvasOverride,
    sources::{normalize_all, BdfFont, Normalize, OutlineAdapter, OutlineRasterizer, Placement},
    Result,
};

pub const DEFAULT_OUTLINE_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Render size in pixels per em.
    pub size: u32,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self { size: DEFAULT_OUTLINE_SIZE }
    }
}

/// Placement for `font`, taking canvas overrides into account. Fails with
/// [`FontError::InvalidCanvas`](crate::FontError::InvalidCanvas) before any
/// raster is allocated if the canvas doesn't fit the fixed layout.
pub fn bdf_placement(font: &BdfFont, overrides: CanvasOverride) -> Result<Placement> {
    let canvas = font.metrics.canvas(overrides).validate()?;
    Ok(Placement::new(canvas, font.metrics.effective_ascent()))
}

/// Converts a parsed BDF font into a fixed layout container.
pub fn convert_bdf(font: &BdfFont, overrides: CanvasOverride) -> Result<(FontContainer, EncodeReport)> {
    let placement = bdf_placement(font, overrides)?;
    log::info!(
        "Bitmap font: {} glyphs, ascent {}, descent {}, canvas {}x{}",
        font.glyphs.len(),
        font.metrics.effective_ascent(),
        font.metrics.effective_descent(),
        placement.canvas.width,
        placement.canvas.height
    );

    let sources: Vec<GlyphSource> = font.glyphs.iter().cloned().map(GlyphSource::Bitmap).collect();
    encode_sources(&placement, &sources, Layout::Fixed(placement.canvas))
}

/// Places a single BDF glyph the way [`convert_bdf`] would. `Ok(None)` if the
/// font has no glyph for `codepoint`.
pub fn bdf_glyph(font: &BdfFont, codepoint: u32, overrides: CanvasOverride) -> Result<Option<NormalizedGlyph>> {
    let placement = bdf_placement(font, overrides)?;
    Ok(font
        .glyph(codepoint)
        .map(|glyph| NormalizedGlyph::from_raster(codepoint, &placement.place(glyph))))
}

/// Renders every printable glyph of an outline font into a variable layout
/// container.
pub fn convert_outline<R: OutlineRasterizer + Sync>(adapter: &OutlineAdapter<R>, options: OutlineOptions) -> Result<(FontContainer, EncodeReport)> {
    let sources = adapter.sources(options.size);
    log::info!("Outline font: {} printable codepoints, rendering at {}px", sources.len(), options.size);
    encode_sources(adapter, &sources, Layout::Variable)
}

fn encode_sources<N: Normalize + Sync>(normalizer: &N, sources: &[GlyphSource], layout: Layout) -> Result<(FontContainer, EncodeReport)> {
    let glyphs = normalize_all(normalizer, sources);
    let unavailable = sources.len() - glyphs.len();
    if unavailable > 0 {
        log::info!("{unavailable} glyphs unavailable");
    }
    let (container, mut report) = FontContainer::encode(glyphs, layout)?;
    report.unavailable = unavailable;
    Ok((container, report))
}
