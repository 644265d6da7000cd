use rayon::prelude::*;

use crate::glyph::{GlyphSource, NormalizedGlyph};

pub mod bdf;
pub mod outline;
pub mod placement;

pub use bdf::BdfFont;
pub use outline::{AbGlyphRasterizer, GrayRaster, InkBounds, OutlineAdapter, OutlineRasterizer};
pub use placement::Placement;

/// Projects a source glyph to its 1-bit form. Returns `None` when the glyph
/// can't be produced, which is not an error: the codepoint is skipped.
pub trait Normalize {
    fn normalize(&self, source: &GlyphSource) -> Option<NormalizedGlyph>;
}

/// Normalizes every source on the rayon pool.
///
/// Output order follows `sources`, but callers must not rely on it: the
/// container encoder sorts by codepoint anyway.
pub fn normalize_all<N: Normalize + Sync>(normalizer: &N, sources: &[GlyphSource]) -> Vec<NormalizedGlyph> {
    sources.par_iter().filter_map(|source| normalizer.normalize(source)).collect()
}
