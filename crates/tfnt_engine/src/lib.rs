//! Compiles bitmap (BDF) and outline (TrueType/OpenType) fonts into TFNT,
//! a compact 1-bit glyph atlas read by LED matrix firmware.

pub mod bits;
pub mod container;
pub mod error;
pub mod glyph;
pub mod metrics;
pub mod pipeline;
pub mod preview;
pub mod sources;

pub use container::{EncodeReport, FontContainer, FontHeader, IndexEntry, Layout, LayoutKind};
pub use error::{FontError, Result};
pub use glyph::{BitmapGlyph, BitmapRow, GlyphSource, NormalizedGlyph, OutlineGlyph};
pub use metrics::{BoundingBox, CanvasOverride, CanvasSize, FontMetrics};
pub use preview::PreviewStyle;
