use crate::{FontError, Result};

/// Fallback for canvas width and ascent when the source declares neither.
pub const DEFAULT_EXTENT: u32 = 9;

/// Largest canvas side the container's 8 bit dimension fields can carry.
pub const MAX_CANVAS_SIDE: u32 = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Font level properties collected from a bitmap font description.
///
/// Every field is optional because sources omit them in practice; the
/// `effective_*` accessors apply the fallbacks:
/// * ascent: `FONT_ASCENT`, else bounding box height, else [`DEFAULT_EXTENT`]
/// * descent: `FONT_DESCENT`, else 0
/// * canvas width: bounding box width, else [`DEFAULT_EXTENT`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontMetrics {
    pub name: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub ascent: Option<u32>,
    pub descent: Option<u32>,
    /// Value of `CHARS`, only compared against the glyph count for a warning.
    pub declared_chars: Option<usize>,
}

impl FontMetrics {
    pub fn effective_ascent(&self) -> u32 {
        self.ascent.or(self.bounding_box.map(|bb| bb.height)).unwrap_or(DEFAULT_EXTENT)
    }

    pub fn effective_descent(&self) -> u32 {
        self.descent.unwrap_or(0)
    }

    /// Target canvas for the fixed size layout, honoring user overrides.
    pub fn canvas(&self, overrides: CanvasOverride) -> CanvasSize {
        CanvasSize {
            width: overrides
                .width
                .unwrap_or_else(|| self.bounding_box.map(|bb| bb.width).unwrap_or(DEFAULT_EXTENT)),
            height: overrides
                .height
                .unwrap_or_else(|| self.effective_ascent().saturating_add(self.effective_descent())),
        }
    }
}

/// User supplied canvas dimensions, replacing the derived ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasOverride {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the canvas if both sides are within `1..=255`, else
    /// [`FontError::InvalidCanvas`].
    pub fn validate(self) -> Result<Self> {
        let valid = 1..=MAX_CANVAS_SIDE;
        if valid.contains(&self.width) && valid.contains(&self.height) {
            Ok(self)
        } else {
            Err(FontError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_from_properties() {
        let metrics = FontMetrics {
            bounding_box: Some(BoundingBox {
                width: 8,
                height: 10,
                offset_x: 0,
                offset_y: -2,
            }),
            ascent: Some(7),
            descent: Some(2),
            ..Default::default()
        };
        assert_eq!(metrics.canvas(CanvasOverride::default()), CanvasSize::new(8, 9));

        let overrides = CanvasOverride {
            width: Some(12),
            height: None,
        };
        assert_eq!(metrics.canvas(overrides), CanvasSize::new(12, 9));
    }

    #[test]
    fn test_fallbacks() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.effective_ascent(), DEFAULT_EXTENT);
        assert_eq!(metrics.effective_descent(), 0);
        assert_eq!(metrics.canvas(CanvasOverride::default()), CanvasSize::new(9, 9));

        let metrics = FontMetrics {
            bounding_box: Some(BoundingBox {
                width: 6,
                height: 13,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(metrics.effective_ascent(), 13);
        assert_eq!(metrics.canvas(CanvasOverride::default()), CanvasSize::new(6, 13));
    }

    #[test]
    fn test_validate_canvas() {
        assert_eq!(CanvasSize::new(1, 255).validate().unwrap(), CanvasSize::new(1, 255));
        assert!(matches!(
            CanvasSize::new(0, 9).validate(),
            Err(FontError::InvalidCanvas { width: 0, height: 9 })
        ));
        assert!(matches!(
            CanvasSize::new(200_000, 200_000).validate(),
            Err(FontError::InvalidCanvas { width: 200_000, .. })
        ));

        let metrics = FontMetrics {
            ascent: Some(u32::MAX),
            descent: Some(2),
            ..Default::default()
        };
        assert_eq!(metrics.canvas(CanvasOverride::default()).height, u32::MAX);
        assert!(metrics.canvas(CanvasOverride::default()).validate().is_err());
    }
}
