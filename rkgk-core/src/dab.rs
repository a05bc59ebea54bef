//! # Dabs
//!
//! A dab is a single filled, antialiased circle of paint. Strokes are rendered as many dabs
//! in a row, see [`crate::stroke`].

use crate::{brush::Brush, color::Color, layer::Layer};

/// Below this diameter, dabs stop shrinking and fade out instead.
pub const SMALL_SIZE: f32 = 2.0;

/// One paint impression, in canvas space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dab {
    /// Center, in canvas pixels. `[0.5, 0.5]` is the center of the top-left pixel.
    pub center: [f32; 2],
    pub pressure: f32,
}
impl Dab {
    #[must_use]
    pub fn new(center: [f32; 2], pressure: f32) -> Self {
        Self { center, pressure }
    }
    /// Composite this dab into `target`, in `color`. The alpha of `color` is ignored, opacity
    /// comes from the brush instead.
    ///
    /// Pixels are sampled at their centers. Parts of the dab outside of the layer are dropped.
    /// Returns the number of pixels that were blended.
    pub fn rasterize(&self, brush: &Brush, color: Color, target: &mut Layer) -> usize {
        let size = brush.effective_size(self.pressure);
        let paint_alpha = f32::from(brush.effective_alpha(self.pressure));

        // Tiny brushes are drawn at a one pixel radius, with intensity scaled down
        // in proportion. Keeps shrinking strokes from snapping to a solid dot.
        let (radius, fudge) = if size < SMALL_SIZE {
            (1.0, size / 2.0)
        } else {
            (size / 2.0, 1.0)
        };
        if !radius.is_finite() || !fudge.is_finite() {
            return 0;
        }
        let [cx, cy] = self.center;
        // Every pixel whose center is in the bounding box, clipped to the layer.
        let extent = target.extent();
        let last_column = i64::from(extent.width) - 1;
        let last_row = i64::from(extent.height) - 1;
        let x_min = (cx - radius - 0.5).ceil().max(0.0) as i64;
        let x_max = ((cx + radius - 0.5).floor() as i64).min(last_column);
        let y_min = (cy - radius - 0.5).ceil().max(0.0) as i64;
        let y_max = ((cy + radius - 0.5).floor() as i64).min(last_row);

        let mut blended = 0;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > radius {
                    continue;
                }
                let Some(dst) = target.get_mut(x, y) else {
                    continue;
                };

                // Coverage rises by `softness` per pixel inward from the edge.
                let aa = if brush.softness > 0.0 {
                    (brush.softness * (radius - dist)).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                // Saturating cast, NaN -> 0
                let alpha = (aa * fudge * 255.0).clamp(0.0, paint_alpha) as u8;

                *dst = color.blend_over(*dst, alpha);
                blended += 1;
            }
        }
        blended
    }
}
