//! # Layers
//!
//! Each layer exclusively owns a tightly packed RGBA8 pixel buffer the size of the canvas.

use crate::color::Color;

pub const BYTES_PER_PIXEL: usize = 4;

/// Dimensions of a pixel buffer, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}
impl Extent {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    /// Bytes per row. Rows are packed with no alignment padding.
    #[must_use]
    pub const fn stride(self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
    #[must_use]
    pub const fn byte_count(self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
    /// Index of the pixel at `(x, y)`, or `None` if outside.
    #[must_use]
    pub fn index_of(self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    /// Display label, not necessarily unique.
    pub name: String,
    /// Reserved. Layers are not blended together yet.
    pub opacity: u8,
    extent: Extent,
    /// Row-major, `extent.byte_count()` long.
    pixels: Vec<u8>,
}
impl Layer {
    /// A new opaque white layer.
    #[must_use]
    pub fn new(name: impl Into<String>, extent: Extent) -> Self {
        Self::new_cleared(name, extent, Color::WHITE)
    }
    #[must_use]
    pub fn new_cleared(name: impl Into<String>, extent: Extent, color: Color) -> Self {
        Self {
            name: name.into(),
            opacity: 255,
            extent,
            pixels: color.as_array().repeat(extent.pixel_count()),
        }
    }
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }
    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.colors_mut().fill(color);
    }
    /// Raw RGBA8 bytes, row-major with a stride of `width * 4`.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        bytemuck::cast_slice(&self.pixels)
    }
    pub fn colors_mut(&mut self) -> &mut [Color] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }
    /// Read one pixel. `None` if out of bounds.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        self.extent.index_of(x, y).map(|idx| self.colors()[idx])
    }
    /// Mutably access one pixel. `None` if out of bounds.
    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Color> {
        let idx = self.extent.index_of(x, y)?;
        self.colors_mut().get_mut(idx)
    }
    /// Replace the contents with `pixels`. The length must match exactly, returns `false` and
    /// leaves the layer untouched otherwise.
    pub fn replace_pixels(&mut self, pixels: &[u8]) -> bool {
        if pixels.len() == self.pixels.len() {
            self.pixels.copy_from_slice(pixels);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Extent, Layer};
    use crate::color::Color;
    #[test]
    fn new_is_white() {
        let layer = Layer::new("Layer 1", Extent::new(3, 2));
        assert_eq!(layer.pixels().len(), 3 * 2 * 4);
        assert!(layer.colors().iter().all(|&c| c == Color::WHITE));
    }
    #[test]
    fn clear_reads_back() {
        let color = Color::new(12, 34, 56, 78);
        let mut layer = Layer::new("Layer 1", Extent::new(7, 5));
        layer.clear(color);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(layer.get(x, y), Some(color));
            }
        }
        let bytes = [12, 34, 56, 78];
        assert!(layer.pixels().chunks_exact(4).all(|px| px == bytes));
    }
    #[test]
    fn odd_width_is_packed() {
        // No row padding, even for widths that aren't a multiple of four.
        let extent = Extent::new(3, 3);
        assert_eq!(extent.stride(), 12);
        let mut layer = Layer::new("odd", extent);
        *layer.get_mut(0, 1).unwrap() = Color::BLACK;
        assert_eq!(&layer.pixels()[12..16], &[0, 0, 0, 255]);
    }
    #[test]
    fn bounds() {
        let layer = Layer::new("b", Extent::new(2, 2));
        assert!(layer.get(-1, 0).is_none());
        assert!(layer.get(0, 2).is_none());
        assert!(layer.get(2, 0).is_none());
        assert!(layer.get(1, 1).is_some());
    }
    #[test]
    fn replace_checks_len() {
        let mut layer = Layer::new("r", Extent::new(2, 1));
        assert!(!layer.replace_pixels(&[0; 4]));
        assert!(layer.colors().iter().all(|&c| c == Color::WHITE));
        assert!(layer.replace_pixels(&[1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(layer.get(1, 0), Some(Color::new(5, 6, 7, 8)));
    }
}
