/// A straight (non-premultiplied) sRGB color with 8 bits per channel.
///
/// Layout matches one pixel of a [`crate::layer::Layer`] buffer, so buffers may be viewed
/// as `&[Color]` through bytemuck.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    /// Replace the alpha channel, keeping the color.
    #[must_use = "returns a new color without modifying `self`"]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
    /// From normalized float channels, as handed out by most color pickers.
    /// Values are clamped to `[0, 1]`, NaN becomes zero.
    #[must_use]
    pub fn from_unit_floats([r, g, b, a]: [f32; 4]) -> Self {
        // `as` saturates and maps NaN to 0.
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(quantize(r), quantize(g), quantize(b), quantize(a))
    }
    #[must_use]
    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    /// Composite `self` over `dst` with the given coverage,
    /// `dst = (src*alpha + dst*(255-alpha)) / 255` per channel. The alpha channel of `self` is
    /// ignored, and taken to be opaque.
    #[must_use]
    pub fn blend_over(self, dst: Self, alpha: u8) -> Self {
        let alpha = u16::from(alpha);
        let inv_alpha = 255 - alpha;
        let mix = |src: u8, dst: u8| -> u8 {
            // Max (255*255)/255, fits.
            ((u16::from(src) * alpha + u16::from(dst) * inv_alpha) / 255) as u8
        };
        Self::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            mix(255, dst.a),
        )
    }
}
impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
impl From<Color> for [u8; 4] {
    fn from(value: Color) -> Self {
        value.as_array()
    }
}

#[cfg(test)]
mod test {
    use super::Color;
    #[test]
    fn blend_extremes() {
        let red = Color::new(255, 0, 0, 255);
        let half_white = Color::new(255, 255, 255, 128);

        assert_eq!(red.blend_over(half_white, 255), Color::new(255, 0, 0, 255));
        assert_eq!(red.blend_over(half_white, 0), half_white);
    }
    #[test]
    fn blend_partial() {
        let black = Color::BLACK;
        // (0*128 + 255*127) / 255 = 127, alpha (255*128 + 255*127)/255 = 255
        assert_eq!(
            black.blend_over(Color::WHITE, 128),
            Color::new(127, 127, 127, 255)
        );
        // Alpha of a transparent destination grows with coverage.
        assert_eq!(
            black.blend_over(Color::TRANSPARENT, 51),
            Color::new(0, 0, 0, 51)
        );
    }
    #[test]
    fn unit_floats() {
        assert_eq!(
            Color::from_unit_floats([1.0, 0.0, 0.5, 2.0]),
            Color::new(255, 0, 128, 255)
        );
        assert_eq!(
            Color::from_unit_floats([f32::NAN, -1.0, 0.0, 1.0]),
            Color::new(0, 0, 0, 255)
        );
    }
}
