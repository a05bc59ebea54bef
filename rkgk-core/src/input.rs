//! # Pointer input
//!
//! Decoded samples from a mouse, pen, or touch device. Hardware polling happens elsewhere, this is
//! only the shape of the data handed to [`crate::canvas::Canvas::handle_pointer_event`].

/// A single pointer sample, in device space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position in device pixels.
    pub position: [f32; 2],
    /// Whether the primary button is held (or the pen is touching).
    pub pressed: bool,
    /// Normalized pressure, if the device reports it.
    pub pressure: Option<f32>,
}
impl PointerEvent {
    #[must_use]
    pub fn new(position: [f32; 2], pressed: bool, pressure: Option<f32>) -> Self {
        Self {
            position,
            pressed,
            pressure,
        }
    }
    /// A pressed sample at full pressure.
    #[must_use]
    pub fn down(position: [f32; 2]) -> Self {
        Self::new(position, true, Some(1.0))
    }
    /// A released sample.
    #[must_use]
    pub fn up(position: [f32; 2]) -> Self {
        Self::new(position, false, None)
    }
    /// Pressure in `[0, 1]` to paint with.
    ///
    /// Mice report no pressure, and some tablet drivers report exactly zero for the same thing.
    /// Both mean "unknown" while pressed, and are painted at full pressure.
    #[must_use]
    pub fn effective_pressure(&self) -> f32 {
        match self.pressure {
            Some(pressure) if pressure.is_nan() => 1.0,
            Some(pressure) if self.pressed && pressure == 0.0 => 1.0,
            Some(pressure) => pressure.clamp(0.0, 1.0),
            None => 1.0,
        }
    }
}
