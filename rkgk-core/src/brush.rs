//! # Brush
//!
//! A brush is a named set of dab parameters. Pressure may optionally drive the size and opacity of
//! each dab, linearly between a minimum and the full value.

/// Smallest distance between two dabs, in canvas pixels, no matter how tiny the brush.
pub const MIN_SPACING: f32 = 0.5;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Brush {
    /// User-chosen, unique within a [`crate::session::PaintSession`]
    pub name: String,
    /// Diameter in canvas pixels, at full pressure.
    pub size: f32,
    /// Diameter at zero pressure. Only consulted if `size_pressure` is set.
    pub min_size: f32,
    pub opacity: u8,
    /// Opacity at zero pressure. Only consulted if `opacity_pressure` is set.
    pub min_opacity: u8,
    pub size_pressure: bool,
    pub opacity_pressure: bool,
    /// Distance between dabs, as a fraction of the diameter. (0, 1]
    pub spacing: f32,
    /// Antialiasing of the dab's edge. [0, 1]
    /// Coverage rises by this much per pixel inward from the rim, so the edge fades over
    /// `1 / softness` pixels. Zero is a hard edge.
    pub softness: f32,
}
impl Default for Brush {
    fn default() -> Self {
        Self {
            name: String::from("Brush"),
            size: 1.0,
            min_size: 1.0,
            opacity: 255,
            min_opacity: 0,
            size_pressure: false,
            opacity_pressure: false,
            spacing: 0.05,
            softness: 1.0,
        }
    }
}
impl Brush {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Diameter of a dab at the given pressure.
    #[must_use]
    pub fn effective_size(&self, pressure: f32) -> f32 {
        if self.size_pressure {
            lerp(self.min_size, self.size, pressure)
        } else {
            self.size
        }
    }
    /// Opacity of a dab at the given pressure. Fractional values are truncated.
    #[must_use]
    pub fn effective_alpha(&self, pressure: f32) -> u8 {
        if self.opacity_pressure {
            // Float to int `as` saturates, out-of-range pressures can't wrap.
            lerp(
                f32::from(self.min_opacity),
                f32::from(self.opacity),
                pressure,
            ) as u8
        } else {
            self.opacity
        }
    }
    /// Distance between consecutive dabs of a stroke at the given pressure, in canvas pixels.
    #[must_use]
    pub fn dab_spacing(&self, pressure: f32) -> f32 {
        // `f32::max` discards NaN in favor of the minimum.
        MIN_SPACING.max(self.effective_size(pressure) * self.spacing)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BrushError {
    #[error("a brush named {0:?} already exists")]
    DuplicateName(String),
    #[error("brush index {0} is out of range")]
    OutOfRange(usize),
    #[error("can't remove the only brush")]
    LastBrush,
}
