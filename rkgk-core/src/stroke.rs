//! # Strokes
//!
//! Pointer samples arrive at whatever rate the input device likes. The [`Resampler`] turns them
//! into [`Dab`]s spaced evenly along the path, so fast motion doesn't leave gaps and slow motion
//! doesn't pile up redundant dabs.

use crate::{brush::Brush, dab::Dab};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Stroke state machine. Idle until [`Resampler::begin`], stroking until [`Resampler::end`].
#[derive(Clone, Debug, Default)]
pub struct Resampler {
    /// The last dab emitted, if stroking. Not necessarily the last pointer position,
    /// leftover distance carries over to the next sample.
    last: Option<Dab>,
}
impl Resampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.last.is_some()
    }
    /// The most recently emitted dab of the current stroke.
    #[must_use]
    pub fn last(&self) -> Option<Dab> {
        self.last
    }
    /// Start a new stroke, returning the first dab to draw. Any stroke in progress is discarded.
    pub fn begin(&mut self, position: [f32; 2], pressure: f32) -> Dab {
        let dab = Dab::new(position, pressure);
        self.last = Some(dab);
        dab
    }
    /// Continue the stroke to a new sample. Returns the dabs covering the path since the last
    /// emitted dab, which may be none at all if the pointer hasn't travelled far enough.
    ///
    /// Spacing is taken from `brush` at the new sample's pressure. Nothing is emitted while idle.
    pub fn advance(&mut self, position: [f32; 2], pressure: f32, brush: &Brush) -> Dabs {
        let Some(from) = self.last else {
            return Dabs::empty();
        };
        let to = Dab::new(position, pressure);
        let delta = [to.center[0] - from.center[0], to.center[1] - from.center[1]];
        let dist = (delta[0] * delta[0] + delta[1] * delta[1]).sqrt();
        let spacing = brush.dab_spacing(pressure);

        if !dist.is_finite() || dist < spacing {
            return Dabs::empty();
        }

        let dabs = Dabs {
            from,
            to,
            step: spacing / dist,
            // Saturating float -> int.
            count: (dist / spacing).floor() as u32,
            next: 1,
            end: u32::MAX,
        };
        self.last = dabs.get(dabs.count);
        dabs
    }
    /// End the stroke. No trailing dab is emitted.
    /// Returns whether there was a stroke to end.
    pub fn end(&mut self) -> bool {
        self.last.take().is_some()
    }
}

/// Evenly spaced dabs along a segment, see [`Resampler::advance`].
#[derive(Clone, Debug)]
pub struct Dabs {
    from: Dab,
    to: Dab,
    /// Parametric distance between dabs.
    step: f32,
    count: u32,
    /// Index of the next dab, starting at one. `from` itself was already drawn.
    next: u32,
    /// Last index to yield, see [`Dabs::within`].
    end: u32,
}
impl Dabs {
    fn empty() -> Self {
        Self {
            from: Dab::new([0.0; 2], 0.0),
            to: Dab::new([0.0; 2], 0.0),
            step: 0.0,
            count: 0,
            next: 1,
            end: 0,
        }
    }
    /// Skip the dabs whose centers lie outside of the box `min..=max`. The segment is straight,
    /// so those that remain are a contiguous run and the rest are never computed.
    #[must_use]
    pub fn within(mut self, min: [f32; 2], max: [f32; 2]) -> Self {
        // Parametric range of the segment inside the box.
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..2 {
            let start = self.from.center[axis];
            let delta = self.to.center[axis] - start;
            if delta == 0.0 {
                if start < min[axis] || start > max[axis] {
                    t_max = f32::NEG_INFINITY;
                }
                continue;
            }
            let a = (min[axis] - start) / delta;
            let b = (max[axis] - start) / delta;
            t_min = t_min.max(a.min(b));
            t_max = t_max.min(a.max(b));
        }
        // Saturating float -> int, NaN -> 0.
        let first = (t_min / self.step).ceil().max(1.0) as u32;
        let last = (t_max / self.step).floor() as u32;
        self.next = self.next.max(first);
        self.end = self.end.min(last);
        self
    }
    fn get(&self, idx: u32) -> Option<Dab> {
        if idx == 0 || idx > self.count.min(self.end) {
            return None;
        }
        let f = idx as f32 * self.step;
        Some(Dab::new(
            [
                lerp(self.from.center[0], self.to.center[0], f),
                lerp(self.from.center[1], self.to.center[1], f),
            ],
            lerp(self.from.pressure, self.to.pressure, f),
        ))
    }
}
impl Iterator for Dabs {
    type Item = Dab;
    fn next(&mut self) -> Option<Self::Item> {
        let dab = self.get(self.next)?;
        self.next = self.next.saturating_add(1);
        Some(dab)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let last = self.count.min(self.end);
        let remaining = last.saturating_add(1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for Dabs {}
impl std::iter::FusedIterator for Dabs {}

#[cfg(test)]
mod test {
    use super::Resampler;
    use crate::brush::Brush;

    fn brush(size: f32, spacing: f32) -> Brush {
        Brush {
            size,
            spacing,
            ..Brush::default()
        }
    }

    #[test]
    fn idle_emits_nothing() {
        let mut resampler = Resampler::new();
        let dabs = resampler.advance([10.0, 10.0], 1.0, &brush(4.0, 0.05));
        assert_eq!(dabs.count(), 0);
        assert!(!resampler.is_stroking());
        assert!(!resampler.end());
    }
    #[test]
    fn straight_drag() {
        let mut resampler = Resampler::new();
        resampler.begin([0.0, 0.0], 1.0);
        let dabs: Vec<_> = resampler
            .advance([10.0, 0.0], 1.0, &brush(4.0, 0.05))
            .collect();

        // max(0.5, 4 * 0.05) spacing over 10 units
        assert_eq!(dabs.len(), 20);
        let mut prev = 0.0;
        for dab in &dabs {
            assert!((dab.center[0] - prev - 0.5).abs() < 1e-4);
            assert_eq!(dab.center[1], 0.0);
            prev = dab.center[0];
        }
        assert!((resampler.last().unwrap().center[0] - 10.0).abs() < 1e-4);
    }
    #[test]
    fn short_moves_are_deferred() {
        let brush = brush(10.0, 0.25);
        let mut resampler = Resampler::new();
        resampler.begin([0.0, 0.0], 1.0);

        // Spacing 2.5, none of these get far enough on their own.
        assert_eq!(resampler.advance([1.0, 0.0], 1.0, &brush).count(), 0);
        assert_eq!(resampler.advance([2.0, 0.0], 1.0, &brush).count(), 0);
        assert_eq!(resampler.last().unwrap().center, [0.0, 0.0]);

        // Measured from the last dab, not the last sample.
        let dabs: Vec<_> = resampler.advance([3.0, 0.0], 1.0, &brush).collect();
        assert_eq!(dabs.len(), 1);
        assert!((dabs[0].center[0] - 2.5).abs() < 1e-5);
    }
    #[test]
    fn residual_carries_over() {
        let brush = brush(10.0, 0.25);
        let mut resampler = Resampler::new();
        resampler.begin([0.0, 0.0], 1.0);

        let mut xs = Vec::new();
        for x in [3.0, 6.0, 9.0, 12.0] {
            xs.extend(
                resampler
                    .advance([x, 0.0], 1.0, &brush)
                    .map(|dab| dab.center[0]),
            );
        }
        // Same as one long drag to 12.
        assert_eq!(xs.len(), 4);
        for (i, x) in xs.iter().enumerate() {
            assert!((x - 2.5 * (i + 1) as f32).abs() < 1e-4, "{xs:?}");
        }
    }
    #[test]
    fn pressure_is_interpolated() {
        let mut resampler = Resampler::new();
        resampler.begin([0.0, 0.0], 0.0);
        let dabs: Vec<_> = resampler
            .advance([0.0, 4.0], 1.0, &brush(2.0, 0.5))
            .collect();
        assert_eq!(dabs.len(), 4);
        for (i, dab) in dabs.iter().enumerate() {
            let f = (i + 1) as f32 / 4.0;
            assert!((dab.pressure - f).abs() < 1e-5);
            assert!((dab.center[1] - 4.0 * f).abs() < 1e-4);
        }
    }
    #[test]
    fn end_resets() {
        let mut resampler = Resampler::new();
        resampler.begin([1.0, 1.0], 0.5);
        assert!(resampler.is_stroking());
        assert!(resampler.end());
        assert!(!resampler.is_stroking());
        assert!(resampler.last().is_none());
    }
    #[test]
    fn within_skips_far_dabs() {
        let mut resampler = Resampler::new();
        resampler.begin([-1000.0, 2.0], 1.0);
        let dabs = resampler
            .advance([1000.0, 2.0], 1.0, &brush(1.0, 0.5))
            .within([0.0, 0.0], [10.0, 4.0]);
        // Spacing 0.5 over the ten units that overlap.
        let len = dabs.len();
        let dabs: Vec<_> = dabs.collect();
        assert_eq!(dabs.len(), len);
        assert!((19..=21).contains(&len), "{len}");
        for dab in &dabs {
            assert!((-1e-2..=10.01).contains(&dab.center[0]), "{dab:?}");
        }
        // The stroke still continues from the far end.
        assert!((resampler.last().unwrap().center[0] - 1000.0).abs() < 1e-2);
    }
    #[test]
    fn within_huge_segment_is_bounded() {
        let mut resampler = Resampler::new();
        resampler.begin([5.0, 5.0], 1.0);
        let dabs = resampler
            .advance([1.0e9, 5.0], 1.0, &brush(1.0, 0.5))
            .within([0.0, 0.0], [10.0, 10.0]);
        assert!(dabs.len() <= 11, "{}", dabs.len());
        assert!(dabs.count() >= 9);

        // Entirely outside on a flat axis.
        resampler.begin([5.0, 50.0], 1.0);
        let dabs = resampler
            .advance([9.0, 50.0], 1.0, &brush(1.0, 0.5))
            .within([0.0, 0.0], [10.0, 10.0]);
        assert_eq!(dabs.len(), 0);
        assert_eq!(dabs.count(), 0);
    }
    #[test]
    fn size_hint_exact() {
        let mut resampler = Resampler::new();
        resampler.begin([0.0, 0.0], 1.0);
        let mut dabs = resampler.advance([5.0, 0.0], 1.0, &brush(1.0, 0.5));
        assert_eq!(dabs.len(), 10);
        dabs.next();
        assert_eq!(dabs.len(), 9);
    }
}
