//! # Affine transforms
//!
//! The canvas is placed into the viewport by a single [`AffineTransform`], mapping canvas space
//! to device space. Pointer input travels the other way, through [`AffineTransform::invert`].

/// An arbitrary 2D affine transform.
///
/// Maps `[x, y]` to `[m11*x + m21*y + m31, m12*x + m22*y + m32]`.
/// All operations return a new transform and leave `self` untouched.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, PartialEq, PartialOrd)]
#[repr(C)]
pub struct AffineTransform {
    /// Column-major matrix elements, `[[m11, m12], [m21, m22], [m31, m32]]`
    pub elements: [[f32; 2]; 3],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        elements: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
    };
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }
    #[must_use]
    pub const fn new(m11: f32, m12: f32, m21: f32, m22: f32, m31: f32, m32: f32) -> Self {
        Self {
            elements: [[m11, m12], [m21, m22], [m31, m32]],
        }
    }
    /// A pure rotation by `angle` radians about `center`.
    /// Positive angles rotate +X towards +Y (clockwise, in a Y-down device space).
    #[must_use]
    pub fn rotation(angle: f32, center: [f32; 2]) -> Self {
        let (sin, cos) = angle.sin_cos();
        let [cx, cy] = center;
        // Offset such that `center` is a fixed point.
        let dx = cx * (1.0 - cos) + cy * sin;
        let dy = cy * (1.0 - cos) - cx * sin;
        Self::new(cos, sin, -sin, cos, dx, dy)
    }
    /// A pure scale by `(sx, sy)` about `origin`. `origin` is a fixed point.
    #[must_use]
    pub fn scaling(sx: f32, sy: f32, origin: [f32; 2]) -> Self {
        Self::IDENTITY.scale_at(sx, sy, origin)
    }
    #[must_use]
    pub fn translation(dx: f32, dy: f32) -> Self {
        Self::IDENTITY.translate(dx, dy)
    }
    /// Translate in the transform's own local axes - the offset is passed through
    /// the linear part before being accumulated.
    #[must_use = "returns a new transform without modifying `self`"]
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        let [[m11, m12], [m21, m22], [m31, m32]] = self.elements;
        Self::new(
            m11,
            m12,
            m21,
            m22,
            m31 + m11 * dx + m21 * dy,
            m32 + m12 * dx + m22 * dy,
        )
    }
    /// Scale the output of this transform by `(sx, sy)` about `origin`, such that anything
    /// mapping onto `origin` still does afterwards. Zooming keeps the point under the cursor fixed.
    #[must_use = "returns a new transform without modifying `self`"]
    pub fn scale_at(self, sx: f32, sy: f32, origin: [f32; 2]) -> Self {
        let [[m11, m12], [m21, m22], [m31, m32]] = self.elements;
        let [ox, oy] = origin;
        Self::new(
            m11 * sx,
            m12 * sy,
            m21 * sx,
            m22 * sy,
            // Written so that the identity maps origin onto itself exactly.
            sx * m31 + (ox - sx * ox),
            sy * m32 + (oy - sy * oy),
        )
    }
    /// This transform followed by a rotation of `angle` radians about `center`.
    #[must_use = "returns a new transform without modifying `self`"]
    pub fn rotate_at(self, angle: f32, center: [f32; 2]) -> Self {
        self.then(Self::rotation(angle, center))
    }
    /// Compose two transforms. The result applies `self` first, then `other`:
    ///
    /// `a.then(b).transform(p) == b.transform(a.transform(p))`
    #[must_use = "returns a new transform without modifying `self`"]
    pub fn then(self, other: Self) -> Self {
        let [[a11, a12], [a21, a22], [a31, a32]] = self.elements;
        let [[b11, b12], [b21, b22], [b31, b32]] = other.elements;
        Self::new(
            b11 * a11 + b21 * a12,
            b12 * a11 + b22 * a12,
            b11 * a21 + b21 * a22,
            b12 * a21 + b22 * a22,
            b11 * a31 + b21 * a32 + b31,
            b12 * a31 + b22 * a32 + b32,
        )
    }
    /// Determinant of the linear part. Negative if the transform mirrors.
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let [[m11, m12], [m21, m22], _] = self.elements;
        m11 * m22 - m12 * m21
    }
    /// Whether [`Self::invert`] would produce a meaningful result.
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_normal()
    }
    /// The inverse transform, such that `self.then(self.invert())` is the identity.
    ///
    /// Degenerate transforms (zero, subnormal, or non-finite determinant) have no inverse,
    /// and the identity is returned instead. Device-to-canvas mapping must keep working
    /// even if the view has been zoomed down to nothing.
    #[must_use]
    pub fn invert(&self) -> Self {
        if !self.is_invertible() {
            log::trace!("inverting degenerate transform {self:?}, substituting identity");
            return Self::IDENTITY;
        }
        let det = self.determinant();
        let [[m11, m12], [m21, m22], [m31, m32]] = self.elements;
        Self::new(
            m22 / det,
            -m12 / det,
            -m21 / det,
            m11 / det,
            (m21 * m32 - m31 * m22) / det,
            (m31 * m12 - m11 * m32) / det,
        )
    }
    /// Map a point through this transform.
    #[must_use]
    pub fn transform(&self, point: [f32; 2]) -> [f32; 2] {
        let [[m11, m12], [m21, m22], [m31, m32]] = self.elements;
        let [x, y] = point;
        [m11 * x + m21 * y + m31, m12 * x + m22 * y + m32]
    }
    /// Map a vector through the linear part only, ignoring translation.
    #[must_use]
    pub fn transform_vector(&self, vector: [f32; 2]) -> [f32; 2] {
        let [[m11, m12], [m21, m22], _] = self.elements;
        let [x, y] = vector;
        [m11 * x + m21 * y, m12 * x + m22 * y]
    }
}

impl From<[[f32; 2]; 3]> for AffineTransform {
    fn from(elements: [[f32; 2]; 3]) -> Self {
        Self { elements }
    }
}

impl From<AffineTransform> for [[f32; 2]; 3] {
    fn from(value: AffineTransform) -> Self {
        value.elements
    }
}

impl From<AffineTransform> for cgmath::Matrix3<f32> {
    fn from(value: AffineTransform) -> Self {
        let [[m11, m12], [m21, m22], [m31, m32]] = value.elements;
        // Column major, homogenous row last.
        cgmath::Matrix3::new(m11, m12, 0.0, m21, m22, 0.0, m31, m32, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::AffineTransform;

    fn assert_near(a: [f32; 2], b: [f32; 2]) {
        let dist = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        assert!(dist < 1e-3, "{a:?} != {b:?}");
    }

    fn sample_transforms() -> [AffineTransform; 4] {
        let zoom = AffineTransform::scaling(1.5, 1.5, [2.0, 3.0]);
        [
            AffineTransform::IDENTITY,
            AffineTransform::translation(12.0, -4.5),
            AffineTransform::rotation(0.7, [30.0, 40.0]).then(zoom),
            AffineTransform::new(2.0, 0.5, -1.0, 3.0, 7.0, -9.0),
        ]
    }

    #[test]
    fn invert_roundtrip() {
        let points = [[0.0, 0.0], [1.0, 2.0], [-50.0, 13.25], [1024.0, 768.0]];
        for m in sample_transforms() {
            let inv = m.invert();
            for p in points {
                assert_near(inv.transform(m.transform(p)), p);
            }
        }
    }
    #[test]
    fn invert_degenerate_is_identity() {
        let flat = AffineTransform::IDENTITY.scale_at(0.0, 0.0, [5.0, 5.0]);
        assert!(!flat.is_invertible());
        assert_eq!(flat.invert(), AffineTransform::IDENTITY);

        let collinear = AffineTransform::new(1.0, 2.0, 2.0, 4.0, 3.0, 3.0);
        assert_eq!(collinear.invert(), AffineTransform::IDENTITY);
    }
    #[test]
    fn scale_at_fixes_origin() {
        let zoomed = AffineTransform::identity().scale_at(1.5, 1.5, [10.0, 20.0]);
        assert_eq!(zoomed.transform([10.0, 20.0]), [10.0, 20.0]);
        assert_eq!(zoomed.transform([12.0, 20.0]), [13.0, 20.0]);

        // Stacking zooms on a panned view keeps the same device point fixed.
        let view = AffineTransform::translation(100.0, 50.0);
        let canvas_point = view.invert().transform([40.0, 60.0]);
        let zoomed = view.scale_at(1.2, 1.2, [40.0, 60.0]);
        assert_near(zoomed.transform(canvas_point), [40.0, 60.0]);
    }
    #[test]
    fn rotate_at_fixes_center() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let rotated = AffineTransform::IDENTITY.rotate_at(quarter, [5.0, 5.0]);
        assert_near(rotated.transform([5.0, 5.0]), [5.0, 5.0]);
        // Quarter turn, +X goes to +Y.
        assert_near(rotated.transform([6.0, 5.0]), [5.0, 6.0]);
    }
    #[test]
    fn then_order() {
        let scale = AffineTransform::scaling(2.0, 2.0, [0.0, 0.0]);
        let shift = AffineTransform::translation(10.0, 0.0);

        // Scale first, then shift.
        assert_eq!(scale.then(shift).transform([1.0, 1.0]), [12.0, 2.0]);
        // Shift first, then scale.
        assert_eq!(shift.then(scale).transform([1.0, 1.0]), [22.0, 2.0]);

        for a in sample_transforms() {
            for b in sample_transforms() {
                let p = [3.0, -7.0];
                assert_near(a.then(b).transform(p), b.transform(a.transform(p)));
            }
        }
    }
    #[test]
    fn then_inverse_is_identity() {
        for m in sample_transforms() {
            let id = m.then(m.invert());
            for (got, expected) in id
                .elements
                .iter()
                .flatten()
                .zip(AffineTransform::IDENTITY.elements.iter().flatten())
            {
                assert!((got - expected).abs() < 1e-4, "{id:?}");
            }
        }
    }
    #[test]
    fn translate_is_local() {
        // Translation passes through the linear part.
        let scaled = AffineTransform::scaling(3.0, 3.0, [0.0, 0.0]);
        let scaled = scaled.translate(1.0, 2.0);
        assert_eq!(scaled.transform([0.0, 0.0]), [3.0, 6.0]);
        // ..which for the identity is a plain offset.
        assert_eq!(
            AffineTransform::IDENTITY
                .translate(1.0, 2.0)
                .transform([5.0, 5.0]),
            [6.0, 7.0]
        );
    }
    #[test]
    fn matrix3_agrees() {
        use cgmath::{Matrix3, Point2, Transform};
        let m = AffineTransform::new(2.0, 0.5, -1.0, 3.0, 7.0, -9.0);
        let mat: Matrix3<f32> = m.into();
        let p = mat.transform_point(Point2::new(4.0, 1.0));
        assert_near([p.x, p.y], m.transform([4.0, 1.0]));
    }
}
