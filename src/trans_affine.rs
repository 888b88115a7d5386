//! Affine transformation matrix.
//!
//! 2D affine transformations: rotation, scaling, translation and skewing.
//! Path commands are pushed through the current matrix at the moment they
//! are appended, and stroke widths are converted to device space with
//! [`TransAffine::average_scale`].

use crate::basics::is_equal_eps;

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f32 = 1e-6;

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_DETERMINANT: f64 = 1e-6;

/// 2D affine transformation matrix.
///
/// Stores six components: `[sx, shy, shx, sy, tx, ty]` representing the
/// matrix:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy)]
pub struct TransAffine {
    pub sx: f32,
    pub shy: f32,
    pub shx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub fn new() -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Custom matrix from six components.
    pub fn new_custom(sx: f32, shy: f32, shx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Construct from a `[6]` array: `[sx, shy, shx, sy, tx, ty]`.
    pub fn from_array(m: &[f32; 6]) -> Self {
        Self::new_custom(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    /// Translation matrix.
    pub fn new_translation(x: f32, y: f32) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f32, y: f32) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation matrix, angle in radians.
    pub fn new_rotation(a: f32) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    /// Skew along the X axis, angle in radians.
    pub fn new_skewing_x(a: f32) -> Self {
        Self::new_custom(1.0, 0.0, a.tan(), 1.0, 0.0, 0.0)
    }

    /// Skew along the Y axis, angle in radians.
    pub fn new_skewing_y(a: f32) -> Self {
        Self::new_custom(1.0, a.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    // ====================================================================
    // Operations (mutate self)
    // ====================================================================

    /// Reset to identity.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Post-multiply: `self = self * m` (apply `self`, then `m`).
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// Pre-multiply: `self = m * self` (apply `m`, then `self`).
    pub fn premultiply(&mut self, m: &TransAffine) -> &mut Self {
        let mut t = *m;
        t.multiply(self);
        *self = t;
        self
    }

    /// Inverse of the matrix, or `None` when the determinant magnitude is
    /// below [`SINGULAR_DETERMINANT`].
    ///
    /// The inverse is solved in `f64` and rounded back.
    pub fn inverse(&self) -> Option<TransAffine> {
        let sx = self.sx as f64;
        let shy = self.shy as f64;
        let shx = self.shx as f64;
        let sy = self.sy as f64;
        let det = sx * sy - shx * shy;
        if det.abs() < SINGULAR_DETERMINANT {
            return None;
        }
        let tx = self.tx as f64;
        let ty = self.ty as f64;
        let inv = 1.0 / det;
        Some(Self::new_custom(
            (sy * inv) as f32,
            (-shy * inv) as f32,
            (-shx * inv) as f32,
            (sx * inv) as f32,
            ((shx * ty - sy * tx) * inv) as f32,
            ((shy * tx - sx * ty) * inv) as f32,
        ))
    }

    /// Inverse of the matrix, falling back to identity for singular input.
    ///
    /// Degenerate transforms are not an error anywhere in the pipeline; use
    /// [`TransAffine::inverse`] to detect them.
    pub fn safe_inverse(&self) -> TransAffine {
        self.inverse().unwrap_or_default()
    }

    // ====================================================================
    // Store / Load
    // ====================================================================

    /// Components as `[sx, shy, shx, sy, tx, ty]`.
    pub fn to_array(&self) -> [f32; 6] {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
    }

    /// Column-major 3x4 layout expected by GPU uniform blocks.
    pub fn to_mat3x4(&self) -> [f32; 12] {
        [
            self.sx, self.shy, 0.0, 0.0, self.shx, self.sy, 0.0, 0.0, self.tx, self.ty, 1.0, 0.0,
        ]
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Forward transform: `(x, y) -> (x', y')`.
    #[inline]
    pub fn transform(&self, x: &mut f32, y: &mut f32) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx + self.tx;
        *y = tmp * self.shy + *y * self.sy + self.ty;
    }

    /// Forward transform returning the mapped point.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (mut x, mut y) = (x, y);
        self.transform(&mut x, &mut y);
        (x, y)
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Mean length of the two basis rows, used to carry stroke widths and
    /// font sizes from local to device space.
    pub fn average_scale(&self) -> f32 {
        let sx = (self.sx * self.sx + self.shx * self.shx).sqrt();
        let sy = (self.shy * self.shy + self.sy * self.sy).sqrt();
        (sx + sy) * 0.5
    }

    /// Check if this is an identity matrix.
    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.is_equal(&TransAffine::new(), epsilon)
    }

    /// Check if two matrices are equal within epsilon.
    pub fn is_equal(&self, m: &TransAffine, epsilon: f32) -> bool {
        is_equal_eps(self.sx, m.sx, epsilon)
            && is_equal_eps(self.shy, m.shy, epsilon)
            && is_equal_eps(self.shx, m.shx, epsilon)
            && is_equal_eps(self.sy, m.sy, epsilon)
            && is_equal_eps(self.tx, m.tx, epsilon)
            && is_equal_eps(self.ty, m.ty, epsilon)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransAffine {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, AFFINE_EPSILON)
    }
}

impl std::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        let mut result = self;
        result.multiply(&rhs);
        result
    }
}

impl std::ops::MulAssign for TransAffine {
    fn mul_assign(&mut self, rhs: TransAffine) {
        self.multiply(&rhs);
    }
}

// ============================================================================
// Tests
// ============================================================================
