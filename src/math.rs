//! Geometric math utilities.
//!
//! Cross products, normalization, point coincidence, segment distance,
//! signed triangle area, and the tolerance-driven arc division count shared
//! by round joins and round caps.

// ============================================================================
// Cross product and normalization
// ============================================================================

/// Cross product of direction vectors `(dx0, dy0)` and `(dx1, dy1)`.
///
/// Positive when the second direction turns left of the first in the
/// tessellator's y-down convention.
#[inline]
pub fn cross(dx0: f32, dy0: f32, dx1: f32, dy1: f32) -> f32 {
    dx1 * dy0 - dx0 * dy1
}

/// Normalize `(x, y)` in place and return its original length.
///
/// Vectors shorter than `1e-6` are left untouched.
#[inline]
pub fn normalize(x: &mut f32, y: &mut f32) -> f32 {
    let d = (*x * *x + *y * *y).sqrt();
    if d > 1e-6 {
        let id = 1.0 / d;
        *x *= id;
        *y *= id;
    }
    d
}

// ============================================================================
// Distance calculations
// ============================================================================

/// Returns `true` if the two points are closer than `tol`.
#[inline]
pub fn pt_equals(x1: f32, y1: f32, x2: f32, y2: f32, tol: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy < tol * tol
}

/// Squared distance from point (x, y) to segment (px,py)→(qx,qy).
#[inline]
pub fn dist_pt_seg(x: f32, y: f32, px: f32, py: f32, qx: f32, qy: f32) -> f32 {
    let pqx = qx - px;
    let pqy = qy - py;
    let dx = x - px;
    let dy = y - py;
    let d = pqx * pqx + pqy * pqy;
    let mut t = pqx * dx + pqy * dy;
    if d > 0.0 {
        t /= d;
    }
    let t = t.clamp(0.0, 1.0);
    let dx = px + t * pqx - x;
    let dy = py + t * pqy - y;
    dx * dx + dy * dy
}

// ============================================================================
// Area
// ============================================================================

/// Twice the signed area of triangle (a, b, c).
#[inline]
pub fn tri_area2(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    let abx = bx - ax;
    let aby = by - ay;
    let acx = cx - ax;
    let acy = cy - ay;
    acx * aby - abx * acy
}

// ============================================================================
// Arc subdivision
// ============================================================================

/// Number of segments needed to approximate an arc of angle `arc` at
/// radius `r` so that the chord error stays below `tol`. Never less than 2.
#[inline]
pub fn curve_divs(r: f32, arc: f32, tol: f32) -> usize {
    let da = (r / (r + tol)).acos() * 2.0;
    let n = (arc / da).ceil();
    if n.is_finite() && n > 2.0 {
        n as usize
    } else {
        2
    }
}

/// Snap `a` to the nearest multiple of `d`.
#[inline]
pub fn quantize(a: f32, d: f32) -> f32 {
    (a / d + 0.5).floor() * d
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::PI;

    #[test]
    fn test_cross_sign() {
        // x-axis then y-axis (down on screen) is a right turn here.
        assert!(cross(1.0, 0.0, 0.0, 1.0) < 0.0);
        assert!(cross(0.0, 1.0, 1.0, 0.0) > 0.0);
        assert_eq!(cross(1.0, 0.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn test_normalize() {
        let (mut x, mut y) = (3.0, 4.0);
        let d = normalize(&mut x, &mut y);
        assert!((d - 5.0).abs() < 1e-6);
        assert!((x - 0.6).abs() < 1e-6);
        assert!((y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_tiny_vector_untouched() {
        let (mut x, mut y) = (1e-8, 0.0);
        let d = normalize(&mut x, &mut y);
        assert!(d < 1e-6);
        assert_eq!(x, 1e-8);
    }

    #[test]
    fn test_pt_equals() {
        assert!(pt_equals(0.0, 0.0, 0.005, 0.0, 0.01));
        assert!(!pt_equals(0.0, 0.0, 0.02, 0.0, 0.01));
    }

    #[test]
    fn test_dist_pt_seg() {
        // Perpendicular foot inside the segment.
        assert!((dist_pt_seg(5.0, 3.0, 0.0, 0.0, 10.0, 0.0) - 9.0).abs() < 1e-5);
        // Beyond the end clamps to the endpoint.
        assert!((dist_pt_seg(13.0, 4.0, 0.0, 0.0, 10.0, 0.0) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_tri_area2() {
        let a = tri_area2(0.0, 0.0, 10.0, 0.0, 10.0, 10.0);
        assert_eq!(a, -100.0);
        let b = tri_area2(0.0, 0.0, 10.0, 10.0, 10.0, 0.0);
        assert_eq!(b, 100.0);
    }

    #[test]
    fn test_curve_divs() {
        assert_eq!(curve_divs(0.0, PI, 0.25), 2);
        let small = curve_divs(2.0, PI, 0.25);
        let large = curve_divs(50.0, PI, 0.25);
        assert!(large > small);
        assert!(curve_divs(50.0, PI, 0.05) > large);
    }

    #[test]
    fn test_quantize() {
        assert!((quantize(1.234, 0.01) - 1.23).abs() < 1e-5);
        assert!((quantize(1.236, 0.01) - 1.24).abs() < 1e-5);
    }
}
