//! Cubic Bezier flattening.
//!
//! Recursive de Casteljau subdivision at `t = 0.5` with a flatness test
//! measured against the chord. Subdivision stops once the summed control
//! point deviation is small relative to the chord length, or at a hard
//! depth cap. All downstream geometry operates purely on the emitted
//! polylines.

// ============================================================================
// Constants
// ============================================================================

/// Maximum subdivision depth. Deeper recursion is silently truncated,
/// leaving a slightly under-tessellated curve.
pub const CURVE_RECURSION_LIMIT: u32 = 10;

// ============================================================================
// Curve4
// ============================================================================

/// Four control points of a cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve4 {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub x3: f32,
    pub y3: f32,
    pub x4: f32,
    pub y4: f32,
}

impl Curve4 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, x4: f32, y4: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            x4,
            y4,
        }
    }

    /// Degree-elevate the quadratic `(x0,y0) (cx,cy) (x,y)` to a cubic.
    pub fn from_quadratic(x0: f32, y0: f32, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        Self::new(
            x0,
            y0,
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        )
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point_at(&self, t: f32) -> (f32, f32) {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        (
            a * self.x1 + b * self.x2 + c * self.x3 + d * self.x4,
            a * self.y1 + b * self.y2 + c * self.y3 + d * self.y4,
        )
    }

    /// Split at `t = 0.5` into two cubics that together trace this one.
    pub fn subdivide(&self) -> (Curve4, Curve4) {
        let x12 = (self.x1 + self.x2) * 0.5;
        let y12 = (self.y1 + self.y2) * 0.5;
        let x23 = (self.x2 + self.x3) * 0.5;
        let y23 = (self.y2 + self.y3) * 0.5;
        let x34 = (self.x3 + self.x4) * 0.5;
        let y34 = (self.y3 + self.y4) * 0.5;
        let x123 = (x12 + x23) * 0.5;
        let y123 = (y12 + y23) * 0.5;
        let x234 = (x23 + x34) * 0.5;
        let y234 = (y23 + y34) * 0.5;
        let x1234 = (x123 + x234) * 0.5;
        let y1234 = (y123 + y234) * 0.5;
        (
            Curve4::new(self.x1, self.y1, x12, y12, x123, y123, x1234, y1234),
            Curve4::new(x1234, y1234, x234, y234, x34, y34, self.x4, self.y4),
        )
    }

    /// Flatness test against the chord `(x1,y1)-(x4,y4)`.
    ///
    /// `d2` and `d3` are the control point deviations scaled by the chord
    /// length (2D cross products), so the comparison is
    /// `(d2 + d3)^2 < tess_tol * |chord|^2`.
    #[inline]
    pub fn is_flat(&self, tess_tol: f32) -> bool {
        let dx = self.x4 - self.x1;
        let dy = self.y4 - self.y1;
        let d2 = ((self.x2 - self.x4) * dy - (self.y2 - self.y4) * dx).abs();
        let d3 = ((self.x3 - self.x4) * dy - (self.y3 - self.y4) * dx).abs();
        (d2 + d3) * (d2 + d3) < tess_tol * (dx * dx + dy * dy)
    }

    /// Flatten the curve, calling `emit(x, y, corner)` for every polyline
    /// vertex after the start point.
    ///
    /// Only the curve's final end point is reported with `corner = true`;
    /// points introduced by subdivision are curve-interior.
    pub fn flatten<F>(&self, tess_tol: f32, emit: &mut F)
    where
        F: FnMut(f32, f32, bool),
    {
        self.recursive_flatten(tess_tol, 0, true, emit);
    }

    fn recursive_flatten<F>(&self, tess_tol: f32, level: u32, corner: bool, emit: &mut F)
    where
        F: FnMut(f32, f32, bool),
    {
        if level > CURVE_RECURSION_LIMIT {
            return;
        }
        if self.is_flat(tess_tol) {
            emit(self.x4, self.y4, corner);
            return;
        }
        let (left, right) = self.subdivide();
        left.recursive_flatten(tess_tol, level + 1, false, emit);
        right.recursive_flatten(tess_tol, level + 1, corner, emit);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dist_pt_seg;

    fn s_curve() -> Curve4 {
        Curve4::new(0.0, 0.0, 30.0, 80.0, 70.0, -80.0, 100.0, 0.0)
    }

    fn flatten_points(c: &Curve4, tol: f32) -> Vec<(f32, f32, bool)> {
        let mut pts = Vec::new();
        c.flatten(tol, &mut |x, y, corner| pts.push((x, y, corner)));
        pts
    }

    /// Maximum distance from densely sampled curve points to the polyline.
    fn max_deviation(c: &Curve4, tol: f32) -> f32 {
        let mut poly = vec![(c.x1, c.y1)];
        poly.extend(flatten_points(c, tol).into_iter().map(|(x, y, _)| (x, y)));
        let mut worst = 0.0f32;
        for i in 0..=400 {
            let (x, y) = c.point_at(i as f32 / 400.0);
            let best = poly
                .windows(2)
                .map(|s| dist_pt_seg(x, y, s[0].0, s[0].1, s[1].0, s[1].1))
                .fold(f32::MAX, f32::min);
            worst = worst.max(best.sqrt());
        }
        worst
    }

    #[test]
    fn test_straight_curve_emits_single_endpoint() {
        let c = Curve4::new(0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0);
        let pts = flatten_points(&c, 0.25);
        assert_eq!(pts, vec![(30.0, 0.0, true)]);
    }

    #[test]
    fn test_last_point_is_endpoint_and_only_corner() {
        let pts = flatten_points(&s_curve(), 0.25);
        assert!(pts.len() > 4);
        let (x, y, corner) = *pts.last().unwrap();
        assert_eq!((x, y), (100.0, 0.0));
        assert!(corner);
        assert!(pts[..pts.len() - 1].iter().all(|p| !p.2));
    }

    #[test]
    fn test_flattened_points_lie_on_curve() {
        let c = s_curve();
        for (x, y, _) in flatten_points(&c, 0.25) {
            // Every subdivision end point is an on-curve point.
            let best = (0..=2048)
                .map(|i| {
                    let (cx, cy) = c.point_at(i as f32 / 2048.0);
                    ((cx - x).powi(2) + (cy - y).powi(2)).sqrt()
                })
                .fold(f32::MAX, f32::min);
            assert!(best < 0.1, "point ({x}, {y}) off curve by {best}");
        }
    }

    #[test]
    fn test_flatness_convergence() {
        let c = s_curve();
        let coarse = max_deviation(&c, 1.0);
        let medium = max_deviation(&c, 0.25);
        let fine = max_deviation(&c, 0.01);
        assert!(medium <= coarse + 1e-3);
        assert!(fine <= medium + 1e-3);
        assert!(fine < 0.2);
        assert!(flatten_points(&c, 0.01).len() > flatten_points(&c, 1.0).len());
    }

    #[test]
    fn test_recursion_depth_cap() {
        // A zero tolerance never passes the flatness test, so only the
        // depth cap stops subdivision and nothing is emitted.
        assert!(flatten_points(&s_curve(), 0.0).is_empty());

        let pts = flatten_points(&s_curve(), 1e-9);
        assert!(pts.len() <= 1 << (CURVE_RECURSION_LIMIT + 1));
    }

    #[test]
    fn test_subdivide_halves_share_midpoint() {
        let c = s_curve();
        let (l, r) = c.subdivide();
        let (mx, my) = c.point_at(0.5);
        assert!((l.x4 - mx).abs() < 1e-4 && (l.y4 - my).abs() < 1e-4);
        assert_eq!((l.x4, l.y4), (r.x1, r.y1));
        assert_eq!((l.x1, l.y1), (c.x1, c.y1));
        assert_eq!((r.x4, r.y4), (c.x4, c.y4));
    }

    #[test]
    fn test_from_quadratic_preserves_midpoint() {
        let c = Curve4::from_quadratic(0.0, 0.0, 10.0, 20.0, 20.0, 0.0);
        let (x, y) = c.point_at(0.5);
        // Quadratic midpoint: 0.25*p0 + 0.5*c + 0.25*p2
        assert!((x - 10.0).abs() < 1e-4);
        assert!((y - 10.0).abs() < 1e-4);
    }
}
