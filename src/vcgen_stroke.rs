//! Stroke expansion.
//!
//! Turns each classified sub-path into one triangle strip: a start cap,
//! two vertices per interior point (or join geometry at flagged corners),
//! and an end cap. Closed paths have no caps; their strip wraps back onto
//! its first two vertices.

use log::trace;

use crate::basics::PI;
use crate::math::{curve_divs, normalize};
use crate::math_stroke::{
    bevel_join, bevel_join_vertex_count, butt_cap_end, butt_cap_start, cap_vertex_count,
    round_cap_end, round_cap_start, round_join, round_join_vertex_count, LineCap, LineJoin,
};
use crate::path_cache::{CachePath, CachePoint, PathCache, Vertex};

/// Upper bound on the stroke vertices of one path, from its point count,
/// bevel count and the cap division count.
pub fn max_stroke_vertices(path: &CachePath, line_cap: LineCap, line_join: LineJoin, n_cap: usize) -> usize {
    let mut n = if line_join == LineJoin::Round {
        (path.count + path.bevel_count * (n_cap + 2) + 1) * 2
    } else {
        (path.count + path.bevel_count * 5 + 1) * 2
    };
    if !path.closed {
        n += if line_cap == LineCap::Round {
            (n_cap * 2 + 2) * 2
        } else {
            (3 + 3) * 2
        };
    }
    n
}

/// Exact number of vertices [`PathCache::expand_stroke`] emits for a path
/// whose joins have been calculated.
pub fn stroke_vertex_count(
    path: &CachePath,
    pts: &[CachePoint],
    line_cap: LineCap,
    line_join: LineJoin,
    n_cap: usize,
) -> usize {
    if !path.has_geometry() {
        return 0;
    }
    let n = pts.len();
    let join = |j: usize| {
        let p0 = &pts[(j + n - 1) % n];
        let p1 = &pts[j];
        if !p1.is_joined() {
            2
        } else if line_join == LineJoin::Round {
            round_join_vertex_count(p0, p1, n_cap)
        } else {
            bevel_join_vertex_count(p1)
        }
    };
    if path.closed {
        (0..n).map(join).sum::<usize>() + 2
    } else {
        (1..n - 1).map(join).sum::<usize>() + cap_vertex_count(line_cap, n_cap) * 2
    }
}

impl PathCache {
    /// Expand every path into a stroke of half width `w`.
    ///
    /// `fringe_width` is the antialiasing fade added beyond caps; caps and
    /// round joins are divided according to `tess_tol`. Clears the fill
    /// and fringe ranges of every path.
    #[allow(clippy::too_many_arguments)]
    pub fn expand_stroke(
        &mut self,
        w: f32,
        line_cap: LineCap,
        line_join: LineJoin,
        miter_limit: f32,
        fringe_width: f32,
        tess_tol: f32,
    ) {
        let aa = fringe_width;
        // Divisions per half circle.
        let n_cap = curve_divs(w, PI, tess_tol);
        self.calculate_joins(w, line_join, miter_limit);

        let reserve: usize = self
            .paths
            .iter()
            .map(|p| max_stroke_vertices(p, line_cap, line_join, n_cap))
            .sum();
        self.reset_vertices(reserve);

        let points = &self.points;
        let dst = &mut self.vertices;
        for path in &mut self.paths {
            path.fill = 0..0;
            path.fringe = 0..0;
            let start = dst.len();
            let pts = &points[path.point_range()];

            if path.has_geometry() {
                emit_stroke(dst, path, pts, w, line_cap, line_join, aa, n_cap);
            }

            path.stroke = start..dst.len();
            debug_assert_eq!(
                path.stroke.len(),
                stroke_vertex_count(path, pts, line_cap, line_join, n_cap)
            );
        }

        trace!(
            "expanded stroke of {} paths into {} vertices (n_cap {})",
            self.paths.len(),
            self.vertices.len(),
            n_cap
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_stroke(
    dst: &mut Vec<Vertex>,
    path: &CachePath,
    pts: &[CachePoint],
    w: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    aa: f32,
    n_cap: usize,
) {
    let n = pts.len();
    let start = dst.len();

    let (range, mut p0) = if path.closed {
        (0..n, n - 1)
    } else {
        let (p0, p1) = (&pts[0], &pts[1]);
        let mut dx = p1.x - p0.x;
        let mut dy = p1.y - p0.y;
        normalize(&mut dx, &mut dy);
        match line_cap {
            LineCap::Butt => butt_cap_start(dst, p0, dx, dy, w, -aa * 0.5, aa),
            LineCap::Square => butt_cap_start(dst, p0, dx, dy, w, w - aa, aa),
            LineCap::Round => round_cap_start(dst, p0, dx, dy, w, n_cap),
        }
        (1..n - 1, 0)
    };

    for j in range {
        let (a, b) = (&pts[p0], &pts[j]);
        if b.is_joined() {
            if line_join == LineJoin::Round {
                round_join(dst, a, b, w, w, 0.0, 1.0, n_cap);
            } else {
                bevel_join(dst, a, b, w, w, 0.0, 1.0);
            }
        } else {
            dst.push(Vertex::new(b.x + b.dmx * w, b.y + b.dmy * w, 0.0, 1.0));
            dst.push(Vertex::new(b.x - b.dmx * w, b.y - b.dmy * w, 1.0, 1.0));
        }
        p0 = j;
    }

    if path.closed {
        let (v0, v1) = (dst[start], dst[start + 1]);
        dst.push(Vertex::new(v0.x, v0.y, 0.0, 1.0));
        dst.push(Vertex::new(v1.x, v1.y, 1.0, 1.0));
    } else {
        let (p0, p1) = (&pts[n - 2], &pts[n - 1]);
        let mut dx = p1.x - p0.x;
        let mut dy = p1.y - p0.y;
        normalize(&mut dx, &mut dy);
        match line_cap {
            LineCap::Butt => butt_cap_end(dst, p1, dx, dy, w, -aa * 0.5, aa),
            LineCap::Square => butt_cap_end(dst, p1, dx, dy, w, w - aa, aa),
            LineCap::Round => round_cap_end(dst, p1, dx, dy, w, n_cap),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_storage::PathCommand;

    const EPS: f32 = 1e-4;

    fn cache_for(cmds: &[PathCommand]) -> PathCache {
        let mut cache = PathCache::new();
        cache.flatten(cmds, 0.25, 0.01);
        cache
    }

    fn segment() -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
        ]
    }

    fn zigzag(closed: bool) -> Vec<PathCommand> {
        let mut cmds = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 20.0, y: 2.0 },
            PathCommand::LineTo { x: 0.0, y: 4.0 },
            PathCommand::LineTo { x: 3.0, y: 30.0 },
            PathCommand::LineTo { x: 30.0, y: 25.0 },
        ];
        if closed {
            cmds.push(PathCommand::Close);
        }
        cmds
    }

    #[test]
    fn test_square_cap_extension() {
        let mut cache = cache_for(&segment());
        cache.expand_stroke(5.0, LineCap::Square, LineJoin::Miter, 10.0, 1.0, 0.25);
        let path = &cache.paths()[0];
        let v = cache.stroke_vertices(path);
        assert_eq!(v.len(), 8);
        // Solid edge of the start cap: x = -(w - fringe).
        assert!((v[2].x + 4.0).abs() < EPS && (v[3].x + 4.0).abs() < EPS);
        // Solid edge of the end cap: x = 10 + (w - fringe).
        assert!((v[4].x - 14.0).abs() < EPS && (v[5].x - 14.0).abs() < EPS);
        // Fade vertices one fringe further out.
        assert!((v[0].x + 5.0).abs() < EPS && (v[7].x - 15.0).abs() < EPS);
        for vx in v {
            assert!((vx.y.abs() - 5.0).abs() < EPS);
        }
    }

    #[test]
    fn test_butt_cap_overhang() {
        let mut cache = cache_for(&segment());
        cache.expand_stroke(2.0, LineCap::Butt, LineJoin::Miter, 10.0, 1.0, 0.25);
        let v = cache.stroke_vertices(&cache.paths()[0]);
        // The fade straddles each endpoint by half a fringe.
        assert!((v[0].x + 0.5).abs() < EPS && (v[2].x - 0.5).abs() < EPS);
        assert!((v[4].x - 9.5).abs() < EPS && (v[6].x - 10.5).abs() < EPS);
        // End cap fade vertices mirror across the segment.
        assert!((v[6].y + v[7].y).abs() < EPS);
        assert!((v[6].y.abs() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_stroke_clears_fill_ranges() {
        let mut cache = cache_for(&zigzag(true));
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        assert!(!cache.paths()[0].fill.is_empty());
        cache.expand_stroke(1.0, LineCap::Butt, LineJoin::Miter, 10.0, 1.0, 0.25);
        let path = &cache.paths()[0];
        assert!(path.fill.is_empty());
        assert!(path.fringe.is_empty());
        assert!(!path.stroke.is_empty());
    }

    #[test]
    fn test_exact_budget_for_all_styles() {
        let caps = [LineCap::Butt, LineCap::Square, LineCap::Round];
        let joins = [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel];
        for closed in [false, true] {
            for &cap in &caps {
                for &join in &joins {
                    for w in [0.5f32, 3.0, 12.0] {
                        let mut cache = cache_for(&zigzag(closed));
                        cache.expand_stroke(w, cap, join, 4.0, 1.0, 0.25);
                        let n_cap = curve_divs(w, PI, 0.25);
                        let path = cache.paths()[0].clone();
                        let pts = cache.path_points(&path);
                        let exact = stroke_vertex_count(&path, pts, cap, join, n_cap);
                        assert_eq!(path.stroke.len(), exact, "{cap:?} {join:?} w={w} closed={closed}");
                        assert!(exact <= max_stroke_vertices(&path, cap, join, n_cap));
                    }
                }
            }
        }
    }

    #[test]
    fn test_closed_strip_wraps() {
        let mut cache = cache_for(&zigzag(true));
        cache.expand_stroke(2.0, LineCap::Butt, LineJoin::Bevel, 10.0, 1.0, 0.25);
        let v = cache.stroke_vertices(&cache.paths()[0]);
        let n = v.len();
        assert_eq!((v[n - 2].x, v[n - 2].y), (v[0].x, v[0].y));
        assert_eq!((v[n - 1].x, v[n - 1].y), (v[1].x, v[1].y));
    }

    #[test]
    fn test_single_point_path_has_no_stroke() {
        let mut cache = cache_for(&[
            PathCommand::MoveTo { x: 5.0, y: 5.0 },
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
        ]);
        cache.expand_stroke(1.0, LineCap::Round, LineJoin::Round, 10.0, 1.0, 0.25);
        assert!(cache.paths()[0].stroke.is_empty());
        assert!(!cache.paths()[1].stroke.is_empty());
    }

    #[test]
    fn test_miter_strip_offsets() {
        let mut cache = cache_for(&[
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 10.0 },
        ]);
        cache.expand_stroke(1.0, LineCap::Butt, LineJoin::Miter, 10.0, 1.0, 0.25);
        let v = cache.stroke_vertices(&cache.paths()[0]);
        assert_eq!(v.len(), 10);
        // The corner pair sits on the bisector, sqrt(2) * w from the corner.
        for corner in &v[4..6] {
            let d = ((corner.x - 10.0).powi(2) + corner.y.powi(2)).sqrt();
            assert!((d - 2.0f32.sqrt()).abs() < EPS);
        }
    }
}
