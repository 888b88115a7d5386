//! Fill expansion.
//!
//! Each sub-path yields a core polygon (a triangle fan inset by half a
//! fringe when antialiasing) and, with antialiasing, a fringe ring strip
//! whose `u` fades across the edge. A single convex path only needs the
//! outer half of the ring: its inner edge coincides with the inset core and
//! fades from `u = 0.5`, so it renders without stenciling.

use log::trace;

use crate::math_stroke::{bevel_join, bevel_join_vertex_count, LineJoin};
use crate::path_cache::{CachePath, CachePoint, PathCache, PointFlags, Vertex};

/// Upper bound on the core and fringe vertices of one path.
pub fn max_fill_vertices(path: &CachePath, fringe: bool) -> usize {
    let mut n = path.count + path.bevel_count + 1;
    if fringe {
        n += (path.count + path.bevel_count * 5 + 1) * 2;
    }
    n
}

/// Exact number of core fill vertices [`PathCache::expand_fill`] emits.
pub fn fill_vertex_count(path: &CachePath, pts: &[CachePoint], fringe: bool) -> usize {
    if !path.has_geometry() {
        0
    } else if !fringe {
        pts.len()
    } else {
        pts.iter()
            .map(|p| {
                if p.flags.contains(PointFlags::BEVEL) && !p.flags.contains(PointFlags::LEFT) {
                    2
                } else {
                    1
                }
            })
            .sum()
    }
}

/// Exact number of fringe ring vertices [`PathCache::expand_fill`] emits.
pub fn fringe_vertex_count(path: &CachePath, pts: &[CachePoint], fringe: bool) -> usize {
    if !path.has_geometry() || !fringe {
        return 0;
    }
    pts.iter()
        .map(|p| if p.is_joined() { bevel_join_vertex_count(p) } else { 2 })
        .sum::<usize>()
        + 2
}

impl PathCache {
    /// Expand every path into fill geometry.
    ///
    /// `w` is the fringe width to generate, zero disables the fringe ring.
    /// `fringe_width` sets the core inset. Clears the stroke range of every
    /// path.
    pub fn expand_fill(&mut self, w: f32, line_join: LineJoin, miter_limit: f32, fringe_width: f32) {
        let aa = fringe_width;
        let fringe = w > 0.0;

        self.calculate_joins(w, line_join, miter_limit);

        let reserve: usize = self.paths.iter().map(|p| max_fill_vertices(p, fringe)).sum();
        self.reset_vertices(reserve);

        let convex = self.paths.len() == 1 && self.paths[0].convex;
        let w_off = 0.5 * aa;

        let points = &self.points;
        let dst = &mut self.vertices;
        for path in &mut self.paths {
            path.stroke = 0..0;
            let pts = &points[path.point_range()];
            let has_geometry = path.has_geometry();

            let start = dst.len();
            if has_geometry {
                if fringe {
                    emit_inset_core(dst, pts, w_off);
                } else {
                    dst.extend(pts.iter().map(|p| Vertex::new(p.x, p.y, 0.5, 1.0)));
                }
            }
            path.fill = start..dst.len();
            debug_assert_eq!(path.fill.len(), fill_vertex_count(path, pts, fringe));

            let start = dst.len();
            if has_geometry && fringe {
                let (lw, lu) = if convex { (w_off, 0.5) } else { (w + w_off, 0.0) };
                emit_fringe_ring(dst, pts, lw, w - w_off, lu, 1.0);
            }
            path.fringe = start..dst.len();
            debug_assert_eq!(path.fringe.len(), fringe_vertex_count(path, pts, fringe));
        }

        trace!(
            "expanded fill of {} paths into {} vertices (convex {}, fringe {})",
            self.paths.len(),
            self.vertices.len(),
            convex,
            fringe
        );
    }
}

/// Core polygon pulled in by `w_off` along the miter; outer bevels split
/// the corner into two points.
fn emit_inset_core(dst: &mut Vec<Vertex>, pts: &[CachePoint], w_off: f32) {
    let n = pts.len();
    for j in 0..n {
        let p0 = &pts[(j + n - 1) % n];
        let p1 = &pts[j];
        if p1.flags.contains(PointFlags::BEVEL) && !p1.flags.contains(PointFlags::LEFT) {
            let (dlx0, dly0) = (p0.dy, -p0.dx);
            let (dlx1, dly1) = (p1.dy, -p1.dx);
            dst.push(Vertex::new(p1.x + dlx0 * w_off, p1.y + dly0 * w_off, 0.5, 1.0));
            dst.push(Vertex::new(p1.x + dlx1 * w_off, p1.y + dly1 * w_off, 0.5, 1.0));
        } else {
            dst.push(Vertex::new(p1.x + p1.dmx * w_off, p1.y + p1.dmy * w_off, 0.5, 1.0));
        }
    }
}

/// Closed strip from `lw` inside to `rw` outside the outline.
fn emit_fringe_ring(dst: &mut Vec<Vertex>, pts: &[CachePoint], lw: f32, rw: f32, lu: f32, ru: f32) {
    let n = pts.len();
    let start = dst.len();
    for j in 0..n {
        let p0 = &pts[(j + n - 1) % n];
        let p1 = &pts[j];
        if p1.is_joined() {
            bevel_join(dst, p0, p1, lw, rw, lu, ru);
        } else {
            dst.push(Vertex::new(p1.x + p1.dmx * lw, p1.y + p1.dmy * lw, lu, 1.0));
            dst.push(Vertex::new(p1.x - p1.dmx * rw, p1.y - p1.dmy * rw, ru, 1.0));
        }
    }
    // Loop it
    let (v0, v1) = (dst[start], dst[start + 1]);
    dst.push(Vertex::new(v0.x, v0.y, lu, 1.0));
    dst.push(Vertex::new(v1.x, v1.y, ru, 1.0));
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

    fn polygon(pts: &[(f32, f32)]) -> Vec<PathCommand> {
        let mut cmds = vec![PathCommand::MoveTo {
            x: pts[0].0,
            y: pts[0].1,
        }];
        cmds.extend(pts[1..].iter().map(|&(x, y)| PathCommand::LineTo { x, y }));
        cmds.push(PathCommand::Close);
        cmds
    }

    fn square() -> Vec<PathCommand> {
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn star() -> Vec<PathCommand> {
        let pts: Vec<_> = (0..10)
            .map(|i| {
                let a = i as f32 * std::f32::consts::PI / 5.0;
                let r = if i % 2 == 0 { 50.0 } else { 20.0 };
                (100.0 + r * a.cos(), 100.0 + r * a.sin())
            })
            .collect();
        polygon(&pts)
    }

    #[test]
    fn test_square_without_fringe() {
        let mut cache = cache_for(&square());
        cache.expand_fill(0.0, LineJoin::Miter, 2.4, 1.0);
        let path = &cache.paths()[0];
        let fill = cache.fill_vertices(path);
        assert_eq!(fill.len(), 4);
        assert!(fill.iter().all(|v| v.u == 0.5 && v.v == 1.0));
        let mut xs: Vec<_> = fill.iter().map(|v| (v.x, v.y)).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![(0.0, 0.0), (0.0, 10.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(path.fringe.is_empty());
    }

    #[test]
    fn test_convex_square_with_fringe() {
        let mut cache = cache_for(&square());
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        let path = &cache.paths()[0];
        assert!(path.convex);
        let fill = cache.fill_vertices(path);
        assert_eq!(fill.len(), 4);
        // Core is inset by half a fringe.
        for v in fill {
            assert!((v.x - 0.5).abs() < EPS || (v.x - 9.5).abs() < EPS);
            assert!((v.y - 0.5).abs() < EPS || (v.y - 9.5).abs() < EPS);
        }
        let ring = cache.fringe_vertices(path);
        assert_eq!(ring.len(), 4 * 2 + 2);
        // Half fringe: inner edge on the core at u = 0.5, outer edge half a
        // fringe outside the outline.
        for pair in ring.chunks(2) {
            assert_eq!(pair[0].u, 0.5);
            assert_eq!(pair[1].u, 1.0);
            assert!((pair[0].x - 0.5).abs() < EPS || (pair[0].x - 9.5).abs() < EPS);
            assert!((pair[1].x + 0.5).abs() < EPS || (pair[1].x - 10.5).abs() < EPS);
        }
    }

    #[test]
    fn test_two_paths_get_full_fringe() {
        let mut cmds = square();
        cmds.extend(polygon(&[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0), (20.0, 10.0)]));
        let mut cache = cache_for(&cmds);
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        for path in cache.paths() {
            let ring = cache.fringe_vertices(path);
            assert!(ring.chunks(2).all(|pair| pair[0].u == 0.0 && pair[1].u == 1.0));
        }
    }

    #[test]
    fn test_fill_clears_stroke_range() {
        let mut cache = cache_for(&square());
        cache.expand_stroke(1.0, crate::math_stroke::LineCap::Butt, LineJoin::Miter, 10.0, 1.0, 0.25);
        assert!(!cache.paths()[0].stroke.is_empty());
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        assert!(cache.paths()[0].stroke.is_empty());
    }

    #[test]
    fn test_star_is_concave_and_budget_exact() {
        for fringe_w in [0.0f32, 1.0] {
            let mut cache = cache_for(&star());
            cache.expand_fill(fringe_w, LineJoin::Miter, 2.4, 1.0);
            let path = cache.paths()[0].clone();
            assert!(!path.convex);
            let pts = cache.path_points(&path);
            let fringe = fringe_w > 0.0;
            assert_eq!(path.fill.len(), fill_vertex_count(&path, pts, fringe));
            assert_eq!(path.fringe.len(), fringe_vertex_count(&path, pts, fringe));
            assert!(path.fill.len() + path.fringe.len() <= max_fill_vertices(&path, fringe));
        }
    }

    #[test]
    fn test_sharp_corners_split_core() {
        // A thin spike beveled by the 2.4 miter limit.
        let mut cache = cache_for(&polygon(&[(0.0, 0.0), (100.0, 3.0), (0.0, 6.0)]));
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        let path = cache.paths()[0].clone();
        let pts = cache.path_points(&path);
        assert!(pts.iter().any(|p| p.flags.contains(PointFlags::BEVEL)));
        assert_eq!(path.fill.len(), fill_vertex_count(&path, pts, true));
        assert_eq!(path.fringe.len(), fringe_vertex_count(&path, pts, true));
    }
}
