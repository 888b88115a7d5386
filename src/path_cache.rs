//! Flattened path cache.
//!
//! Walks a command stream once and turns it into flat polygons: one
//! [`CachePath`] per sub-path, each a run of [`CachePoint`]s in a shared
//! point array. After flattening every point knows the direction and length
//! of the segment to its successor, winding is enforced by reversing point
//! order, and the overall bounds are known.
//!
//! [`PathCache::calculate_joins`] then classifies each corner for a given
//! stroke width (miter, bevel or inner bevel, left or right turn), which is
//! what the fill and stroke expanders consume. Expanded geometry lands in a
//! single vertex arena, with each path holding named ranges into it.

use std::ops::Range;

use bitflags::bitflags;
use log::trace;

use crate::basics::{RectF, Winding};
use crate::curves::Curve4;
use crate::math::{normalize, pt_equals, tri_area2};
use crate::math_stroke::LineJoin;
use crate::path_storage::PathCommand;
use crate::renderer::DrawPath;

/// Largest scale applied to the miter displacement at sharp corners.
const MITER_SCALE_LIMIT: f32 = 600.0;

bitflags! {
    /// Per-point corner classification.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointFlags: u8 {
        /// The point is a user-authored corner, not a curve-interior point.
        const CORNER      = 0x01;
        /// The path turns left at this point.
        const LEFT        = 0x02;
        /// The outer side of the corner is beveled.
        const BEVEL       = 0x04;
        /// The inner side of the corner is beveled.
        const INNER_BEVEL = 0x08;
    }
}

// ============================================================================
// Vertex
// ============================================================================

/// Output vertex. `u` carries the antialiasing fade across the edge.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    #[inline]
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

// ============================================================================
// CachePoint / CachePath
// ============================================================================

/// A flattened polygon point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CachePoint {
    pub x: f32,
    pub y: f32,
    /// Unit direction to the next point.
    pub dx: f32,
    pub dy: f32,
    /// Length of the segment to the next point.
    pub len: f32,
    /// Miter displacement, scaled so that `p + dm * w` is the offset corner.
    pub dmx: f32,
    pub dmy: f32,
    pub flags: PointFlags,
}

impl CachePoint {
    pub fn new(x: f32, y: f32, flags: PointFlags) -> Self {
        Self {
            x,
            y,
            flags,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_joined(&self) -> bool {
        self.flags.intersects(PointFlags::BEVEL | PointFlags::INNER_BEVEL)
    }
}

/// One flattened sub-path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachePath {
    /// Index of the first point in the cache's point array.
    pub first: usize,
    pub count: usize,
    pub closed: bool,
    /// Number of points flagged `BEVEL` or `INNER_BEVEL`.
    pub bevel_count: usize,
    pub winding: Winding,
    pub convex: bool,
    /// Core fill polygon, fan-triangulatable.
    pub fill: Range<usize>,
    /// Antialiasing ring around the fill, as a triangle strip.
    pub fringe: Range<usize>,
    /// Stroke outline, as a triangle strip.
    pub stroke: Range<usize>,
}

impl CachePath {
    fn new(first: usize) -> Self {
        Self {
            first,
            ..Default::default()
        }
    }

    /// Paths with fewer than two points produce no geometry.
    #[inline]
    pub fn has_geometry(&self) -> bool {
        self.count >= 2
    }

    #[inline]
    pub fn point_range(&self) -> Range<usize> {
        self.first..self.first + self.count
    }
}

// ============================================================================
// Polygon helpers
// ============================================================================

/// Signed area of a polygon; positive for counter-clockwise order in y-down
/// screen space.
pub fn poly_area(points: &[CachePoint]) -> f32 {
    let Some(a) = points.first() else {
        return 0.0;
    };
    let mut area = 0.0;
    for i in 2..points.len() {
        let b = &points[i - 1];
        let c = &points[i];
        area += tri_area2(a.x, a.y, b.x, b.y, c.x, c.y);
    }
    area * 0.5
}

// ============================================================================
// PathCache
// ============================================================================

/// Flattened points, sub-paths and the expanded vertex arena.
#[derive(Debug, Clone)]
pub struct PathCache {
    pub(crate) points: Vec<CachePoint>,
    pub(crate) paths: Vec<CachePath>,
    pub(crate) vertices: Vec<Vertex>,
    bounds: RectF,
    flattened: bool,
}

impl PathCache {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            paths: Vec::new(),
            vertices: Vec::new(),
            bounds: RectF::empty_bounds(),
            flattened: false,
        }
    }

    /// Drop all points, paths and vertices, keeping the allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.paths.clear();
        self.vertices.clear();
        self.bounds = RectF::empty_bounds();
        self.flattened = false;
    }

    /// Mark the flattening stale so the next [`flatten`](Self::flatten)
    /// rebuilds it.
    pub fn invalidate(&mut self) {
        self.flattened = false;
    }

    pub fn is_flattened(&self) -> bool {
        self.flattened
    }

    pub fn paths(&self) -> &[CachePath] {
        &self.paths
    }

    pub fn points(&self) -> &[CachePoint] {
        &self.points
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Bounds of all flattened points.
    pub fn bounds(&self) -> RectF {
        self.bounds
    }

    pub fn path_points(&self, path: &CachePath) -> &[CachePoint] {
        &self.points[path.point_range()]
    }

    pub fn fill_vertices(&self, path: &CachePath) -> &[Vertex] {
        &self.vertices[path.fill.clone()]
    }

    pub fn fringe_vertices(&self, path: &CachePath) -> &[Vertex] {
        &self.vertices[path.fringe.clone()]
    }

    pub fn stroke_vertices(&self, path: &CachePath) -> &[Vertex] {
        &self.vertices[path.stroke.clone()]
    }

    /// Borrowed per-path views handed to a renderer.
    pub fn draw_paths(&self) -> Vec<DrawPath<'_>> {
        self.paths
            .iter()
            .map(|path| DrawPath {
                fill: self.fill_vertices(path),
                fringe: self.fringe_vertices(path),
                stroke: self.stroke_vertices(path),
                convex: path.convex,
                closed: path.closed,
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Building
    // ---------------------------------------------------------------

    /// Start a new sub-path at the end of the point array.
    pub fn add_path(&mut self) {
        self.paths.push(CachePath::new(self.points.len()));
    }

    /// Append a point to the current sub-path.
    ///
    /// A point within `dist_tol` of the previous one is merged into it by
    /// OR-ing the flags. Without a current sub-path the point is dropped.
    pub fn add_point(&mut self, x: f32, y: f32, flags: PointFlags, dist_tol: f32) {
        let Some(path) = self.paths.last_mut() else {
            return;
        };
        if path.count > 0 {
            if let Some(last) = self.points.last_mut() {
                if pt_equals(last.x, last.y, x, y, dist_tol) {
                    last.flags |= flags;
                    return;
                }
            }
        }
        self.points.push(CachePoint::new(x, y, flags));
        path.count += 1;
    }

    pub fn close_path(&mut self) {
        if let Some(path) = self.paths.last_mut() {
            path.closed = true;
        }
    }

    pub fn path_winding(&mut self, winding: Winding) {
        if let Some(path) = self.paths.last_mut() {
            path.winding = winding;
        }
    }

    /// Flatten a cubic starting at the current sub-path's last point.
    #[allow(clippy::too_many_arguments)]
    pub fn tesselate_bezier(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
        tess_tol: f32,
        dist_tol: f32,
    ) {
        let Some(path) = self.paths.last() else {
            return;
        };
        if path.count == 0 {
            return;
        }
        let Some(last) = self.points.last() else {
            return;
        };
        let curve = Curve4::new(last.x, last.y, c1x, c1y, c2x, c2y, x, y);
        curve.flatten(tess_tol, &mut |px, py, corner| {
            let flags = if corner {
                PointFlags::CORNER
            } else {
                PointFlags::empty()
            };
            self.add_point(px, py, flags, dist_tol);
        });
    }

    /// Build the point cache from device-space commands.
    ///
    /// Does nothing if the cache already holds a valid flattening.
    pub fn flatten(&mut self, commands: &[PathCommand], tess_tol: f32, dist_tol: f32) {
        if self.flattened {
            return;
        }
        self.clear();

        for cmd in commands {
            match *cmd {
                PathCommand::MoveTo { x, y } => {
                    self.add_path();
                    self.add_point(x, y, PointFlags::CORNER, dist_tol);
                }
                PathCommand::LineTo { x, y } => {
                    self.add_point(x, y, PointFlags::CORNER, dist_tol);
                }
                PathCommand::BezierTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => self.tesselate_bezier(c1x, c1y, c2x, c2y, x, y, tess_tol, dist_tol),
                PathCommand::Close => self.close_path(),
                PathCommand::Winding(w) => self.path_winding(w),
            }
        }

        let mut bounds = RectF::empty_bounds();
        for path in &mut self.paths {
            // A closing point equal to the first one is implied.
            if path.count > 2 {
                let p0 = self.points[path.first + path.count - 1];
                let p1 = self.points[path.first];
                if pt_equals(p0.x, p0.y, p1.x, p1.y, dist_tol) {
                    path.count -= 1;
                    path.closed = true;
                }
            }

            let pts = &mut self.points[path.first..path.first + path.count];

            if pts.len() > 2 {
                let area = poly_area(pts);
                let reverse = match path.winding {
                    Winding::Solid => area < 0.0,
                    Winding::Hole => area > 0.0,
                };
                if reverse {
                    pts.reverse();
                }
            }

            let n = pts.len();
            for i in 0..n {
                let next = pts[(i + 1) % n];
                let p = &mut pts[i];
                let mut dx = next.x - p.x;
                let mut dy = next.y - p.y;
                p.len = normalize(&mut dx, &mut dy);
                p.dx = dx;
                p.dy = dy;
                bounds.add_point(p.x, p.y);
            }
        }
        self.bounds = bounds;
        self.flattened = true;

        trace!(
            "flattened {} commands into {} paths ({} points)",
            commands.len(),
            self.paths.len(),
            self.points.len()
        );
    }

    // ---------------------------------------------------------------
    // Join classification
    // ---------------------------------------------------------------

    /// Compute miter displacements and corner flags for stroke width `w`.
    ///
    /// Flags other than `CORNER` are recomputed from scratch, so this must
    /// run again whenever the width, join style or miter limit changes.
    pub fn calculate_joins(&mut self, w: f32, line_join: LineJoin, miter_limit: f32) {
        let iw = if w > 0.0 { 1.0 / w } else { 0.0 };

        for path in &mut self.paths {
            let pts = &mut self.points[path.first..path.first + path.count];
            let n = pts.len();
            let mut n_left = 0;
            path.bevel_count = 0;

            for j in 0..n {
                let p0 = pts[(j + n - 1) % n];
                let p1 = &mut pts[j];
                let dlx0 = p0.dy;
                let dly0 = -p0.dx;
                let dlx1 = p1.dy;
                let dly1 = -p1.dx;

                // Calculate extrusions
                p1.dmx = (dlx0 + dlx1) * 0.5;
                p1.dmy = (dly0 + dly1) * 0.5;
                let dmr2 = p1.dmx * p1.dmx + p1.dmy * p1.dmy;
                if dmr2 > 0.000001 {
                    let scale = (1.0 / dmr2).min(MITER_SCALE_LIMIT);
                    p1.dmx *= scale;
                    p1.dmy *= scale;
                }

                p1.flags &= PointFlags::CORNER;

                let cross = p1.dx * p0.dy - p0.dx * p1.dy;
                if cross > 0.0 {
                    n_left += 1;
                    p1.flags |= PointFlags::LEFT;
                }

                // Short segments relative to the width cannot hold a full
                // inner miter.
                let limit = (p0.len.min(p1.len) * iw).max(1.0);
                if dmr2 * limit * limit < 1.0 {
                    p1.flags |= PointFlags::INNER_BEVEL;
                }

                if p1.flags.contains(PointFlags::CORNER)
                    && (dmr2 * miter_limit * miter_limit < 1.0
                        || line_join == LineJoin::Bevel
                        || line_join == LineJoin::Round)
                {
                    p1.flags |= PointFlags::BEVEL;
                }

                if p1.is_joined() {
                    path.bevel_count += 1;
                }
            }

            path.convex = n_left == n;
        }
    }

    /// Empty the vertex arena and make room for `n` vertices.
    pub(crate) fn reset_vertices(&mut self, n: usize) {
        self.vertices.clear();
        self.vertices.reserve(n);
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
