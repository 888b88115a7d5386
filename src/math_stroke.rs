//! Stroke math: join and cap vertex emitters.
//!
//! Every emitter appends triangle-strip vertices to a `Vec<Vertex>`. A
//! strip alternates left and right side vertices; `u` runs from `lu` on the
//! left edge to `ru` on the right edge, and pivot points sit at `u = 0.5`.
//!
//! The `*_vertex_count` functions report exactly how many vertices the
//! matching emitter appends, so expanders can size the arena up front.

use crate::basics::PI;
use crate::path_cache::{CachePoint, PointFlags, Vertex};

// ============================================================================
// Enums
// ============================================================================

/// Line cap style for open path endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[inline]
fn push(dst: &mut Vec<Vertex>, x: f32, y: f32, u: f32, v: f32) {
    dst.push(Vertex::new(x, y, u, v));
}

// ============================================================================
// Joins
// ============================================================================

/// The two offset points of a join at distance `w` along `p1`'s side.
///
/// Inner bevels use the segment normals, otherwise both collapse onto the
/// miter point.
fn choose_bevel(bevel: bool, p0: &CachePoint, p1: &CachePoint, w: f32) -> (f32, f32, f32, f32) {
    if bevel {
        (
            p1.x + p0.dy * w,
            p1.y - p0.dx * w,
            p1.x + p1.dy * w,
            p1.y - p1.dx * w,
        )
    } else {
        (
            p1.x + p1.dmx * w,
            p1.y + p1.dmy * w,
            p1.x + p1.dmx * w,
            p1.y + p1.dmy * w,
        )
    }
}

/// Start and end angles of the outer arc of a round join.
fn round_join_angles(p0: &CachePoint, p1: &CachePoint) -> (f32, f32) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);
    if p1.flags.contains(PointFlags::LEFT) {
        let a0 = (-dly0).atan2(-dlx0);
        let mut a1 = (-dly1).atan2(-dlx1);
        if a1 > a0 {
            a1 -= PI * 2.0;
        }
        (a0, a1)
    } else {
        let a0 = dly0.atan2(dlx0);
        let mut a1 = dly1.atan2(dlx1);
        if a1 < a0 {
            a1 += PI * 2.0;
        }
        (a0, a1)
    }
}

/// Number of fan steps for a round join, in `[2, n_cap]`.
pub fn round_join_divs(p0: &CachePoint, p1: &CachePoint, n_cap: usize) -> usize {
    let (a0, a1) = round_join_angles(p0, p1);
    let n = ((a1 - a0).abs() / PI * n_cap as f32).ceil() as usize;
    n.clamp(2, n_cap.max(2))
}

pub fn round_join_vertex_count(p0: &CachePoint, p1: &CachePoint, n_cap: usize) -> usize {
    4 + 2 * round_join_divs(p0, p1, n_cap)
}

pub fn bevel_join_vertex_count(p1: &CachePoint) -> usize {
    if p1.flags.contains(PointFlags::BEVEL) {
        8
    } else {
        10
    }
}

/// Round join at `p1`: a fan around the pivot on the outer side.
#[allow(clippy::too_many_arguments)]
pub fn round_join(
    dst: &mut Vec<Vertex>,
    p0: &CachePoint,
    p1: &CachePoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
    n_cap: usize,
) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);
    let inner_bevel = p1.flags.contains(PointFlags::INNER_BEVEL);
    let (a0, a1) = round_join_angles(p0, p1);
    let n = round_join_divs(p0, p1, n_cap);

    if p1.flags.contains(PointFlags::LEFT) {
        let (lx0, ly0, lx1, ly1) = choose_bevel(inner_bevel, p0, p1, lw);

        push(dst, lx0, ly0, lu, 1.0);
        push(dst, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let (s, c) = (a0 + u * (a1 - a0)).sin_cos();
            push(dst, p1.x, p1.y, 0.5, 1.0);
            push(dst, p1.x + c * rw, p1.y + s * rw, ru, 1.0);
        }

        push(dst, lx1, ly1, lu, 1.0);
        push(dst, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
    } else {
        let (rx0, ry0, rx1, ry1) = choose_bevel(inner_bevel, p0, p1, -rw);

        push(dst, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
        push(dst, rx0, ry0, ru, 1.0);

        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let (s, c) = (a0 + u * (a1 - a0)).sin_cos();
            push(dst, p1.x + c * lw, p1.y + s * lw, lu, 1.0);
            push(dst, p1.x, p1.y, 0.5, 1.0);
        }

        push(dst, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
        push(dst, rx1, ry1, ru, 1.0);
    }
}

/// Bevel join at `p1`.
///
/// Outer bevels cut the corner with a straight edge; points flagged only
/// `INNER_BEVEL` keep the miter on the outer side and route the inner side
/// through the pivot.
#[allow(clippy::too_many_arguments)]
pub fn bevel_join(
    dst: &mut Vec<Vertex>,
    p0: &CachePoint,
    p1: &CachePoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);
    let inner_bevel = p1.flags.contains(PointFlags::INNER_BEVEL);
    let bevel = p1.flags.contains(PointFlags::BEVEL);

    if p1.flags.contains(PointFlags::LEFT) {
        let (lx0, ly0, lx1, ly1) = choose_bevel(inner_bevel, p0, p1, lw);

        push(dst, lx0, ly0, lu, 1.0);
        push(dst, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

        if bevel {
            push(dst, lx0, ly0, lu, 1.0);
            push(dst, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

            push(dst, lx1, ly1, lu, 1.0);
            push(dst, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
        } else {
            let rx0 = p1.x - p1.dmx * rw;
            let ry0 = p1.y - p1.dmy * rw;

            push(dst, p1.x, p1.y, 0.5, 1.0);
            push(dst, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

            push(dst, rx0, ry0, ru, 1.0);
            push(dst, rx0, ry0, ru, 1.0);

            push(dst, p1.x, p1.y, 0.5, 1.0);
            push(dst, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
        }

        push(dst, lx1, ly1, lu, 1.0);
        push(dst, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
    } else {
        let (rx0, ry0, rx1, ry1) = choose_bevel(inner_bevel, p0, p1, -rw);

        push(dst, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
        push(dst, rx0, ry0, ru, 1.0);

        if bevel {
            push(dst, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
            push(dst, rx0, ry0, ru, 1.0);

            push(dst, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
            push(dst, rx1, ry1, ru, 1.0);
        } else {
            let lx0 = p1.x + p1.dmx * lw;
            let ly0 = p1.y + p1.dmy * lw;

            push(dst, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
            push(dst, p1.x, p1.y, 0.5, 1.0);

            push(dst, lx0, ly0, lu, 1.0);
            push(dst, lx0, ly0, lu, 1.0);

            push(dst, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
            push(dst, p1.x, p1.y, 0.5, 1.0);
        }

        push(dst, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
        push(dst, rx1, ry1, ru, 1.0);
    }
}

// ============================================================================
// Caps
// ============================================================================

/// Vertices appended by the start or end cap of an open path.
pub fn cap_vertex_count(cap: LineCap, n_cap: usize) -> usize {
    match cap {
        LineCap::Butt | LineCap::Square => 4,
        LineCap::Round => n_cap * 2 + 2,
    }
}

/// Flat start cap pushed back by `d` along `-(dx, dy)`, with an `aa` wide
/// fade beyond it.
#[allow(clippy::too_many_arguments)]
pub fn butt_cap_start(
    dst: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    d: f32,
    aa: f32,
) {
    let px = p.x - dx * d;
    let py = p.y - dy * d;
    let (dlx, dly) = (dy, -dx);
    push(dst, px + dlx * w - dx * aa, py + dly * w - dy * aa, 0.0, 0.0);
    push(dst, px - dlx * w - dx * aa, py - dly * w - dy * aa, 1.0, 0.0);
    push(dst, px + dlx * w, py + dly * w, 0.0, 1.0);
    push(dst, px - dlx * w, py - dly * w, 1.0, 1.0);
}

/// Flat end cap pushed out by `d` along `(dx, dy)`.
#[allow(clippy::too_many_arguments)]
pub fn butt_cap_end(
    dst: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    d: f32,
    aa: f32,
) {
    let px = p.x + dx * d;
    let py = p.y + dy * d;
    let (dlx, dly) = (dy, -dx);
    push(dst, px + dlx * w, py + dly * w, 0.0, 1.0);
    push(dst, px - dlx * w, py - dly * w, 1.0, 1.0);
    push(dst, px + dlx * w + dx * aa, py + dly * w + dy * aa, 0.0, 0.0);
    push(dst, px - dlx * w + dx * aa, py - dly * w + dy * aa, 1.0, 0.0);
}

/// Semicircular start cap with `n_cap` fan steps.
pub fn round_cap_start(dst: &mut Vec<Vertex>, p: &CachePoint, dx: f32, dy: f32, w: f32, n_cap: usize) {
    let (px, py) = (p.x, p.y);
    let (dlx, dly) = (dy, -dx);
    for i in 0..n_cap {
        let a = i as f32 / (n_cap - 1) as f32 * PI;
        let (s, c) = a.sin_cos();
        let ax = c * w;
        let ay = s * w;
        push(dst, px - dlx * ax - dx * ay, py - dly * ax - dy * ay, 0.0, 1.0);
        push(dst, px, py, 0.5, 1.0);
    }
    push(dst, px + dlx * w, py + dly * w, 0.0, 1.0);
    push(dst, px - dlx * w, py - dly * w, 1.0, 1.0);
}

/// Semicircular end cap with `n_cap` fan steps.
pub fn round_cap_end(dst: &mut Vec<Vertex>, p: &CachePoint, dx: f32, dy: f32, w: f32, n_cap: usize) {
    let (px, py) = (p.x, p.y);
    let (dlx, dly) = (dy, -dx);
    push(dst, px + dlx * w, py + dly * w, 0.0, 1.0);
    push(dst, px - dlx * w, py - dly * w, 1.0, 1.0);
    for i in 0..n_cap {
        let a = i as f32 / (n_cap - 1) as f32 * PI;
        let (s, c) = a.sin_cos();
        let ax = c * w;
        let ay = s * w;
        push(dst, px, py, 0.5, 1.0);
        push(dst, px - dlx * ax + dx * ay, py - dly * ax + dy * ay, 0.0, 1.0);
    }
}

// ============================================================================
// Tests
// ============================================================================
