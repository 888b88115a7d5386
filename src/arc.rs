//! Circular arc construction.
//!
//! Converts circle arcs into at most five cubic Bezier segments (one per
//! quarter turn, rounded) and resolves the tangent circle used by `arc_to`.
//! Degenerate corners never fail: [`safe_arc_to`] falls back to a straight
//! line instead.

use crate::basics::{Direction, PI};
use crate::math::{cross, dist_pt_seg, normalize, pt_equals};
use crate::path_storage::PathCommand;

/// Tangent distance above which an `arc_to` corner is treated as straight.
const ARC_TO_MAX_TANGENT: f32 = 10000.0;

/// Build the commands for an arc centred at (cx, cy).
///
/// The first command is a `LineTo` to the arc start when `connect` is true
/// (there is already a current point), otherwise a `MoveTo`. The sweep is
/// clamped to one full turn in the requested direction.
#[allow(clippy::too_many_arguments)]
pub fn arc_commands(
    cx: f32,
    cy: f32,
    r: f32,
    a0: f32,
    a1: f32,
    dir: Direction,
    connect: bool,
) -> Vec<PathCommand> {
    let mut da = a1 - a0;
    match dir {
        Direction::Clockwise => {
            if da.abs() >= PI * 2.0 {
                da = PI * 2.0;
            } else {
                while da < 0.0 {
                    da += PI * 2.0;
                }
            }
        }
        Direction::CounterClockwise => {
            if da.abs() >= PI * 2.0 {
                da = -PI * 2.0;
            } else {
                while da > 0.0 {
                    da -= PI * 2.0;
                }
            }
        }
    }

    // Split arc into max 90 degree segments.
    let n_divs = ((da.abs() / (PI * 0.5) + 0.5) as i32).clamp(1, 5);
    let hda = da / n_divs as f32 / 2.0;
    let (sin, cos) = hda.sin_cos();
    let mut kappa = (4.0 / 3.0 * (1.0 - cos) / sin).abs();
    if dir == Direction::CounterClockwise {
        kappa = -kappa;
    }

    let mut cmds = Vec::with_capacity(n_divs as usize + 1);
    let (mut px, mut py, mut ptanx, mut ptany) = (0.0, 0.0, 0.0, 0.0);
    for i in 0..=n_divs {
        let a = a0 + da * (i as f32 / n_divs as f32);
        let (dy, dx) = a.sin_cos();
        let x = cx + dx * r;
        let y = cy + dy * r;
        let tanx = -dy * r * kappa;
        let tany = dx * r * kappa;
        if i == 0 {
            cmds.push(if connect {
                PathCommand::LineTo { x, y }
            } else {
                PathCommand::MoveTo { x, y }
            });
        } else {
            cmds.push(PathCommand::BezierTo {
                c1x: px + ptanx,
                c1y: py + ptany,
                c2x: x - tanx,
                c2y: y - tany,
                x,
                y,
            });
        }
        px = x;
        py = y;
        ptanx = tanx;
        ptany = tany;
    }
    cmds
}

/// Resolution of an `arc_to` corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcTo {
    /// The corner is degenerate; draw a straight line to the corner point.
    Line { x: f32, y: f32 },
    /// Arc on the circle tangent to both corner edges.
    Arc {
        cx: f32,
        cy: f32,
        r: f32,
        a0: f32,
        a1: f32,
        dir: Direction,
    },
}

/// Find the circle of `radius` tangent to (x0,y0)-(x1,y1) and
/// (x1,y1)-(x2,y2).
///
/// Coincident points, a corner collinear within `dist_tol`, a radius below
/// `dist_tol` or a near-straight corner all resolve to [`ArcTo::Line`].
#[allow(clippy::too_many_arguments)]
pub fn safe_arc_to(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    radius: f32,
    dist_tol: f32,
) -> ArcTo {
    if pt_equals(x0, y0, x1, y1, dist_tol)
        || pt_equals(x1, y1, x2, y2, dist_tol)
        || dist_pt_seg(x1, y1, x0, y0, x2, y2) < dist_tol * dist_tol
        || radius < dist_tol
    {
        return ArcTo::Line { x: x1, y: y1 };
    }

    let (mut dx0, mut dy0) = (x0 - x1, y0 - y1);
    let (mut dx1, mut dy1) = (x2 - x1, y2 - y1);
    normalize(&mut dx0, &mut dy0);
    normalize(&mut dx1, &mut dy1);
    let a = (dx0 * dx1 + dy0 * dy1).clamp(-1.0, 1.0).acos();
    let d = radius / (a / 2.0).tan();

    if !d.is_finite() || d > ARC_TO_MAX_TANGENT {
        return ArcTo::Line { x: x1, y: y1 };
    }

    if cross(dx0, dy0, dx1, dy1) > 0.0 {
        ArcTo::Arc {
            cx: x1 + dx0 * d + dy0 * radius,
            cy: y1 + dy0 * d + -dx0 * radius,
            r: radius,
            a0: dx0.atan2(-dy0),
            a1: (-dx1).atan2(dy1),
            dir: Direction::Clockwise,
        }
    } else {
        ArcTo::Arc {
            cx: x1 + dx0 * d + -dy0 * radius,
            cy: y1 + dy0 * d + dx0 * radius,
            r: radius,
            a0: (-dx0).atan2(dy0),
            a1: dx1.atan2(-dy1),
            dir: Direction::CounterClockwise,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
