//! Path command storage.
//!
//! Stores the command stream of the path being built. Point arguments are
//! transformed by the storage's current transform at append time, so
//! changing the transform afterwards never moves commands already stored.
//! The last *untransformed* end point is remembered for `quad_to` and
//! `arc_to`, which continue from it.

use crate::arc::{arc_commands, safe_arc_to, ArcTo};
use crate::basics::{Direction, Winding, KAPPA90};
use crate::trans_affine::TransAffine;

// ============================================================================
// Raw command tags
// ============================================================================

pub const CMD_MOVE_TO: f32 = 0.0;
pub const CMD_LINE_TO: f32 = 1.0;
pub const CMD_BEZIER_TO: f32 = 2.0;
pub const CMD_CLOSE: f32 = 3.0;
pub const CMD_WINDING: f32 = 4.0;

// ============================================================================
// PathCommand
// ============================================================================

/// One path building command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    BezierTo {
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    },
    Close,
    Winding(Winding),
}

impl PathCommand {
    /// Numeric tag of the command in a raw float stream.
    pub fn tag(&self) -> f32 {
        match self {
            PathCommand::MoveTo { .. } => CMD_MOVE_TO,
            PathCommand::LineTo { .. } => CMD_LINE_TO,
            PathCommand::BezierTo { .. } => CMD_BEZIER_TO,
            PathCommand::Close => CMD_CLOSE,
            PathCommand::Winding(_) => CMD_WINDING,
        }
    }

    /// End point of a drawing command, `None` for `Close` and `Winding`.
    pub fn end_point(&self) -> Option<(f32, f32)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::BezierTo { x, y, .. } => Some((x, y)),
            PathCommand::Close | PathCommand::Winding(_) => None,
        }
    }

    /// The command with every point argument mapped through `m`.
    pub fn transformed(self, m: &TransAffine) -> Self {
        match self {
            PathCommand::MoveTo { x, y } => {
                let (x, y) = m.transform_point(x, y);
                PathCommand::MoveTo { x, y }
            }
            PathCommand::LineTo { x, y } => {
                let (x, y) = m.transform_point(x, y);
                PathCommand::LineTo { x, y }
            }
            PathCommand::BezierTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => {
                let (c1x, c1y) = m.transform_point(c1x, c1y);
                let (c2x, c2y) = m.transform_point(c2x, c2y);
                let (x, y) = m.transform_point(x, y);
                PathCommand::BezierTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                }
            }
            other => other,
        }
    }
}

/// Decode a raw tagged float stream.
///
/// Each command is its tag followed by its arguments. Unknown tags are
/// skipped one float at a time; a command truncated by the end of the
/// stream ends decoding.
pub fn decode_commands(raw: &[f32]) -> Vec<PathCommand> {
    let mut cmds = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        let args = &raw[i + 1..];
        let tag = raw[i];
        let (cmd, used) = if tag == CMD_MOVE_TO && args.len() >= 2 {
            (
                Some(PathCommand::MoveTo {
                    x: args[0],
                    y: args[1],
                }),
                3,
            )
        } else if tag == CMD_LINE_TO && args.len() >= 2 {
            (
                Some(PathCommand::LineTo {
                    x: args[0],
                    y: args[1],
                }),
                3,
            )
        } else if tag == CMD_BEZIER_TO && args.len() >= 6 {
            (
                Some(PathCommand::BezierTo {
                    c1x: args[0],
                    c1y: args[1],
                    c2x: args[2],
                    c2y: args[3],
                    x: args[4],
                    y: args[5],
                }),
                7,
            )
        } else if tag == CMD_CLOSE {
            (Some(PathCommand::Close), 1)
        } else if tag == CMD_WINDING && !args.is_empty() {
            (Winding::from_tag(args[0]).map(PathCommand::Winding), 2)
        } else if tag == CMD_MOVE_TO || tag == CMD_LINE_TO || tag == CMD_BEZIER_TO || tag == CMD_WINDING {
            break;
        } else {
            (None, 1)
        };
        if let Some(cmd) = cmd {
            cmds.push(cmd);
        }
        i += used;
    }
    cmds
}

/// Encode commands into the raw tagged float layout read by
/// [`decode_commands`].
pub fn encode_commands(cmds: &[PathCommand]) -> Vec<f32> {
    let mut raw = Vec::with_capacity(cmds.len() * 3);
    for cmd in cmds {
        raw.push(cmd.tag());
        match *cmd {
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                raw.extend_from_slice(&[x, y]);
            }
            PathCommand::BezierTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => raw.extend_from_slice(&[c1x, c1y, c2x, c2y, x, y]),
            PathCommand::Close => {}
            PathCommand::Winding(w) => raw.push(w.tag()),
        }
    }
    raw
}

// ============================================================================
// PathStorage
// ============================================================================

/// Command stream of the path under construction.
#[derive(Debug, Clone, Default)]
pub struct PathStorage {
    commands: Vec<PathCommand>,
    transform: TransAffine,
    command_x: f32,
    command_y: f32,
}

impl PathStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping the allocation.
    pub fn remove_all(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Transform applied to subsequently appended commands.
    pub fn set_transform(&mut self, m: TransAffine) {
        self.transform = m;
    }

    pub fn transform(&self) -> &TransAffine {
        &self.transform
    }

    /// Last appended end point, before transformation.
    pub fn command_point(&self) -> (f32, f32) {
        (self.command_x, self.command_y)
    }

    /// Append commands given in local coordinates.
    pub fn append(&mut self, cmds: &[PathCommand]) {
        let Some(first) = cmds.first() else {
            return;
        };
        if first.end_point().is_some() {
            if let Some((x, y)) = cmds.iter().rev().find_map(|c| c.end_point()) {
                self.command_x = x;
                self.command_y = y;
            }
        }
        let m = self.transform;
        self.commands
            .extend(cmds.iter().map(|c| c.transformed(&m)));
    }

    /// Append a raw tagged float stream, see [`decode_commands`].
    pub fn append_raw(&mut self, raw: &[f32]) {
        self.append(&decode_commands(raw));
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    /// Start a new sub-path at (x, y).
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.append(&[PathCommand::MoveTo { x, y }]);
    }

    /// Straight line from the current point to (x, y).
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.append(&[PathCommand::LineTo { x, y }]);
    }

    /// Cubic bezier from the current point to (x, y).
    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.append(&[PathCommand::BezierTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        }]);
    }

    /// Quadratic bezier from the current point to (x, y), stored as a cubic.
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let (x0, y0) = self.command_point();
        self.bezier_to(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        );
    }

    /// Close the current sub-path with a line segment.
    pub fn close_path(&mut self) {
        self.append(&[PathCommand::Close]);
    }

    /// Set the winding of the current sub-path.
    pub fn path_winding(&mut self, winding: Winding) {
        self.append(&[PathCommand::Winding(winding)]);
    }

    /// Circle arc centred at (cx, cy) from angle `a0` to `a1` in radians.
    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Direction) {
        let cmds = arc_commands(cx, cy, r, a0, a1, dir, !self.is_empty());
        self.append(&cmds);
    }

    /// Arc tangent to the segments current-point -> (x1, y1) and
    /// (x1, y1) -> (x2, y2). Degenerate corners become a line to (x1, y1).
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32, dist_tol: f32) {
        if self.is_empty() {
            return;
        }
        let (x0, y0) = self.command_point();
        match safe_arc_to(x0, y0, x1, y1, x2, y2, radius, dist_tol) {
            ArcTo::Line { x, y } => self.line_to(x, y),
            ArcTo::Arc {
                cx,
                cy,
                r,
                a0,
                a1,
                dir,
            } => self.arc(cx, cy, r, a0, a1, dir),
        }
    }

    /// Closed rectangle sub-path.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.append(&[
            PathCommand::MoveTo { x, y },
            PathCommand::LineTo { x, y: y + h },
            PathCommand::LineTo { x: x + w, y: y + h },
            PathCommand::LineTo { x: x + w, y },
            PathCommand::Close,
        ]);
    }

    /// Closed rectangle with circular corners of radius `r`.
    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        if r < 0.1 {
            self.rect(x, y, w, h);
            return;
        }
        let rx = r.min(w.abs() * 0.5) * w.signum();
        let ry = r.min(h.abs() * 0.5) * h.signum();
        let k = 1.0 - KAPPA90;
        self.append(&[
            PathCommand::MoveTo { x, y: y + ry },
            PathCommand::LineTo { x, y: y + h - ry },
            PathCommand::BezierTo {
                c1x: x,
                c1y: y + h - ry * k,
                c2x: x + rx * k,
                c2y: y + h,
                x: x + rx,
                y: y + h,
            },
            PathCommand::LineTo {
                x: x + w - rx,
                y: y + h,
            },
            PathCommand::BezierTo {
                c1x: x + w - rx * k,
                c1y: y + h,
                c2x: x + w,
                c2y: y + h - ry * k,
                x: x + w,
                y: y + h - ry,
            },
            PathCommand::LineTo { x: x + w, y: y + ry },
            PathCommand::BezierTo {
                c1x: x + w,
                c1y: y + ry * k,
                c2x: x + w - rx * k,
                c2y: y,
                x: x + w - rx,
                y,
            },
            PathCommand::LineTo { x: x + rx, y },
            PathCommand::BezierTo {
                c1x: x + rx * k,
                c1y: y,
                c2x: x,
                c2y: y + ry * k,
                x,
                y: y + ry,
            },
            PathCommand::Close,
        ]);
    }

    /// Closed ellipse sub-path built from four cubic quadrants.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let kx = rx * KAPPA90;
        let ky = ry * KAPPA90;
        self.append(&[
            PathCommand::MoveTo { x: cx - rx, y: cy },
            PathCommand::BezierTo {
                c1x: cx - rx,
                c1y: cy + ky,
                c2x: cx - kx,
                c2y: cy + ry,
                x: cx,
                y: cy + ry,
            },
            PathCommand::BezierTo {
                c1x: cx + kx,
                c1y: cy + ry,
                c2x: cx + rx,
                c2y: cy + ky,
                x: cx + rx,
                y: cy,
            },
            PathCommand::BezierTo {
                c1x: cx + rx,
                c1y: cy - ky,
                c2x: cx + kx,
                c2y: cy - ry,
                x: cx,
                y: cy - ry,
            },
            PathCommand::BezierTo {
                c1x: cx - kx,
                c1y: cy - ry,
                c2x: cx - rx,
                c2y: cy - ky,
                x: cx - rx,
                y: cy,
            },
            PathCommand::Close,
        ]);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.ellipse(cx, cy, r, r);
    }
}

// ============================================================================
// Tests
// ============================================================================
