//! Paints and scissors.
//!
//! A [`Paint`] describes how a shape is colored: a gradient or image
//! pattern is expressed as a transform into paint space plus an extent,
//! corner radius and feather, which a backend shader evaluates per pixel.
//! Solid colors are the degenerate case with equal inner and outer colors.

use crate::color::Color;
use crate::trans_affine::TransAffine;

/// Half-length used to make a linear gradient look unbounded.
const LINEAR_GRADIENT_LARGE: f32 = 1e5;

// ============================================================================
// Paint
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub xform: TransAffine,
    pub extent: [f32; 2],
    pub radius: f32,
    pub feather: f32,
    pub inner_color: Color,
    pub outer_color: Color,
    /// Backend image handle for image patterns.
    pub image: Option<u32>,
}

impl Paint {
    /// Solid color paint.
    pub fn color(c: Color) -> Self {
        Self {
            xform: TransAffine::new(),
            extent: [0.0, 0.0],
            radius: 0.0,
            feather: 1.0,
            inner_color: c,
            outer_color: c,
            image: None,
        }
    }

    /// Linear gradient from `icol` at (sx, sy) to `ocol` at (ex, ey).
    pub fn linear_gradient(sx: f32, sy: f32, ex: f32, ey: f32, icol: Color, ocol: Color) -> Self {
        let mut dx = ex - sx;
        let mut dy = ey - sy;
        let d = (dx * dx + dy * dy).sqrt();
        if d > 0.0001 {
            dx /= d;
            dy /= d;
        } else {
            dx = 0.0;
            dy = 1.0;
        }
        let large = LINEAR_GRADIENT_LARGE;
        Self {
            xform: TransAffine::new_custom(dy, -dx, dx, dy, sx - dx * large, sy - dy * large),
            extent: [large, large + d * 0.5],
            radius: 0.0,
            feather: d.max(1.0),
            inner_color: icol,
            outer_color: ocol,
            image: None,
        }
    }

    /// Radial gradient around (cx, cy) fading between radii `inr` and `outr`.
    pub fn radial_gradient(cx: f32, cy: f32, inr: f32, outr: f32, icol: Color, ocol: Color) -> Self {
        let r = (inr + outr) * 0.5;
        let f = outr - inr;
        Self {
            xform: TransAffine::new_translation(cx, cy),
            extent: [r, r],
            radius: r,
            feather: f.max(1.0),
            inner_color: icol,
            outer_color: ocol,
            image: None,
        }
    }

    /// Feathered rounded box, useful for drop shadows.
    #[allow(clippy::too_many_arguments)]
    pub fn box_gradient(x: f32, y: f32, w: f32, h: f32, r: f32, f: f32, icol: Color, ocol: Color) -> Self {
        Self {
            xform: TransAffine::new_translation(x + w * 0.5, y + h * 0.5),
            extent: [w * 0.5, h * 0.5],
            radius: r,
            feather: f.max(1.0),
            inner_color: icol,
            outer_color: ocol,
            image: None,
        }
    }

    /// Image pattern with its top-left corner at (ox, oy), one image of
    /// size (w, h) rotated by `angle` around the origin.
    #[allow(clippy::too_many_arguments)]
    pub fn image_pattern(ox: f32, oy: f32, w: f32, h: f32, angle: f32, image: u32, alpha: f32) -> Self {
        let mut xform = TransAffine::new_rotation(angle);
        xform.tx = ox;
        xform.ty = oy;
        let c = Color::new(1.0, 1.0, 1.0, alpha);
        Self {
            xform,
            extent: [w, h],
            radius: 0.0,
            feather: 0.0,
            inner_color: c,
            outer_color: c,
            image: Some(image),
        }
    }

    /// Scale both colors' alpha.
    pub fn multiply_alpha(&mut self, alpha: f32) {
        self.inner_color.a *= alpha;
        self.outer_color.a *= alpha;
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::color(Color::black())
    }
}

// ============================================================================
// Scissor
// ============================================================================

/// Clip rectangle: a transform to its centre and its half extents.
///
/// A negative extent means scissoring is disabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scissor {
    pub xform: TransAffine,
    pub extent: [f32; 2],
}

impl Scissor {
    pub fn disabled() -> Self {
        Self {
            xform: TransAffine::new_custom(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            extent: [-1.0, -1.0],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.extent[0] >= 0.0
    }
}

impl Default for Scissor {
    fn default() -> Self {
        Self::disabled()
    }
}

// ============================================================================
// Tests
// ============================================================================
