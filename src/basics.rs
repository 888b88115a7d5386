//! Foundation types and constants.
//!
//! The most fundamental types that everything else in the tessellator
//! depends on: angle helpers, bounding rectangles, and the winding and
//! sweep-direction enums used while building paths.

// ============================================================================
// Mathematical constants
// ============================================================================

pub const PI: f32 = std::f32::consts::PI;

/// Length proportional to radius of a cubic bezier handle for 90deg arcs.
pub const KAPPA90: f32 = 0.552_284_8;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f32) -> f32 {
    deg / 180.0 * PI
}

/// Convert radians to degrees.
#[inline]
pub fn rad2deg(rad: f32) -> f32 {
    rad / PI * 180.0
}

/// Returns `true` if `v1` and `v2` differ by at most `epsilon`.
#[inline]
pub fn is_equal_eps(v1: f32, v2: f32, epsilon: f32) -> bool {
    (v1 - v2).abs() <= epsilon
}

// ============================================================================
// Winding / direction
// ============================================================================

/// Fill orientation of a sub-path.
///
/// `Solid` sub-paths add to the covered area, `Hole` sub-paths cut it out.
/// The orientation is enforced on the flattened polygon by reversing its
/// point order, never by re-flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    #[default]
    Solid = 1,
    Hole = 2,
}

impl Winding {
    /// Decode the numeric tag used by raw command streams.
    pub fn from_tag(tag: f32) -> Option<Self> {
        match tag as i32 {
            1 => Some(Winding::Solid),
            2 => Some(Winding::Hole),
            _ => None,
        }
    }

    pub fn tag(self) -> f32 {
        self as i32 as f32
    }
}

/// Sweep direction for arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    CounterClockwise = 1,
    Clockwise = 2,
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the point (x, y) is inside the rectangle.
    pub fn hit_test(&self, x: T, y: T) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Rectangle with `f32` coordinates.
pub type RectF = Rect<f32>;

impl RectF {
    /// An inverted rectangle that any added point will shrink-wrap.
    pub fn empty_bounds() -> Self {
        Self::new(1e6, 1e6, -1e6, -1e6)
    }

    /// Grow the rectangle to include the point (x, y).
    #[inline]
    pub fn add_point(&mut self, x: f32, y: f32) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }

    /// `[min_x, min_y, max_x, max_y]`, the layout GPU backends upload.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// Intersect two rectangles given as origin and size.
///
/// Returns `[x, y, w, h]` with the size clamped to zero when they do not
/// overlap.
#[allow(clippy::too_many_arguments)]
pub fn intersect_rects(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> [f32; 4] {
    let min_x = ax.max(bx);
    let min_y = ay.max(by);
    let max_x = (ax + aw).min(bx + bw);
    let max_y = (ay + ah).min(by + bh);
    [min_x, min_y, (max_x - min_x).max(0.0), (max_y - min_y).max(0.0)]
}

// ============================================================================
// Tests
// ============================================================================
