//! Render session.
//!
//! [`RenderSession`] owns the drawing state stack, the path being built and
//! its tessellation cache, and drives a [`Renderer`] backend. A frame is
//! `begin_frame`, any number of path/fill/stroke calls, then `end_frame`
//! (or `cancel_frame`).
//!
//! ```
//! use vgtess::{Color, CreateFlags, RecordingRenderer, RenderSession};
//!
//! let mut vg = RenderSession::new(RecordingRenderer::new(), CreateFlags::ANTIALIAS);
//! vg.begin_frame(640.0, 480.0, 1.0);
//! vg.begin_path();
//! vg.rect(10.0, 10.0, 100.0, 50.0);
//! vg.set_fill_color(Color::rgb8(255, 192, 0));
//! vg.fill();
//! vg.end_frame().unwrap();
//! assert_eq!(vg.renderer().flushed().len(), 1);
//! ```

use bitflags::bitflags;
use log::debug;

use crate::basics::{intersect_rects, Direction, Winding};
use crate::color::Color;
use crate::math_stroke::{LineCap, LineJoin};
use crate::paint::{Paint, Scissor};
use crate::path_cache::{PathCache, Vertex};
use crate::path_storage::{PathCommand, PathStorage};
use crate::renderer::{RenderError, Renderer};
use crate::trans_affine::TransAffine;

/// Maximum depth of the state stack, the current state included.
pub const MAX_STATES: usize = 32;

/// Miter limit used when building fill fringes.
const FILL_MITER_LIMIT: f32 = 2.4;

/// Widest stroke in device pixels.
const MAX_STROKE_WIDTH: f32 = 200.0;

bitflags! {
    /// Session creation options.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CreateFlags: u32 {
        /// Generate antialiasing fringes around fills and strokes.
        const ANTIALIAS       = 0x01;
        /// Backend hint: draw strokes through the stencil buffer.
        const STENCIL_STROKES = 0x02;
        /// Backend hint: enable extra error checking.
        const DEBUG           = 0x04;
    }
}

// ============================================================================
// Tolerances
// ============================================================================

/// Flattening and antialiasing tolerances for one device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tess_tol: f32,
    pub dist_tol: f32,
    pub fringe_width: f32,
    pub device_pixel_ratio: f32,
}

impl Tolerances {
    pub fn for_device_pixel_ratio(ratio: f32) -> Self {
        Self {
            tess_tol: 0.25 / ratio,
            dist_tol: 0.01 / ratio,
            fringe_width: 1.0 / ratio,
            device_pixel_ratio: ratio,
        }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::for_device_pixel_ratio(1.0)
    }
}

// ============================================================================
// State / FrameStats
// ============================================================================

/// Drawing state saved and restored by [`RenderSession::save`] and
/// [`RenderSession::restore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub miter_limit: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub alpha: f32,
    pub xform: TransAffine,
    pub scissor: Scissor,
}

impl Default for State {
    fn default() -> Self {
        Self {
            fill: Paint::color(Color::white()),
            stroke: Paint::color(Color::black()),
            stroke_width: 1.0,
            miter_limit: 10.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            alpha: 1.0,
            xform: TransAffine::new(),
            scissor: Scissor::disabled(),
        }
    }
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub fill_tris: usize,
    pub stroke_tris: usize,
    pub text_tris: usize,
}

// ============================================================================
// RenderSession
// ============================================================================

pub struct RenderSession<R: Renderer> {
    renderer: R,
    flags: CreateFlags,
    state: State,
    saved: Vec<State>,
    storage: PathStorage,
    cache: PathCache,
    tol: Tolerances,
    stats: FrameStats,
}

impl<R: Renderer> RenderSession<R> {
    pub fn new(renderer: R, flags: CreateFlags) -> Self {
        Self {
            renderer,
            flags,
            state: State::default(),
            saved: Vec::with_capacity(MAX_STATES),
            storage: PathStorage::new(),
            cache: PathCache::new(),
            tol: Tolerances::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn flags(&self) -> CreateFlags {
        self.flags
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tol
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn path_storage(&self) -> &PathStorage {
        &self.storage
    }

    pub fn path_cache(&self) -> &PathCache {
        &self.cache
    }

    fn antialias(&self) -> bool {
        self.flags.contains(CreateFlags::ANTIALIAS)
    }

    // ====================================================================
    // Frame
    // ====================================================================

    /// Start a frame of `width` x `height` logical pixels.
    ///
    /// Resets the state stack and frame statistics.
    pub fn begin_frame(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.saved.clear();
        self.state = State::default();
        self.tol = Tolerances::for_device_pixel_ratio(device_pixel_ratio);
        self.renderer.set_viewport(width, height, device_pixel_ratio);
        self.stats = FrameStats::default();
    }

    pub fn cancel_frame(&mut self) {
        self.renderer.cancel();
    }

    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        self.renderer.flush()
    }

    // ====================================================================
    // State stack
    // ====================================================================

    /// Push a copy of the current state. Ignored once the stack holds
    /// [`MAX_STATES`] states.
    pub fn save(&mut self) {
        if self.state_depth() >= MAX_STATES {
            debug!("state stack full ({} states), save ignored", MAX_STATES);
            return;
        }
        self.saved.push(self.state);
    }

    /// Pop the last saved state. The bottom state is never popped.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Reset the current state to defaults.
    pub fn reset(&mut self) {
        self.state = State::default();
    }

    /// Number of states on the stack, the current one included.
    pub fn state_depth(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    // ====================================================================
    // Style
    // ====================================================================

    pub fn set_stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    pub fn stroke_width(&self) -> f32 {
        self.state.stroke_width
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        self.state.miter_limit = limit;
    }

    pub fn miter_limit(&self) -> f32 {
        self.state.miter_limit
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn line_join(&self) -> LineJoin {
        self.state.line_join
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = Paint::color(color);
    }

    /// Set the fill paint, given in the current coordinate space.
    pub fn set_fill_paint(&mut self, paint: Paint) {
        let mut p = paint;
        p.xform.multiply(&self.state.xform);
        self.state.fill = p;
    }

    pub fn fill_paint(&self) -> &Paint {
        &self.state.fill
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = Paint::color(color);
    }

    /// Set the stroke paint, given in the current coordinate space.
    pub fn set_stroke_paint(&mut self, paint: Paint) {
        let mut p = paint;
        p.xform.multiply(&self.state.xform);
        self.state.stroke = p;
    }

    pub fn stroke_paint(&self) -> &Paint {
        &self.state.stroke
    }

    // ====================================================================
    // Transform
    // ====================================================================

    pub fn reset_transform(&mut self) {
        self.state.xform.reset();
    }

    /// Pre-multiply the current transform by `[a, b, c, d, e, f]`.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state
            .xform
            .premultiply(&TransAffine::new_custom(a, b, c, d, e, f));
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.xform.premultiply(&TransAffine::new_translation(x, y));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.xform.premultiply(&TransAffine::new_rotation(angle));
    }

    pub fn skew_x(&mut self, angle: f32) {
        self.state.xform.premultiply(&TransAffine::new_skewing_x(angle));
    }

    pub fn skew_y(&mut self, angle: f32) {
        self.state.xform.premultiply(&TransAffine::new_skewing_y(angle));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.state.xform.premultiply(&TransAffine::new_scaling(x, y));
    }

    pub fn current_transform(&self) -> TransAffine {
        self.state.xform
    }

    // ====================================================================
    // Scissor
    // ====================================================================

    /// Clip to a rectangle in the current coordinate space.
    pub fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let w = w.max(0.0);
        let h = h.max(0.0);
        let mut xform = TransAffine::new_translation(x + w * 0.5, y + h * 0.5);
        xform.multiply(&self.state.xform);
        self.state.scissor = Scissor {
            xform,
            extent: [w * 0.5, h * 0.5],
        };
    }

    /// Clip to the intersection of the current scissor and a rectangle.
    ///
    /// The current scissor is brought into the current coordinate space as
    /// an axis-aligned box first, so rotated scissors intersect by their
    /// bounds.
    pub fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let prev = self.state.scissor;
        if !prev.is_enabled() {
            self.scissor(x, y, w, h);
            return;
        }
        let mut pxform = prev.xform;
        pxform.multiply(&self.state.xform.safe_inverse());
        let [ex, ey] = prev.extent;
        let tex = ex * pxform.sx.abs() + ey * pxform.shx.abs();
        let tey = ex * pxform.shy.abs() + ey * pxform.sy.abs();
        let r = intersect_rects(pxform.tx - tex, pxform.ty - tey, tex * 2.0, tey * 2.0, x, y, w, h);
        self.scissor(r[0], r[1], r[2], r[3]);
    }

    pub fn reset_scissor(&mut self) {
        self.state.scissor = Scissor::disabled();
    }

    // ====================================================================
    // Paths
    // ====================================================================

    /// Clear the current path.
    pub fn begin_path(&mut self) {
        self.storage.remove_all();
        self.cache.clear();
    }

    fn append_with<F: FnOnce(&mut PathStorage)>(&mut self, f: F) {
        self.storage.set_transform(self.state.xform);
        f(&mut self.storage);
        self.cache.invalidate();
    }

    /// Append commands given in the current coordinate space.
    pub fn append_commands(&mut self, cmds: &[PathCommand]) {
        self.append_with(|s| s.append(cmds));
    }

    /// Append a raw tagged float stream. Unknown tags are skipped.
    pub fn append_raw(&mut self, raw: &[f32]) {
        self.append_with(|s| s.append_raw(raw));
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.append_with(|s| s.move_to(x, y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.append_with(|s| s.line_to(x, y));
    }

    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.append_with(|s| s.bezier_to(c1x, c1y, c2x, c2y, x, y));
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.append_with(|s| s.quad_to(cx, cy, x, y));
    }

    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Direction) {
        self.append_with(|s| s.arc(cx, cy, r, a0, a1, dir));
    }

    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        let dist_tol = self.tol.dist_tol;
        self.append_with(|s| s.arc_to(x1, y1, x2, y2, radius, dist_tol));
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.append_with(|s| s.rect(x, y, w, h));
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        self.append_with(|s| s.rounded_rect(x, y, w, h, r));
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.append_with(|s| s.ellipse(cx, cy, rx, ry));
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.append_with(|s| s.circle(cx, cy, r));
    }

    pub fn close_path(&mut self) {
        self.append_with(|s| s.close_path());
    }

    pub fn path_winding(&mut self, winding: Winding) {
        self.append_with(|s| s.path_winding(winding));
    }

    // ====================================================================
    // Drawing
    // ====================================================================

    fn flatten(&mut self) {
        self.cache
            .flatten(self.storage.commands(), self.tol.tess_tol, self.tol.dist_tol);
    }

    /// Fill the current path with the fill paint.
    pub fn fill(&mut self) {
        self.flatten();
        let fringe = self.tol.fringe_width;
        let w = if self.antialias() { fringe } else { 0.0 };
        self.cache.expand_fill(w, LineJoin::Miter, FILL_MITER_LIMIT, fringe);

        let mut paint = self.state.fill;
        paint.multiply_alpha(self.state.alpha);

        let paths = self.cache.draw_paths();
        self.renderer
            .render_fill(&paint, &self.state.scissor, fringe, self.cache.bounds(), &paths);

        for p in &paths {
            self.stats.fill_tris += p.fill.len().saturating_sub(2);
            self.stats.stroke_tris += p.fringe.len().saturating_sub(2);
            self.stats.draw_calls += 2;
        }
    }

    /// Stroke the current path with the stroke paint.
    ///
    /// Strokes thinner than the fringe are drawn at fringe width with the
    /// paint alpha scaled by the squared coverage.
    pub fn stroke(&mut self) {
        let fringe = self.tol.fringe_width;
        let scale = self.state.xform.average_scale();
        let mut stroke_width = (self.state.stroke_width * scale).clamp(0.0, MAX_STROKE_WIDTH);
        let mut paint = self.state.stroke;

        if stroke_width < fringe {
            let alpha = (stroke_width / fringe).clamp(0.0, 1.0);
            paint.multiply_alpha(alpha * alpha);
            stroke_width = fringe;
        }
        paint.multiply_alpha(self.state.alpha);

        self.flatten();
        let half = if self.antialias() {
            stroke_width * 0.5 + fringe * 0.5
        } else {
            stroke_width * 0.5
        };
        self.cache.expand_stroke(
            half,
            self.state.line_cap,
            self.state.line_join,
            self.state.miter_limit,
            fringe,
            self.tol.tess_tol,
        );

        let paths = self.cache.draw_paths();
        self.renderer
            .render_stroke(&paint, &self.state.scissor, fringe, stroke_width, &paths);

        for p in &paths {
            self.stats.stroke_tris += p.stroke.len().saturating_sub(2);
            self.stats.draw_calls += 2;
        }
    }

    /// Draw pre-triangulated vertices with the fill paint.
    pub fn draw_triangles(&mut self, vertices: &[Vertex]) {
        let mut paint = self.state.fill;
        paint.multiply_alpha(self.state.alpha);
        self.renderer
            .render_triangles(&paint, &self.state.scissor, vertices);
        self.stats.text_tris += vertices.len() / 3;
        self.stats.draw_calls += 1;
    }

    /// Log every cached path's vertices at debug level.
    pub fn debug_dump_path_cache(&self) {
        debug!("Dumping {} cached paths", self.cache.paths().len());
        for (i, path) in self.cache.paths().iter().enumerate() {
            debug!(" - Path {}", i);
            let fill = self.cache.fill_vertices(path);
            if !fill.is_empty() {
                debug!("   - fill: {}", fill.len());
                for v in fill {
                    debug!("{}\t{}", v.x, v.y);
                }
            }
            for (name, edge) in [
                ("fringe", self.cache.fringe_vertices(path)),
                ("stroke", self.cache.stroke_vertices(path)),
            ] {
                if !edge.is_empty() {
                    debug!("   - {}: {}", name, edge.len());
                    for v in edge {
                        debug!("{}\t{}", v.x, v.y);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
