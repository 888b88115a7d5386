//! Renderer backend interface.
//!
//! The session hands expanded geometry to a [`Renderer`]: one call per
//! fill, stroke or triangle batch, bracketed by a viewport at frame start
//! and a flush (or cancel) at frame end. A GPU backend uploads the vertex
//! slices and issues draws; [`RecordingRenderer`] keeps copies of every
//! call for headless use and tests.

use crate::basics::RectF;
use crate::paint::{Paint, Scissor};
use crate::path_cache::Vertex;

// ============================================================================
// DrawPath
// ============================================================================

/// Per-path geometry borrowed from the path cache's vertex arena.
#[derive(Debug, Clone, Copy)]
pub struct DrawPath<'a> {
    /// Core polygon, a triangle fan.
    pub fill: &'a [Vertex],
    /// Antialiasing ring around the fill, a triangle strip.
    pub fringe: &'a [Vertex],
    /// Stroke outline, a triangle strip.
    pub stroke: &'a [Vertex],
    pub convex: bool,
    pub closed: bool,
}

// ============================================================================
// RenderError
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Flush without a preceding viewport.
    FrameNotStarted,
    InvalidViewport { width: f32, height: f32 },
    /// Failure reported by the underlying graphics API.
    Backend(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrameNotStarted => write!(f, "Frame not started"),
            Self::InvalidViewport { width, height } => {
                write!(f, "Invalid viewport {}x{}", width, height)
            }
            Self::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

// ============================================================================
// Renderer
// ============================================================================

pub trait Renderer {
    fn set_viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32);

    /// Drop everything queued since the viewport was set.
    fn cancel(&mut self);

    /// Submit everything queued since the viewport was set.
    fn flush(&mut self) -> Result<(), RenderError>;

    fn render_fill(
        &mut self,
        paint: &Paint,
        scissor: &Scissor,
        fringe_width: f32,
        bounds: RectF,
        paths: &[DrawPath<'_>],
    );

    fn render_stroke(
        &mut self,
        paint: &Paint,
        scissor: &Scissor,
        fringe_width: f32,
        stroke_width: f32,
        paths: &[DrawPath<'_>],
    );

    /// Pre-triangulated vertices, three per triangle.
    fn render_triangles(&mut self, paint: &Paint, scissor: &Scissor, vertices: &[Vertex]);
}

// ============================================================================
// RecordingRenderer
// ============================================================================

/// Owned copy of a [`DrawPath`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPath {
    pub fill: Vec<Vertex>,
    pub fringe: Vec<Vertex>,
    pub stroke: Vec<Vertex>,
    pub convex: bool,
    pub closed: bool,
}

impl From<&DrawPath<'_>> for RecordedPath {
    fn from(p: &DrawPath<'_>) -> Self {
        Self {
            fill: p.fill.to_vec(),
            fringe: p.fringe.to_vec(),
            stroke: p.stroke.to_vec(),
            convex: p.convex,
            closed: p.closed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Fill {
        paint: Paint,
        scissor: Scissor,
        fringe_width: f32,
        bounds: RectF,
        paths: Vec<RecordedPath>,
    },
    Stroke {
        paint: Paint,
        scissor: Scissor,
        fringe_width: f32,
        stroke_width: f32,
        paths: Vec<RecordedPath>,
    },
    Triangles {
        paint: Paint,
        scissor: Scissor,
        vertices: Vec<Vertex>,
    },
}

/// Headless backend that records every call.
///
/// Calls queue in [`calls`](Self::calls) until a flush moves them to
/// [`flushed`](Self::flushed).
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    viewport: Option<[f32; 3]>,
    calls: Vec<RenderCall>,
    flushed: Vec<RenderCall>,
    flush_count: usize,
    cancel_count: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[width, height, device_pixel_ratio]` of the current frame.
    pub fn viewport(&self) -> Option<[f32; 3]> {
        self.viewport
    }

    /// Calls queued in the current frame.
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Calls submitted by the last successful flush.
    pub fn flushed(&self) -> &[RenderCall] {
        &self.flushed
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn cancel_count(&self) -> usize {
        self.cancel_count
    }
}

impl Renderer for RecordingRenderer {
    fn set_viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = Some([width, height, device_pixel_ratio]);
        self.calls.clear();
    }

    fn cancel(&mut self) {
        self.calls.clear();
        self.viewport = None;
        self.cancel_count += 1;
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        let [width, height, _] = self.viewport.ok_or(RenderError::FrameNotStarted)?;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(RenderError::InvalidViewport { width, height });
        }
        self.flushed = std::mem::take(&mut self.calls);
        self.viewport = None;
        self.flush_count += 1;
        Ok(())
    }

    fn render_fill(
        &mut self,
        paint: &Paint,
        scissor: &Scissor,
        fringe_width: f32,
        bounds: RectF,
        paths: &[DrawPath<'_>],
    ) {
        self.calls.push(RenderCall::Fill {
            paint: *paint,
            scissor: *scissor,
            fringe_width,
            bounds,
            paths: paths.iter().map(RecordedPath::from).collect(),
        });
    }

    fn render_stroke(
        &mut self,
        paint: &Paint,
        scissor: &Scissor,
        fringe_width: f32,
        stroke_width: f32,
        paths: &[DrawPath<'_>],
    ) {
        self.calls.push(RenderCall::Stroke {
            paint: *paint,
            scissor: *scissor,
            fringe_width,
            stroke_width,
            paths: paths.iter().map(RecordedPath::from).collect(),
        });
    }

    fn render_triangles(&mut self, paint: &Paint, scissor: &Scissor, vertices: &[Vertex]) {
        self.calls.push(RenderCall::Triangles {
            paint: *paint,
            scissor: *scissor,
            vertices: vertices.to_vec(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
