//! # vgtess
//!
//! Path flattening and tessellation for GPU vector graphics.
//!
//! Paths are built from move/line/bezier commands (plus arcs, rectangles,
//! rounded rectangles and ellipses), flattened into polylines, and expanded
//! into triangle geometry a GPU can draw directly:
//!
//! - Adaptive bezier flattening with a tessellation tolerance
//! - Winding enforcement and convexity detection
//! - Fill geometry with an antialiasing fringe ring
//! - Stroke geometry with miter, round and bevel joins and butt, round and
//!   square caps
//! - Gradient and image paints, scissoring, a save/restore state stack
//!
//! ## Architecture
//!
//! 1. **Path storage** records commands, transformed at append time
//! 2. **Path cache** flattens them into points with corner classification
//! 3. **Expanders** turn points into fill, fringe and stroke vertices
//! 4. **Renderer** backends receive the vertices per draw call
//!
//! [`RenderSession`] drives the whole pipeline for one frame at a time.

// Foundation types & math
pub mod basics;
pub mod color;
pub mod math;
pub mod trans_affine;

// Path construction
pub mod arc;
pub mod curves;
pub mod path_storage;

// Flattening & expansion
pub mod math_stroke;
pub mod path_cache;
pub mod vcgen_fill;
pub mod vcgen_stroke;

// Drawing
pub mod context;
pub mod paint;
pub mod renderer;

pub use basics::{Direction, RectF, Winding};
pub use color::Color;
pub use context::{CreateFlags, FrameStats, RenderSession, State, Tolerances, MAX_STATES};
pub use math_stroke::{LineCap, LineJoin};
pub use paint::{Paint, Scissor};
pub use path_cache::{CachePath, CachePoint, PathCache, PointFlags, Vertex};
pub use path_storage::{PathCommand, PathStorage};
pub use renderer::{DrawPath, RecordedPath, RecordingRenderer, RenderCall, RenderError, Renderer};
pub use trans_affine::TransAffine;
