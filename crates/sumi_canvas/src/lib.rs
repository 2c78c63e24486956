//! Retained 2D vector path engine
//!
//! The pipeline runs in four stages:
//!
//! - **Record**: path verbs accumulate under the current transform
//!   ([`Canvas`] and the path builders)
//! - **Flatten**: curves subdivide into polylines, sub-paths get winding
//!   and join annotations
//! - **Expand**: fills grow an anti-aliasing fringe, strokes grow caps and
//!   joins into triangle strips
//! - **Batch**: draw calls, vertices, and uniforms pool up for a pluggable
//!   [`Renderer`] backend ([`BatchRenderer`] is the recording reference)
//!
//! Geometry primitives, paints, and transforms live in `sumi_core`.

pub mod batch;
mod cache;
pub mod context;
pub mod error;
mod fill;
pub mod path;
pub mod renderer;
pub mod state;
mod stroke;

pub use batch::{BatchRenderer, Call, CallKind, PathSlice};
pub use context::Canvas;
pub use error::{RendererError, Result};
pub use path::Verb;
pub use renderer::{Params, RenderPath, Renderer, ShaderKind};
pub use state::{RenderState, TextStyle, MAX_STATE_STACK};

pub use sumi_core::{
    BlendFactor, Bounds, Color, CompositeOperation, CompositeState, ImageFlags, ImageId, LineCap,
    LineJoin, Paint, PaintKind, Rect, Scissor, Solidity, TextureKind, Transform2D, Vertex,
    Winding,
};
