//! Sumi core primitives
//!
//! This crate provides the shared value types for the Sumi vector-graphics
//! engine:
//!
//! - **Transforms**: 2x3 affine matrices with explicit composition order
//! - **Colors and Paints**: solid colors, gradients, and image patterns as
//!   an explicit tagged [`PaintKind`]
//! - **Style state**: line caps/joins, winding, composite operations
//! - **GPU-ready geometry**: `#[repr(C)]` + `bytemuck::Pod` vertex type
//!
//! It is a leaf crate: `sumi_canvas` and concrete GPU backends both depend
//! on it, never the other way around.

pub mod color;
pub mod image;
pub mod paint;
pub mod primitives;
pub mod style;
pub mod transform;

pub use color::Color;
pub use image::{ImageFlags, ImageId, TextureKind};
pub use paint::{Paint, PaintKind};
pub use primitives::{Bounds, Rect, Vertex};
pub use style::{
    BlendFactor, CompositeOperation, CompositeState, LineCap, LineJoin, Scissor, Solidity, Winding,
};
pub use transform::Transform2D;
