//! Renderer error types

use thiserror::Error;

/// Errors reported across the backend contract.
///
/// The geometry layer itself never errors: degenerate inputs are resolved by
/// policy (degrade to a line, skip the sub-path, fall back to the
/// untransformed rectangle). Only texture management and backend bring-up
/// have real failure modes.
#[derive(Error, Debug)]
pub enum RendererError {
    /// Operation referenced a deleted or never-created image handle
    #[error("unknown image handle")]
    ImageNotFound,

    /// Texture update rectangle falls outside the allocated texture
    #[error("texture update out of bounds: ({x},{y}) {width}x{height} exceeds {tex_width}x{tex_height}")]
    UpdateOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        tex_width: u32,
        tex_height: u32,
    },

    /// Pixel buffer does not match the described rectangle
    #[error("pixel data size mismatch: expected {expected} bytes, got {actual}")]
    PixelSizeMismatch { expected: usize, actual: usize },

    /// Backend failed to initialize (shader compile/link, missing device).
    /// Callers should treat this as fatal to the rendering context.
    #[error("backend initialization failed: {0}")]
    BackendInit(String),
}

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RendererError>;
