//! Image/texture handles and upload flags
//!
//! The engine never decodes or owns pixel data; it only routes handles to
//! the backend. Handles are generational slotmap keys so a stale id can
//! never alias a recycled texture.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a backend-owned texture
    pub struct ImageId;
}

/// Texel layout of a backend texture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureKind {
    #[default]
    Rgba,
    Alpha,
}

/// Sampling and upload behavior requested at texture creation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageFlags {
    pub generate_mipmaps: bool,
    pub repeat_x: bool,
    pub repeat_y: bool,
    pub flip_y: bool,
    pub premultiplied: bool,
    pub nearest: bool,
}
