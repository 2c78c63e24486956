//! Draw-style enums and blend state

use crate::transform::Transform2D;

/// Stroke end-cap shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke corner shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Sub-path direction. This is the one canonical direction type; callers
/// thinking in solid/hole terms use [`Solidity`] and convert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Winding {
    /// Counter-clockwise, the direction of solid shapes
    #[default]
    Ccw,
    /// Clockwise, the direction of holes
    Cw,
}

/// Solid/hole intent for a sub-path; resolves to a [`Winding`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Solidity {
    #[default]
    Solid,
    Hole,
}

impl From<Solidity> for Winding {
    fn from(solidity: Solidity) -> Self {
        match solidity {
            Solidity::Solid => Winding::Ccw,
            Solidity::Hole => Winding::Cw,
        }
    }
}

/// Blend factor over source/destination fragments
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// Porter-Duff composite operations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    Atop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
}

/// Resolved blend-factor state handed to the backend with every call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeState {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl CompositeState {
    pub fn new(op: CompositeOperation) -> Self {
        let (src, dst) = match op {
            CompositeOperation::SourceOver => (BlendFactor::One, BlendFactor::OneMinusSrcAlpha),
            CompositeOperation::SourceIn => (BlendFactor::DstAlpha, BlendFactor::Zero),
            CompositeOperation::SourceOut => (BlendFactor::OneMinusDstAlpha, BlendFactor::Zero),
            CompositeOperation::Atop => (BlendFactor::DstAlpha, BlendFactor::OneMinusSrcAlpha),
            CompositeOperation::DestinationOver => {
                (BlendFactor::OneMinusDstAlpha, BlendFactor::One)
            }
            CompositeOperation::DestinationIn => (BlendFactor::Zero, BlendFactor::SrcAlpha),
            CompositeOperation::DestinationOut => {
                (BlendFactor::Zero, BlendFactor::OneMinusSrcAlpha)
            }
            CompositeOperation::DestinationAtop => {
                (BlendFactor::OneMinusDstAlpha, BlendFactor::SrcAlpha)
            }
            CompositeOperation::Lighter => (BlendFactor::One, BlendFactor::One),
            CompositeOperation::Copy => (BlendFactor::One, BlendFactor::Zero),
            CompositeOperation::Xor => {
                (BlendFactor::OneMinusDstAlpha, BlendFactor::OneMinusSrcAlpha)
            }
        };
        Self {
            src_rgb: src,
            dst_rgb: dst,
            src_alpha: src,
            dst_alpha: dst,
        }
    }

    pub fn separate(
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        Self {
            src_rgb,
            dst_rgb,
            src_alpha,
            dst_alpha,
        }
    }
}

impl Default for CompositeState {
    fn default() -> Self {
        Self::new(CompositeOperation::SourceOver)
    }
}

/// A transformed rectangular clip region. `extent` is the half-size of the
/// rectangle in its own space; `None` disables scissoring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scissor {
    pub transform: Transform2D,
    pub extent: Option<[f32; 2]>,
}
