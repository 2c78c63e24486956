//! Render state and the bounded save/restore stack

use sumi_core::{
    Color, CompositeState, LineCap, LineJoin, Paint, Scissor, Transform2D,
};

/// Maximum save/restore depth. `save` beyond this clamps silently; see
/// DESIGN.md for the rationale.
pub const MAX_STATE_STACK: usize = 32;

/// Text style carried in the render state. Text shaping itself lives
/// outside this engine; the state only holds the knobs a text layer reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub letter_spacing: f32,
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            letter_spacing: 0.0,
            line_height: 1.0,
        }
    }
}

/// One snapshot of the draw style. Fully value-copied on save.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub miter_limit: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub alpha: f32,
    pub composite: CompositeState,
    pub shape_anti_alias: bool,
    pub transform: Transform2D,
    pub scissor: Scissor,
    pub text: TextStyle,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            fill: Paint::color(Color::WHITE),
            stroke: Paint::color(Color::BLACK),
            stroke_width: 1.0,
            miter_limit: 10.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            alpha: 1.0,
            composite: CompositeState::default(),
            shape_anti_alias: true,
            transform: Transform2D::identity(),
            scissor: Scissor::default(),
            text: TextStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumi_core::PaintKind;

    #[test]
    fn test_default_state() {
        let state = RenderState::default();
        assert_eq!(
            state.fill.kind,
            PaintKind::SolidColor {
                color: Color::WHITE
            }
        );
        assert_eq!(
            state.stroke.kind,
            PaintKind::SolidColor {
                color: Color::BLACK
            }
        );
        assert_eq!(state.stroke_width, 1.0);
        assert_eq!(state.miter_limit, 10.0);
        assert_eq!(state.text.font_size, 16.0);
        assert!(state.scissor.extent.is_none());
        assert!(state.shape_anti_alias);
    }
}
