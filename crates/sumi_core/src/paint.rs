//! Paint descriptions for fills and strokes
//!
//! A [`Paint`] is a paint-space transform plus an explicit [`PaintKind`]
//! variant. Each variant carries only the fields its shader path needs;
//! the backend converts a paint into a uniform block without guessing the
//! kind from which numeric fields look populated.

use crate::color::Color;
use crate::image::ImageId;
use crate::transform::Transform2D;

/// What a paint draws
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintKind {
    /// Flat color
    SolidColor { color: Color },
    /// Gradient along the segment from `start` to `end`
    LinearGradient {
        start: (f32, f32),
        end: (f32, f32),
        inner_color: Color,
        outer_color: Color,
    },
    /// Feathered rounded-rectangle gradient, used for box shadows
    BoxGradient {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        feather: f32,
        inner_color: Color,
        outer_color: Color,
    },
    /// Gradient between two circles sharing a center
    RadialGradient {
        center: (f32, f32),
        inner_radius: f32,
        outer_radius: f32,
        inner_color: Color,
        outer_color: Color,
    },
    /// Tiled/rotated image fill
    ImagePattern {
        origin: (f32, f32),
        width: f32,
        height: f32,
        angle: f32,
        image: ImageId,
        alpha: f32,
    },
}

/// A fill or stroke style: paint-space transform plus kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub transform: Transform2D,
    pub kind: PaintKind,
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::color(color)
    }
}

impl Paint {
    pub fn color(color: Color) -> Self {
        Self {
            transform: Transform2D::identity(),
            kind: PaintKind::SolidColor { color },
        }
    }

    pub fn linear_gradient(
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        Self {
            transform: Transform2D::identity(),
            kind: PaintKind::LinearGradient {
                start: (start_x, start_y),
                end: (end_x, end_y),
                inner_color,
                outer_color,
            },
        }
    }

    pub fn box_gradient(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        feather: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        Self {
            transform: Transform2D::identity(),
            kind: PaintKind::BoxGradient {
                x,
                y,
                width,
                height,
                radius,
                feather: feather.max(1.0),
                inner_color,
                outer_color,
            },
        }
    }

    pub fn radial_gradient(
        center_x: f32,
        center_y: f32,
        inner_radius: f32,
        outer_radius: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        Self {
            transform: Transform2D::identity(),
            kind: PaintKind::RadialGradient {
                center: (center_x, center_y),
                inner_radius,
                outer_radius,
                inner_color,
                outer_color,
            },
        }
    }

    pub fn image_pattern(
        origin_x: f32,
        origin_y: f32,
        width: f32,
        height: f32,
        angle: f32,
        image: ImageId,
        alpha: f32,
    ) -> Self {
        Self {
            transform: Transform2D::identity(),
            kind: PaintKind::ImagePattern {
                origin: (origin_x, origin_y),
                width,
                height,
                angle,
                image,
                alpha,
            },
        }
    }

    /// The texture this paint samples, if any
    pub fn image(&self) -> Option<ImageId> {
        match self.kind {
            PaintKind::ImagePattern { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Scale the paint's alpha channels; used for global alpha and
    /// sub-pixel stroke coverage
    pub fn mul_alpha(&mut self, factor: f32) {
        match &mut self.kind {
            PaintKind::SolidColor { color } => *color = color.mul_alpha(factor),
            PaintKind::LinearGradient {
                inner_color,
                outer_color,
                ..
            }
            | PaintKind::BoxGradient {
                inner_color,
                outer_color,
                ..
            }
            | PaintKind::RadialGradient {
                inner_color,
                outer_color,
                ..
            } => {
                *inner_color = inner_color.mul_alpha(factor);
                *outer_color = outer_color.mul_alpha(factor);
            }
            PaintKind::ImagePattern { alpha, .. } => *alpha = (*alpha * factor).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_paint_from_color() {
        let paint: Paint = Color::BLACK.into();
        assert_eq!(
            paint.kind,
            PaintKind::SolidColor {
                color: Color::BLACK
            }
        );
        assert!(paint.image().is_none());
    }

    #[test]
    fn test_mul_alpha_scales_both_gradient_stops() {
        let mut paint = Paint::linear_gradient(0.0, 0.0, 0.0, 10.0, Color::WHITE, Color::BLACK);
        paint.mul_alpha(0.5);
        match paint.kind {
            PaintKind::LinearGradient {
                inner_color,
                outer_color,
                ..
            } => {
                assert_eq!(inner_color.a, 0.5);
                assert_eq!(outer_color.a, 0.5);
            }
            _ => panic!("kind changed"),
        }
    }

    #[test]
    fn test_box_gradient_clamps_feather() {
        let paint = Paint::box_gradient(0.0, 0.0, 10.0, 10.0, 2.0, 0.0, Color::WHITE, Color::BLACK);
        match paint.kind {
            PaintKind::BoxGradient { feather, .. } => assert_eq!(feather, 1.0),
            _ => unreachable!(),
        }
    }
}
