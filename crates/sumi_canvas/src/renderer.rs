//! Backend abstraction
//!
//! A [`Renderer`] receives expanded vertex geometry plus resolved paint
//! state and turns it into draw work. [`Params`] is the per-draw fragment
//! uniform block, laid out as plain `f32`s so backends can upload it with
//! bytemuck without a translation step.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use sumi_core::{
    Bounds, Color, CompositeState, ImageFlags, ImageId, Paint, PaintKind, Scissor, TextureKind,
    Transform2D, Vertex,
};

use crate::error::Result;

/// Vertex ranges for one expanded sub-path, indexing the frame vertex slice
#[derive(Clone, Debug, Default)]
pub struct RenderPath {
    /// Triangle-fan fill shell
    pub fill: Range<usize>,
    /// Triangle-strip fringe or stroke ribbon
    pub stroke: Range<usize>,
    /// Single convex sub-path; the backend may skip the stencil pass
    pub convex: bool,
}

/// Fragment shader selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    FillGradient,
    FillImage,
    Stencil,
    Image,
}

impl ShaderKind {
    fn to_f32(self) -> f32 {
        match self {
            ShaderKind::FillGradient => 0.0,
            ShaderKind::FillImage => 1.0,
            ShaderKind::Stencil => 2.0,
            ShaderKind::Image => 3.0,
        }
    }
}

/// Texture sampling mode baked into the uniforms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TexType {
    None,
    RgbaPremultiplied,
    Rgba,
    Alpha,
}

impl TexType {
    fn to_f32(self) -> f32 {
        match self {
            TexType::None => 0.0,
            TexType::RgbaPremultiplied => 0.0,
            TexType::Rgba => 1.0,
            TexType::Alpha => 2.0,
        }
    }
}

/// Per-draw fragment uniforms, std140-friendly flat float layout
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Params {
    pub scissor_mat: [f32; 12],
    pub paint_mat: [f32; 12],
    pub inner_color: [f32; 4],
    pub outer_color: [f32; 4],
    pub scissor_ext: [f32; 2],
    pub scissor_scale: [f32; 2],
    pub extent: [f32; 2],
    pub radius: f32,
    pub feather: f32,
    pub stroke_mult: f32,
    pub stroke_thr: f32,
    pub tex_type: f32,
    pub shader_kind: f32,
}

impl Params {
    /// Resolve a paint and scissor into uniforms. `texture` is the looked-up
    /// record for an image paint, `None` when the paint's image is missing
    /// (the draw then falls back to flat color).
    pub fn new(
        paint: &Paint,
        scissor: &Scissor,
        texture: Option<(TextureKind, ImageFlags)>,
        stroke_width: f32,
        fringe: f32,
        stroke_thr: f32,
    ) -> Self {
        let mut params = Params {
            stroke_thr,
            ..Params::default()
        };

        match scissor.extent {
            Some(ext) if ext[0] >= -0.5 && ext[1] >= -0.5 => {
                let inv = scissor.transform.inverse().unwrap_or_default();
                params.scissor_mat = inv.to_mat3x4();
                params.scissor_ext = ext;
                let t = &scissor.transform;
                params.scissor_scale = [
                    (t.a * t.a + t.c * t.c).sqrt() / fringe,
                    (t.b * t.b + t.d * t.d).sqrt() / fringe,
                ];
            }
            _ => {
                params.scissor_ext = [1.0, 1.0];
                params.scissor_scale = [1.0, 1.0];
            }
        }

        params.stroke_mult = (stroke_width * 0.5 + fringe * 0.5) / fringe;

        // Gradient-space transform, composed in front of the paint transform
        // which already carries the canvas state
        let mut local = Transform2D::identity();
        match paint.kind {
            PaintKind::SolidColor { color } => {
                params.inner_color = color.premultiplied().to_array();
                params.outer_color = params.inner_color;
                params.radius = 0.0;
                params.feather = 1.0;
                params.shader_kind = ShaderKind::FillGradient.to_f32();
            }
            PaintKind::LinearGradient {
                start,
                end,
                inner_color,
                outer_color,
            } => {
                // Degenerate span keeps the math finite by faking a huge
                // gradient box
                const LARGE: f32 = 1e5;
                let mut dx = end.0 - start.0;
                let mut dy = end.1 - start.1;
                let d = (dx * dx + dy * dy).sqrt();
                if d > 1e-4 {
                    dx /= d;
                    dy /= d;
                } else {
                    dx = 0.0;
                    dy = 1.0;
                }
                local = Transform2D::new(
                    dy,
                    -dx,
                    dx,
                    dy,
                    start.0 - dx * LARGE,
                    start.1 - dy * LARGE,
                );
                params.extent = [LARGE, LARGE + d * 0.5];
                params.radius = 0.0;
                params.feather = d.max(1.0);
                params.inner_color = inner_color.premultiplied().to_array();
                params.outer_color = outer_color.premultiplied().to_array();
                params.shader_kind = ShaderKind::FillGradient.to_f32();
            }
            PaintKind::BoxGradient {
                x,
                y,
                width,
                height,
                radius,
                feather,
                inner_color,
                outer_color,
            } => {
                local = Transform2D::translation(x + width * 0.5, y + height * 0.5);
                params.extent = [width * 0.5, height * 0.5];
                params.radius = radius;
                params.feather = feather.max(1.0);
                params.inner_color = inner_color.premultiplied().to_array();
                params.outer_color = outer_color.premultiplied().to_array();
                params.shader_kind = ShaderKind::FillGradient.to_f32();
            }
            PaintKind::RadialGradient {
                center,
                inner_radius,
                outer_radius,
                inner_color,
                outer_color,
            } => {
                let r = (inner_radius + outer_radius) * 0.5;
                local = Transform2D::translation(center.0, center.1);
                params.extent = [r, r];
                params.radius = r;
                params.feather = (outer_radius - inner_radius).max(1.0);
                params.inner_color = inner_color.premultiplied().to_array();
                params.outer_color = outer_color.premultiplied().to_array();
                params.shader_kind = ShaderKind::FillGradient.to_f32();
            }
            PaintKind::ImagePattern {
                origin,
                width,
                height,
                angle,
                alpha,
                ..
            } => {
                local = Transform2D::rotation(angle);
                local.e = origin.0;
                local.f = origin.1;
                params.extent = [width, height];
                let color = Color::new(1.0, 1.0, 1.0, alpha);
                params.inner_color = color.premultiplied().to_array();
                params.outer_color = params.inner_color;
                match texture {
                    Some((kind, flags)) => {
                        params.shader_kind = ShaderKind::FillImage.to_f32();
                        params.tex_type = match kind {
                            TextureKind::Rgba if flags.premultiplied => {
                                TexType::RgbaPremultiplied.to_f32()
                            }
                            TextureKind::Rgba => TexType::Rgba.to_f32(),
                            TextureKind::Alpha => TexType::Alpha.to_f32(),
                        };
                    }
                    None => {
                        params.shader_kind = ShaderKind::FillGradient.to_f32();
                        params.radius = 0.0;
                        params.feather = 1.0;
                    }
                }
            }
        }

        let mut composed = local;
        composed.multiply(&paint.transform);
        params.paint_mat = composed.inverse().unwrap_or_default().to_mat3x4();

        params
    }

    /// Uniforms for the stencil pass of a non-convex fill: geometry only,
    /// color output disabled by the shader kind
    pub fn stencil(stroke_thr: f32) -> Self {
        Params {
            stroke_thr,
            shader_kind: ShaderKind::Stencil.to_f32(),
            ..Params::default()
        }
    }

    /// Replace the shader with the plain textured-triangle variant
    pub fn with_image_shader(mut self) -> Self {
        self.shader_kind = ShaderKind::Image.to_f32();
        self
    }
}


/// Device backend fed by [`Canvas`](crate::Canvas)
pub trait Renderer {
    /// Allocate a texture, returning its handle
    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId>;

    /// Upload a sub-rectangle of pixel data
    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<()>;

    fn delete_texture(&mut self, image: ImageId) -> Result<()>;

    fn texture_size(&self, image: ImageId) -> Option<(u32, u32)>;

    /// Frame began with the given target size and pixel ratio
    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32);

    /// Discard everything recorded since the last flush
    fn cancel(&mut self);

    /// Submit recorded work for the frame
    fn flush(&mut self);

    #[allow(clippy::too_many_arguments)]
    fn fill(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        verts: &[Vertex],
        paths: &[RenderPath],
    );

    #[allow(clippy::too_many_arguments)]
    fn stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        verts: &[Vertex],
        paths: &[RenderPath],
    );

    /// Raw textured triangles (glyph quads and other pre-built geometry)
    fn triangles(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        verts: &[Vertex],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_params_premultiplied() {
        let paint = Paint::color(Color::new(1.0, 0.5, 0.0, 0.5));
        let params = Params::new(&paint, &Scissor::default(), None, 1.0, 1.0, -1.0);
        assert_eq!(params.inner_color, [0.5, 0.25, 0.0, 0.5]);
        assert_eq!(params.inner_color, params.outer_color);
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.feather, 1.0);
        assert_eq!(params.shader_kind, 0.0);
    }

    #[test]
    fn test_disabled_scissor_neutral_uniforms() {
        let paint = Paint::color(Color::WHITE);
        let params = Params::new(&paint, &Scissor::default(), None, 1.0, 1.0, -1.0);
        assert_eq!(params.scissor_ext, [1.0, 1.0]);
        assert_eq!(params.scissor_scale, [1.0, 1.0]);
        assert_eq!(params.scissor_mat, [0.0; 12]);
    }

    #[test]
    fn test_radial_gradient_radius_feather() {
        let paint = Paint::radial_gradient(10.0, 20.0, 5.0, 15.0, Color::WHITE, Color::BLACK);
        let params = Params::new(&paint, &Scissor::default(), None, 1.0, 1.0, -1.0);
        assert_eq!(params.radius, 10.0);
        assert_eq!(params.feather, 10.0);
        assert_eq!(params.extent, [10.0, 10.0]);
    }

    #[test]
    fn test_stroke_mult_formula() {
        let paint = Paint::color(Color::WHITE);
        let params = Params::new(&paint, &Scissor::default(), None, 3.0, 1.0, -1.0);
        assert_eq!(params.stroke_mult, 2.0);
    }

    #[test]
    fn test_image_paint_without_texture_falls_back() {
        let mut images = slotmap::SlotMap::<ImageId, ()>::with_key();
        let id = images.insert(());
        let paint = Paint::image_pattern(0.0, 0.0, 32.0, 32.0, 0.0, id, 1.0);
        let params = Params::new(&paint, &Scissor::default(), None, 1.0, 1.0, -1.0);
        assert_eq!(params.shader_kind, ShaderKind::FillGradient.to_f32());
    }
}
