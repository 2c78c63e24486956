//! Draw-call batching
//!
//! [`BatchRenderer`] records the frame into growable pools of calls,
//! vertices, path slices, and uniform blocks. A GPU backend drains the
//! pools after `flush`; tests inspect them directly. Pool capacity
//! survives across frames so a steady-state frame allocates nothing.

use slotmap::SlotMap;
use sumi_core::{
    Bounds, CompositeState, ImageFlags, ImageId, Paint, Scissor, TextureKind, Vertex,
};

use crate::cache::reserve_geometric;
use crate::error::{RendererError, Result};
use crate::renderer::{Params, RenderPath, Renderer};

/// How a recorded call should be drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// Stencil pass over the shells, then a cover quad
    Fill,
    /// Single convex shape, fan drawn directly
    ConvexFill,
    Stroke,
    Triangles,
}

/// One recorded draw call, indexing into the shared pools
#[derive(Clone, Debug)]
pub struct Call {
    pub kind: CallKind,
    pub image: Option<ImageId>,
    pub path_offset: usize,
    pub path_count: usize,
    pub triangle_offset: usize,
    pub triangle_count: usize,
    pub uniform_offset: usize,
    pub composite: CompositeState,
}

/// Vertex ranges of one sub-path within the pooled vertex buffer
#[derive(Clone, Copy, Debug, Default)]
pub struct PathSlice {
    pub fill_offset: usize,
    pub fill_count: usize,
    pub stroke_offset: usize,
    pub stroke_count: usize,
}

#[derive(Clone, Copy, Debug)]
struct TextureRecord {
    kind: TextureKind,
    width: u32,
    height: u32,
    flags: ImageFlags,
}

impl TextureRecord {
    fn bytes_per_pixel(&self) -> usize {
        match self.kind {
            TextureKind::Rgba => 4,
            TextureKind::Alpha => 1,
        }
    }
}

/// Recording renderer: owns texture handles and the per-frame pools
#[derive(Default)]
pub struct BatchRenderer {
    textures: SlotMap<ImageId, TextureRecord>,
    calls: Vec<Call>,
    paths: Vec<PathSlice>,
    vertices: Vec<Vertex>,
    uniforms: Vec<Params>,
    view: (f32, f32),
    device_pixel_ratio: f32,
    frames: u64,
}

impl BatchRenderer {
    pub fn new() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn paths(&self) -> &[PathSlice] {
        &self.paths
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn uniforms(&self) -> &[Params] {
        &self.uniforms
    }

    pub fn view(&self) -> (f32, f32) {
        self.view
    }

    /// Frames flushed since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn texture(&self, image: ImageId) -> Result<&TextureRecord> {
        self.textures.get(image).ok_or(RendererError::ImageNotFound)
    }

    fn paint_texture(&self, paint: &Paint) -> Option<(TextureKind, ImageFlags)> {
        let id = paint.image()?;
        self.textures.get(id).map(|t| (t.kind, t.flags))
    }

    /// Copy sub-path vertex ranges into the pools, rebasing them onto the
    /// pooled vertex buffer
    fn append_paths(&mut self, verts: &[Vertex], paths: &[RenderPath]) -> (usize, usize) {
        let total: usize = paths.iter().map(|p| p.fill.len() + p.stroke.len()).sum();
        reserve_geometric(&mut self.vertices, total);
        reserve_geometric(&mut self.paths, paths.len());

        let path_offset = self.paths.len();
        for path in paths {
            let fill_offset = self.vertices.len();
            self.vertices.extend_from_slice(&verts[path.fill.clone()]);
            let stroke_offset = self.vertices.len();
            self.vertices.extend_from_slice(&verts[path.stroke.clone()]);
            self.paths.push(PathSlice {
                fill_offset,
                fill_count: path.fill.len(),
                stroke_offset,
                stroke_count: path.stroke.len(),
            });
        }
        (path_offset, paths.len())
    }

    fn clear_pools(&mut self) {
        self.calls.clear();
        self.paths.clear();
        self.vertices.clear();
        self.uniforms.clear();
    }
}

impl Renderer for BatchRenderer {
    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId> {
        let record = TextureRecord {
            kind,
            width,
            height,
            flags,
        };
        if let Some(data) = data {
            let expected = width as usize * height as usize * record.bytes_per_pixel();
            if data.len() != expected {
                return Err(RendererError::PixelSizeMismatch {
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(self.textures.insert(record))
    }

    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<()> {
        let record = *self.texture(image)?;
        // checked_add: the rectangle edges must not wrap around u32
        let in_bounds = match (x.checked_add(width), y.checked_add(height)) {
            (Some(x_end), Some(y_end)) => x_end <= record.width && y_end <= record.height,
            _ => false,
        };
        if !in_bounds {
            return Err(RendererError::UpdateOutOfBounds {
                x,
                y,
                width,
                height,
                tex_width: record.width,
                tex_height: record.height,
            });
        }
        let expected = width as usize * height as usize * record.bytes_per_pixel();
        if data.len() != expected {
            return Err(RendererError::PixelSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }

    fn delete_texture(&mut self, image: ImageId) -> Result<()> {
        self.textures
            .remove(image)
            .map(|_| ())
            .ok_or(RendererError::ImageNotFound)
    }

    fn texture_size(&self, image: ImageId) -> Option<(u32, u32)> {
        self.textures.get(image).map(|t| (t.width, t.height))
    }

    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.view = (width, height);
        self.device_pixel_ratio = device_pixel_ratio;
    }

    fn cancel(&mut self) {
        self.clear_pools();
    }

    fn flush(&mut self) {
        self.frames += 1;
        tracing::debug!(
            frame = self.frames,
            calls = self.calls.len(),
            paths = self.paths.len(),
            vertices = self.vertices.len(),
            uniforms = self.uniforms.len(),
            "frame flushed"
        );
        self.clear_pools();
    }

    fn fill(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        verts: &[Vertex],
        paths: &[RenderPath],
    ) {
        // An empty path never reached the expanders; record nothing
        if paths.is_empty() {
            return;
        }

        let convex = paths.len() == 1 && paths[0].convex;
        let kind = if convex {
            CallKind::ConvexFill
        } else {
            CallKind::Fill
        };

        let (path_offset, path_count) = self.append_paths(verts, paths);

        // Non-convex fills cover with a bounds quad after the stencil pass
        let (triangle_offset, triangle_count) = if convex {
            (self.vertices.len(), 0)
        } else {
            reserve_geometric(&mut self.vertices, 4);
            let offset = self.vertices.len();
            self.vertices.push(Vertex::new(bounds.maxx, bounds.maxy, 0.5, 1.0));
            self.vertices.push(Vertex::new(bounds.maxx, bounds.miny, 0.5, 1.0));
            self.vertices.push(Vertex::new(bounds.minx, bounds.maxy, 0.5, 1.0));
            self.vertices.push(Vertex::new(bounds.minx, bounds.miny, 0.5, 1.0));
            (offset, 4)
        };

        let texture = self.paint_texture(paint);
        let uniform_offset = self.uniforms.len();
        if convex {
            self.uniforms
                .push(Params::new(paint, scissor, texture, fringe, fringe, -1.0));
        } else {
            self.uniforms.push(Params::stencil(-1.0));
            self.uniforms
                .push(Params::new(paint, scissor, texture, fringe, fringe, -1.0));
        }

        self.calls.push(Call {
            kind,
            image: paint.image(),
            path_offset,
            path_count,
            triangle_offset,
            triangle_count,
            uniform_offset,
            composite,
        });
    }

    fn stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        verts: &[Vertex],
        paths: &[RenderPath],
    ) {
        let (path_offset, path_count) = self.append_paths(verts, paths);
        let texture = self.paint_texture(paint);

        // First block draws the body, second re-draws with the threshold
        // raised for stencil-based overlap removal
        let uniform_offset = self.uniforms.len();
        self.uniforms.push(Params::new(
            paint,
            scissor,
            texture,
            stroke_width,
            fringe,
            -1.0,
        ));
        self.uniforms.push(Params::new(
            paint,
            scissor,
            texture,
            stroke_width,
            fringe,
            1.0 - 0.5 / 255.0,
        ));

        self.calls.push(Call {
            kind: CallKind::Stroke,
            image: paint.image(),
            path_offset,
            path_count,
            triangle_offset: 0,
            triangle_count: 0,
            uniform_offset,
            composite,
        });
    }

    fn triangles(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        verts: &[Vertex],
    ) {
        reserve_geometric(&mut self.vertices, verts.len());
        let triangle_offset = self.vertices.len();
        self.vertices.extend_from_slice(verts);

        let texture = self.paint_texture(paint);
        let uniform_offset = self.uniforms.len();
        self.uniforms.push(
            Params::new(paint, scissor, texture, 1.0, 1.0, -1.0).with_image_shader(),
        );

        self.calls.push(Call {
            kind: CallKind::Triangles,
            image: paint.image(),
            path_offset: 0,
            path_count: 0,
            triangle_offset,
            triangle_count: verts.len(),
            uniform_offset,
            composite,
        });
    }
}
