//! Canvas front-end
//!
//! [`Canvas`] owns the render state stack, the path recorder, and the
//! flattening cache, and drives a [`Renderer`] backend. Drawing follows the
//! immediate-mode shape: set style, build a path, `fill` or `stroke`, and
//! `end_frame` once per frame to submit the batch.

use std::f32::consts::PI;

use sumi_core::{
    BlendFactor, Color, CompositeOperation, CompositeState, ImageFlags, ImageId, LineCap,
    LineJoin, Paint, Rect, TextureKind, Transform2D, Vertex, Winding,
};
use tracing::warn;

use crate::cache::{dist_pt_seg, pt_equals, PathCache};
use crate::error::Result;
use crate::path::{CommandRecorder, Verb, KAPPA90};
use crate::renderer::{RenderPath, Renderer};
use crate::state::{RenderState, MAX_STATE_STACK};

/// Retained drawing context over a backend `R`
pub struct Canvas<R: Renderer> {
    renderer: R,
    state: RenderState,
    saved: Vec<RenderState>,
    recorder: CommandRecorder,
    cache: PathCache,
    render_paths: Vec<RenderPath>,
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    tess_tol: f32,
    dist_tol: f32,
    fringe_width: f32,
}

impl<R: Renderer> Canvas<R> {
    pub fn new(renderer: R) -> Self {
        let mut canvas = Self {
            renderer,
            state: RenderState::default(),
            saved: Vec::with_capacity(MAX_STATE_STACK - 1),
            recorder: CommandRecorder::default(),
            cache: PathCache::default(),
            render_paths: Vec::new(),
            width: 0.0,
            height: 0.0,
            device_pixel_ratio: 0.0,
            tess_tol: 0.0,
            dist_tol: 0.0,
            fringe_width: 0.0,
        };
        canvas.set_device_pixel_ratio(1.0);
        canvas
    }

    fn set_device_pixel_ratio(&mut self, ratio: f32) {
        self.tess_tol = 0.25 / ratio;
        self.dist_tol = 0.01 / ratio;
        self.fringe_width = 1.0 / ratio;
        self.device_pixel_ratio = ratio;
    }

    // --- frame lifecycle ---

    /// Start a frame. Resets the state stack and forwards the viewport to
    /// the backend.
    pub fn begin_frame(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.state = RenderState::default();
        self.saved.clear();
        self.width = width;
        self.height = height;
        self.set_device_pixel_ratio(device_pixel_ratio);
        self.renderer.viewport(width, height, device_pixel_ratio);
    }

    /// Submit everything drawn since `begin_frame`
    pub fn end_frame(&mut self) {
        self.renderer.flush();
    }

    /// Discard everything drawn since `begin_frame`
    pub fn cancel_frame(&mut self) {
        self.renderer.cancel();
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    // --- state stack ---

    /// Push a copy of the current state. Beyond the depth limit the push is
    /// dropped and the current state keeps absorbing changes.
    pub fn save(&mut self) {
        if self.saved.len() >= MAX_STATE_STACK - 1 {
            warn!(depth = MAX_STATE_STACK, "state stack full, save ignored");
            return;
        }
        self.saved.push(self.state);
    }

    /// Pop back to the previous saved state. On an empty stack the current
    /// state is left as is.
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => warn!("state stack empty, restore ignored"),
        }
    }

    /// Reset the current state to defaults without touching the stack
    pub fn reset(&mut self) {
        self.state = RenderState::default();
    }

    // --- style ---

    pub fn fill_color(&mut self, color: Color) {
        self.state.fill = Paint::color(color);
    }

    pub fn fill_paint(&mut self, paint: Paint) {
        let mut paint = paint;
        paint.transform.multiply(&self.state.transform);
        self.state.fill = paint;
    }

    pub fn stroke_color(&mut self, color: Color) {
        self.state.stroke = Paint::color(color);
    }

    pub fn stroke_paint(&mut self, paint: Paint) {
        let mut paint = paint;
        paint.transform.multiply(&self.state.transform);
        self.state.stroke = paint;
    }

    pub fn stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    pub fn miter_limit(&mut self, limit: f32) {
        self.state.miter_limit = limit;
    }

    pub fn line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn shape_anti_alias(&mut self, enabled: bool) {
        self.state.shape_anti_alias = enabled;
    }

    pub fn global_composite_operation(&mut self, op: CompositeOperation) {
        self.state.composite = CompositeState::new(op);
    }

    pub fn global_composite_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.global_composite_blend_func_separate(src, dst, src, dst);
    }

    pub fn global_composite_blend_func_separate(
        &mut self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        self.state.composite = CompositeState::separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    }

    pub fn font_size(&mut self, size: f32) {
        self.state.text.font_size = size;
    }

    pub fn letter_spacing(&mut self, spacing: f32) {
        self.state.text.letter_spacing = spacing;
    }

    pub fn line_height(&mut self, height: f32) {
        self.state.text.line_height = height;
    }

    // --- transforms ---

    pub fn reset_transform(&mut self) {
        self.state.transform = Transform2D::identity();
    }

    /// Premultiply an arbitrary matrix onto the current transform
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::new(a, b, c, d, e, f));
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::translation(tx, ty));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::rotation(angle));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::scaling(sx, sy));
    }

    pub fn skew_x(&mut self, angle: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::skew_x(angle));
    }

    pub fn skew_y(&mut self, angle: f32) {
        self.state
            .transform
            .premultiply(&Transform2D::skew_y(angle));
    }

    pub fn current_transform(&self) -> Transform2D {
        self.state.transform
    }

    // --- scissoring ---

    /// Set the scissor to an axis-aligned rectangle in the current
    /// transform space
    pub fn scissor(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let w = width.max(0.0);
        let h = height.max(0.0);
        let mut t = Transform2D::translation(x + w * 0.5, y + h * 0.5);
        t.multiply(&self.state.transform);
        self.state.scissor.transform = t;
        self.state.scissor.extent = Some([w * 0.5, h * 0.5]);
    }

    /// Intersect the current scissor with a rectangle. The stored scissor
    /// is rotation-capable but the intersection happens on conservative
    /// axis-aligned covers, so rotated intersections over-approximate.
    pub fn intersect_scissor(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(extent) = self.state.scissor.extent else {
            self.scissor(x, y, width, height);
            return;
        };

        let Some(inv) = self.state.transform.inverse() else {
            warn!("non-invertible transform, scissor intersection replaced");
            self.scissor(x, y, width, height);
            return;
        };

        // Previous scissor rect expressed in current transform space
        let mut pxform = self.state.scissor.transform;
        pxform.multiply(&inv);
        let ex = extent[0];
        let ey = extent[1];
        let tex = ex * pxform.a.abs() + ey * pxform.c.abs();
        let tey = ex * pxform.b.abs() + ey * pxform.d.abs();

        let prev = Rect::new(pxform.e - tex, pxform.f - tey, tex * 2.0, tey * 2.0);
        let cur = Rect::new(x, y, width, height);
        let isect = prev.intersect(cur);
        self.scissor(isect.x, isect.y, isect.width, isect.height);
    }

    pub fn reset_scissor(&mut self) {
        self.state.scissor = Default::default();
    }

    // --- images ---

    pub fn create_image(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId> {
        self.renderer.create_texture(kind, width, height, flags, data)
    }

    pub fn update_image(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<()> {
        self.renderer.update_texture(image, x, y, width, height, data)
    }

    pub fn delete_image(&mut self, image: ImageId) -> Result<()> {
        self.renderer.delete_texture(image)
    }

    pub fn image_size(&self, image: ImageId) -> Option<(u32, u32)> {
        self.renderer.texture_size(image)
    }

    // --- path building ---

    /// Start a new path, discarding any recorded one
    pub fn begin_path(&mut self) {
        self.recorder.clear();
        self.cache.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.append(&[Verb::MoveTo(x, y)]);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.append(&[Verb::LineTo(x, y)]);
    }

    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.append(&[Verb::BezierTo(c1x, c1y, c2x, c2y, x, y)]);
    }

    /// Quadratic curve, promoted to cubic by the two-thirds rule
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let (x0, y0) = self.recorder.last_point();
        self.append(&[Verb::BezierTo(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        )]);
    }

    /// Circular arc from the previous point towards `(x1, y1)`, leaving
    /// tangent to the segment towards `(x2, y2)`. Degenerate inputs fall
    /// back to a straight line.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        if self.recorder.is_empty() {
            return;
        }
        let (x0, y0) = self.recorder.last_point();

        if pt_equals(x0, y0, x1, y1, self.dist_tol)
            || pt_equals(x1, y1, x2, y2, self.dist_tol)
            || dist_pt_seg(x1, y1, x0, y0, x2, y2) < self.dist_tol * self.dist_tol
            || radius < self.dist_tol
        {
            self.line_to(x1, y1);
            return;
        }

        let mut dx0 = x0 - x1;
        let mut dy0 = y0 - y1;
        let mut dx1 = x2 - x1;
        let mut dy1 = y2 - y1;
        crate::cache::normalize(&mut dx0, &mut dy0);
        crate::cache::normalize(&mut dx1, &mut dy1);
        let a = (dx0 * dx1 + dy0 * dy1).acos();
        let d = radius / (a * 0.5).tan();

        if d > 10000.0 {
            self.line_to(x1, y1);
            return;
        }

        let (cx, cy, a0, a1, dir) = if dx1 * dy0 - dx0 * dy1 > 0.0 {
            (
                x1 + dx0 * d + dy0 * radius,
                y1 + dy0 * d - dx0 * radius,
                dx0.atan2(-dy0),
                (-dx1).atan2(dy1),
                Winding::Cw,
            )
        } else {
            (
                x1 + dx0 * d - dy0 * radius,
                y1 + dy0 * d + dx0 * radius,
                (-dx0).atan2(dy0),
                dx1.atan2(-dy1),
                Winding::Ccw,
            )
        };

        self.arc(cx, cy, radius, a0, a1, dir);
    }

    /// Circular arc around `(cx, cy)`. Extends the current sub-path with a
    /// line join when one exists, otherwise starts a new sub-path.
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, a0: f32, a1: f32, dir: Winding) {
        let mut da = a1 - a0;
        match dir {
            Winding::Cw => {
                if da.abs() >= PI * 2.0 {
                    da = PI * 2.0;
                } else {
                    while da < 0.0 {
                        da += PI * 2.0;
                    }
                }
            }
            Winding::Ccw => {
                if da.abs() >= PI * 2.0 {
                    da = -PI * 2.0;
                } else {
                    while da > 0.0 {
                        da -= PI * 2.0;
                    }
                }
            }
        }

        // One cubic per quadrant (max five to cover a full sweep)
        let ndivs = ((da.abs() / (PI * 0.5) + 0.5) as i32).clamp(1, 5);
        let hda = (da / ndivs as f32) / 2.0;
        let mut kappa = (4.0 / 3.0 * (1.0 - hda.cos()) / hda.sin()).abs();
        if dir == Winding::Ccw {
            kappa = -kappa;
        }

        let mut verbs: Vec<Verb> = Vec::with_capacity(ndivs as usize + 1);
        let mut px = 0.0;
        let mut py = 0.0;
        let mut ptanx = 0.0;
        let mut ptany = 0.0;
        for i in 0..=ndivs {
            let a = a0 + da * (i as f32 / ndivs as f32);
            let dx = a.cos();
            let dy = a.sin();
            let x = cx + dx * radius;
            let y = cy + dy * radius;
            let tanx = -dy * radius * kappa;
            let tany = dx * radius * kappa;

            if i == 0 {
                if self.recorder.is_empty() {
                    verbs.push(Verb::MoveTo(x, y));
                } else {
                    verbs.push(Verb::LineTo(x, y));
                }
            } else {
                verbs.push(Verb::BezierTo(
                    px + ptanx,
                    py + ptany,
                    x - tanx,
                    y - tany,
                    x,
                    y,
                ));
            }
            px = x;
            py = y;
            ptanx = tanx;
            ptany = tany;
        }
        self.append(&verbs);
    }

    pub fn close_path(&mut self) {
        self.append(&[Verb::Close]);
    }

    /// Set the winding (solidity) of the current sub-path
    pub fn path_winding(&mut self, dir: impl Into<Winding>) {
        self.append(&[Verb::Winding(dir.into())]);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.append(&[
            Verb::MoveTo(x, y),
            Verb::LineTo(x, y + height),
            Verb::LineTo(x + width, y + height),
            Verb::LineTo(x + width, y),
            Verb::Close,
        ]);
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.rounded_rect_varying(x, y, width, height, radius, radius, radius, radius);
    }

    /// Rounded rectangle with an independent radius per corner. Radii are
    /// clamped to the half extents; all-tiny radii degrade to a plain rect.
    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rad_top_left: f32,
        rad_top_right: f32,
        rad_bottom_right: f32,
        rad_bottom_left: f32,
    ) {
        if rad_top_left < 0.1 && rad_top_right < 0.1 && rad_bottom_right < 0.1
            && rad_bottom_left < 0.1
        {
            self.rect(x, y, width, height);
            return;
        }

        let halfw = width.abs() * 0.5;
        let halfh = height.abs() * 0.5;
        let sign_w = width.signum();
        let sign_h = height.signum();
        let rad_bottom_left = rad_bottom_left.max(0.0);
        let rad_bottom_right = rad_bottom_right.max(0.0);
        let rad_top_right = rad_top_right.max(0.0);
        let rad_top_left = rad_top_left.max(0.0);
        let rx_bl = rad_bottom_left.min(halfw) * sign_w;
        let ry_bl = rad_bottom_left.min(halfh) * sign_h;
        let rx_br = rad_bottom_right.min(halfw) * sign_w;
        let ry_br = rad_bottom_right.min(halfh) * sign_h;
        let rx_tr = rad_top_right.min(halfw) * sign_w;
        let ry_tr = rad_top_right.min(halfh) * sign_h;
        let rx_tl = rad_top_left.min(halfw) * sign_w;
        let ry_tl = rad_top_left.min(halfh) * sign_h;
        let k = 1.0 - KAPPA90;

        self.append(&[
            Verb::MoveTo(x, y + ry_tl),
            Verb::LineTo(x, y + height - ry_bl),
            Verb::BezierTo(
                x,
                y + height - ry_bl * k,
                x + rx_bl * k,
                y + height,
                x + rx_bl,
                y + height,
            ),
            Verb::LineTo(x + width - rx_br, y + height),
            Verb::BezierTo(
                x + width - rx_br * k,
                y + height,
                x + width,
                y + height - ry_br * k,
                x + width,
                y + height - ry_br,
            ),
            Verb::LineTo(x + width, y + ry_tr),
            Verb::BezierTo(
                x + width,
                y + ry_tr * k,
                x + width - rx_tr * k,
                y,
                x + width - rx_tr,
                y,
            ),
            Verb::LineTo(x + rx_tl, y),
            Verb::BezierTo(x + rx_tl * k, y, x, y + ry_tl * k, x, y + ry_tl),
            Verb::Close,
        ]);
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.append(&[
            Verb::MoveTo(cx - rx, cy),
            Verb::BezierTo(
                cx - rx,
                cy + ry * KAPPA90,
                cx - rx * KAPPA90,
                cy + ry,
                cx,
                cy + ry,
            ),
            Verb::BezierTo(
                cx + rx * KAPPA90,
                cy + ry,
                cx + rx,
                cy + ry * KAPPA90,
                cx + rx,
                cy,
            ),
            Verb::BezierTo(
                cx + rx,
                cy - ry * KAPPA90,
                cx + rx * KAPPA90,
                cy - ry,
                cx,
                cy - ry,
            ),
            Verb::BezierTo(
                cx - rx * KAPPA90,
                cy - ry,
                cx - rx,
                cy - ry * KAPPA90,
                cx - rx,
                cy,
            ),
            Verb::Close,
        ]);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.ellipse(cx, cy, radius, radius);
    }

    fn append(&mut self, verbs: &[Verb]) {
        self.recorder.append(verbs, &self.state.transform);
    }

    // --- rendering ---

    /// Fill the recorded path with the current fill paint
    pub fn fill(&mut self) {
        let state = self.state;
        let mut paint = state.fill;
        paint.mul_alpha(state.alpha);

        let fringe = if state.shape_anti_alias {
            self.fringe_width
        } else {
            0.0
        };

        self.cache
            .flatten(self.recorder.verbs(), self.tess_tol, self.dist_tol);
        self.cache.expand_fill(fringe, LineJoin::Miter, 2.4);

        self.collect_render_paths();
        self.renderer.fill(
            &paint,
            state.composite,
            &state.scissor,
            self.fringe_width,
            self.cache.bounds,
            &self.cache.vertices,
            &self.render_paths,
        );
    }

    /// Stroke the recorded path with the current stroke paint
    pub fn stroke(&mut self) {
        let state = self.state;
        let scale = state.transform.average_scale();
        let mut stroke_width = (state.stroke_width * scale).clamp(0.0, 200.0);
        let mut paint = state.stroke;

        // Sub-pixel strokes keep the fringe width and fade by coverage
        if stroke_width < self.fringe_width {
            let coverage = (stroke_width / self.fringe_width).clamp(0.0, 1.0);
            paint.mul_alpha(coverage * coverage);
            stroke_width = self.fringe_width;
        }
        paint.mul_alpha(state.alpha);

        let fringe = if state.shape_anti_alias {
            self.fringe_width
        } else {
            0.0
        };

        self.cache
            .flatten(self.recorder.verbs(), self.tess_tol, self.dist_tol);
        self.cache.expand_stroke(
            stroke_width * 0.5,
            fringe,
            state.line_cap,
            state.line_join,
            state.miter_limit,
            self.tess_tol,
        );

        self.collect_render_paths();
        self.renderer.stroke(
            &paint,
            state.composite,
            &state.scissor,
            self.fringe_width,
            stroke_width,
            &self.cache.vertices,
            &self.render_paths,
        );
    }

    /// Draw pre-built textured triangles (glyph quads) with the fill paint
    pub fn triangles(&mut self, verts: &[Vertex]) {
        let state = self.state;
        let mut paint = state.fill;
        paint.mul_alpha(state.alpha);
        self.renderer
            .triangles(&paint, state.composite, &state.scissor, verts);
    }

    fn collect_render_paths(&mut self) {
        self.render_paths.clear();
        self.render_paths
            .extend(self.cache.paths.iter().map(|p| RenderPath {
                fill: p.fill.clone(),
                stroke: p.stroke.clone(),
                convex: p.convex,
            }));
    }

    // --- backend access ---

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
