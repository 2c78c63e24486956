//! Integration tests for stroke expansion geometry
//!
//! These tests verify that:
//! - Round caps emit the documented vertex budget and lie on the cap circle
//! - Closed strokes form a seamless ring
//! - Join style changes the emitted geometry at corners
//! - Scaled and sub-pixel stroke widths behave as documented

use std::f32::consts::PI;

use sumi_canvas::{BatchRenderer, CallKind, Canvas, Color, LineCap, LineJoin, Vertex};

fn canvas() -> Canvas<BatchRenderer> {
    let mut canvas = Canvas::new(BatchRenderer::new());
    canvas.begin_frame(800.0, 600.0, 1.0);
    canvas
}

/// Arc subdivision count for a half circle of radius `r`, mirroring the
/// expansion's internal formula
fn cap_divs(r: f32, tess_tol: f32) -> usize {
    let da = (r / (r + tess_tol)).acos() * 2.0;
    ((PI / da).ceil() as usize).max(2)
}

fn stroke_verts(canvas: &Canvas<BatchRenderer>) -> Vec<Vertex> {
    let renderer = canvas.renderer();
    let call = &renderer.calls()[0];
    assert_eq!(call.kind, CallKind::Stroke);
    let slice = renderer.paths()[call.path_offset];
    renderer.vertices()[slice.stroke_offset..slice.stroke_offset + slice.stroke_count].to_vec()
}

/// Two-point open path with round caps: exactly two cap fans, no joins
#[test]
fn test_round_cap_vertex_budget() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.stroke_width(10.0);
    canvas.line_cap(LineCap::Round);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(100.0, 0.0);
    canvas.stroke();

    let ncap = cap_divs(5.0, 0.25);
    let verts = stroke_verts(&canvas);
    assert_eq!(verts.len(), 2 * (2 * ncap + 2));
}

/// Round cap fan vertices sit on the circle of the stroke half-width
#[test]
fn test_round_cap_ring_on_radius() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.stroke_width(10.0);
    canvas.line_cap(LineCap::Round);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(100.0, 0.0);
    canvas.stroke();

    let ncap = cap_divs(5.0, 0.25);
    let verts = stroke_verts(&canvas);
    for i in 0..ncap {
        let ring = verts[i * 2];
        let d = (ring.x * ring.x + ring.y * ring.y).sqrt();
        assert!((d - 5.0).abs() < 1e-3, "vertex {i} at distance {d}");
    }
}

/// A closed stroke's strip ends where it began
#[test]
fn test_closed_stroke_is_a_ring() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.stroke_width(4.0);
    canvas.begin_path();
    canvas.rect(20.0, 20.0, 60.0, 60.0);
    canvas.stroke();

    let verts = stroke_verts(&canvas);
    let n = verts.len();
    assert_eq!((verts[0].x, verts[0].y), (verts[n - 2].x, verts[n - 2].y));
    assert_eq!((verts[1].x, verts[1].y), (verts[n - 1].x, verts[n - 1].y));
}

/// Square caps extend the ribbon past the endpoints by the half-width
#[test]
fn test_square_cap_extends_past_endpoint() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.stroke_width(10.0);
    canvas.line_cap(LineCap::Square);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(100.0, 0.0);
    canvas.stroke();

    let verts = stroke_verts(&canvas);
    let minx = verts.iter().map(|v| v.x).fold(f32::MAX, f32::min);
    let maxx = verts.iter().map(|v| v.x).fold(f32::MIN, f32::max);
    assert!((minx + 5.0).abs() < 1e-3);
    assert!((maxx - 105.0).abs() < 1e-3);

    // Butt caps stop at the endpoints
    let mut canvas = self::canvas();
    canvas.shape_anti_alias(false);
    canvas.stroke_width(10.0);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(100.0, 0.0);
    canvas.stroke();

    let verts = stroke_verts(&canvas);
    let minx = verts.iter().map(|v| v.x).fold(f32::MAX, f32::min);
    assert!(minx.abs() < 1e-3);
}

/// A sharp corner under the bevel join emits more vertices than a miter
#[test]
fn test_bevel_join_adds_corner_geometry() {
    let corner = |join: LineJoin| {
        let mut canvas = canvas();
        canvas.shape_anti_alias(false);
        canvas.stroke_width(8.0);
        canvas.line_join(join);
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(50.0, 0.0);
        canvas.line_to(50.0, 50.0);
        canvas.stroke();
        stroke_verts(&canvas).len()
    };

    assert!(corner(LineJoin::Bevel) > corner(LineJoin::Miter));
    assert!(corner(LineJoin::Round) >= corner(LineJoin::Bevel));
}

/// Stroke width is scaled by the transform and clamped overall
#[test]
fn test_stroke_width_scales_with_transform() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.scale(4.0, 4.0);
    canvas.stroke_width(2.0);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(10.0, 0.0);
    canvas.stroke();

    // Device-space half-width is (2 * 4) / 2 = 4
    let verts = stroke_verts(&canvas);
    let maxy = verts.iter().map(|v| v.y).fold(f32::MIN, f32::max);
    let miny = verts.iter().map(|v| v.y).fold(f32::MAX, f32::min);
    assert!((maxy - miny - 8.0).abs() < 1e-3);
}

/// Sub-pixel strokes widen to the fringe width and fade by squared coverage
#[test]
fn test_subpixel_stroke_fades() {
    let mut canvas = canvas();
    canvas.stroke_color(Color::new(1.0, 1.0, 1.0, 1.0));
    canvas.stroke_width(0.5);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(10.0, 0.0);
    canvas.stroke();

    let alpha = canvas.renderer().uniforms()[0].inner_color[3];
    assert!((alpha - 0.25).abs() < 1e-5);
}
