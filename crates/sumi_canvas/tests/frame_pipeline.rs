//! Integration tests for the record -> flatten -> expand -> batch pipeline
//!
//! These tests verify that:
//! - Simple convex shapes take the single-pass fill route
//! - Hole-punched shapes fall back to the stencil fill route with a cover quad
//! - Frame lifecycle clears the pools while textures survive
//! - State (alpha, scissor, composite) lands in the recorded uniforms

use sumi_canvas::{
    BatchRenderer, CallKind, Canvas, Color, CompositeOperation, ImageFlags, RendererError,
    Solidity, TextureKind,
};

fn canvas() -> Canvas<BatchRenderer> {
    let mut canvas = Canvas::new(BatchRenderer::new());
    canvas.begin_frame(800.0, 600.0, 1.0);
    canvas
}

/// A plain rectangle is convex: one call, one path, no stencil quad
#[test]
fn test_rect_fill_takes_convex_route() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(10.0, 10.0, 50.0, 50.0);
    canvas.fill();

    let renderer = canvas.renderer();
    assert_eq!(renderer.calls().len(), 1);
    let call = &renderer.calls()[0];
    assert_eq!(call.kind, CallKind::ConvexFill);
    assert_eq!(call.path_count, 1);
    assert_eq!(call.triangle_count, 0);
    assert_eq!(renderer.uniforms().len(), 1);
}

/// With anti-aliasing off the fill shell is exactly the flattened corners
#[test]
fn test_aliased_rect_fill_vertices_are_corners() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.begin_path();
    canvas.rect(10.0, 10.0, 50.0, 50.0);
    canvas.fill();

    let renderer = canvas.renderer();
    let slice = renderer.paths()[renderer.calls()[0].path_offset];
    assert_eq!(slice.fill_count, 4);
    assert_eq!(slice.stroke_count, 0);

    let shell = &renderer.vertices()[slice.fill_offset..slice.fill_offset + 4];
    let minx = shell.iter().map(|v| v.x).fold(f32::MAX, f32::min);
    let maxx = shell.iter().map(|v| v.x).fold(f32::MIN, f32::max);
    let miny = shell.iter().map(|v| v.y).fold(f32::MAX, f32::min);
    let maxy = shell.iter().map(|v| v.y).fold(f32::MIN, f32::max);
    assert_eq!((minx, miny, maxx, maxy), (10.0, 10.0, 60.0, 60.0));
}

/// A rect with a hole punched by a reversed circle needs the stencil route,
/// and the cover quad spans the combined bounds
#[test]
fn test_hole_fill_takes_stencil_route() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 100.0, 100.0);
    canvas.circle(50.0, 50.0, 20.0);
    canvas.path_winding(Solidity::Hole);
    canvas.fill();

    let renderer = canvas.renderer();
    let call = &renderer.calls()[0];
    assert_eq!(call.kind, CallKind::Fill);
    assert_eq!(call.path_count, 2);
    assert_eq!(call.triangle_count, 4);
    // Stencil pass + fill pass
    assert_eq!(renderer.uniforms().len(), 2);

    let quad = &renderer.vertices()[call.triangle_offset..call.triangle_offset + 4];
    let minx = quad.iter().map(|v| v.x).fold(f32::MAX, f32::min);
    let maxy = quad.iter().map(|v| v.y).fold(f32::MIN, f32::max);
    assert!(minx <= 0.0 + 1.0);
    assert!(maxy >= 100.0 - 1.0);
}

/// Transform at record time: translate before building the path moves the
/// device-space geometry, and resetting afterwards does not
#[test]
fn test_transform_applies_at_record_time() {
    let mut canvas = canvas();
    canvas.shape_anti_alias(false);
    canvas.translate(100.0, 0.0);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.reset_transform();
    canvas.fill();

    let renderer = canvas.renderer();
    let slice = renderer.paths()[renderer.calls()[0].path_offset];
    let shell = &renderer.vertices()[slice.fill_offset..slice.fill_offset + 4];
    assert!(shell.iter().all(|v| v.x >= 100.0));
}

/// Global alpha multiplies into the premultiplied uniform colors
#[test]
fn test_global_alpha_lands_in_uniforms() {
    let mut canvas = canvas();
    canvas.fill_color(Color::new(1.0, 1.0, 1.0, 1.0));
    canvas.global_alpha(0.5);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();

    let uniforms = canvas.renderer().uniforms();
    assert_eq!(uniforms[0].inner_color, [0.5, 0.5, 0.5, 0.5]);
}

/// Scissor extent and composite operation travel with the call
#[test]
fn test_scissor_and_composite_recorded() {
    let mut canvas = canvas();
    canvas.scissor(0.0, 0.0, 40.0, 20.0);
    canvas.global_composite_operation(CompositeOperation::Lighter);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();

    let renderer = canvas.renderer();
    assert_eq!(renderer.uniforms()[0].scissor_ext, [20.0, 10.0]);
    assert_ne!(
        renderer.calls()[0].composite,
        sumi_canvas::CompositeState::default()
    );
}

/// Filling an empty path is a no-op all the way down
#[test]
fn test_empty_path_fill_is_noop() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.fill();

    assert!(canvas.renderer().calls().is_empty());
    assert!(canvas.renderer().vertices().is_empty());
    assert!(canvas.renderer().uniforms().is_empty());
}

/// end_frame drains the pools; cancel_frame discards without counting
#[test]
fn test_frame_lifecycle() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();
    assert_eq!(canvas.renderer().calls().len(), 1);

    canvas.end_frame();
    assert!(canvas.renderer().calls().is_empty());
    assert!(canvas.renderer().vertices().is_empty());
    assert_eq!(canvas.renderer().frame_count(), 1);

    canvas.begin_frame(800.0, 600.0, 1.0);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();
    canvas.cancel_frame();
    assert!(canvas.renderer().calls().is_empty());
    assert_eq!(canvas.renderer().frame_count(), 1);
}

/// Textures are frame-independent and validated on update
#[test]
fn test_image_lifecycle_through_canvas() {
    let mut canvas = canvas();
    let image = canvas
        .create_image(TextureKind::Rgba, 4, 4, ImageFlags::default(), Some(&[0u8; 64]))
        .unwrap();
    assert_eq!(canvas.image_size(image), Some((4, 4)));

    canvas.end_frame();
    assert_eq!(canvas.image_size(image), Some((4, 4)));

    let err = canvas.update_image(image, 3, 3, 2, 2, &[0u8; 16]).unwrap_err();
    assert!(matches!(err, RendererError::UpdateOutOfBounds { .. }));

    canvas.delete_image(image).unwrap();
    assert!(matches!(
        canvas.delete_image(image),
        Err(RendererError::ImageNotFound)
    ));
}

/// Deep save/restore does not corrupt the base state
#[test]
fn test_unbalanced_save_restore_is_harmless() {
    let mut canvas = canvas();
    canvas.fill_color(Color::new(1.0, 0.0, 0.0, 1.0));
    for _ in 0..40 {
        canvas.save();
    }
    for _ in 0..40 {
        canvas.restore();
    }
    // Base state still holds: drawing uses opaque red
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();
    assert_eq!(
        canvas.renderer().uniforms()[0].inner_color,
        [1.0, 0.0, 0.0, 1.0]
    );
}
