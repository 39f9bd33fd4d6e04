use glam::Vec2;

use super::*;
use crate::image::{Color, Image};

fn lit_bounds(img: &Image, color: Color) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..img.height() {
        for x in 0..img.width() {
            let p = img.pixel(x, y);
            let target = color.to_rgb();
            if p.iter().zip(target.iter()).all(|(a, b)| (a - b).abs() < 1e-4) {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
    }
    bounds
}

// ---------------------------------------------------------------------------
// ImageCanvas
// ---------------------------------------------------------------------------

#[test]
fn test_image_canvas_rejects_empty_image() {
    let mut img = Image::new_black(0, 5);
    let err = ImageCanvas::new(&mut img).unwrap_err();
    assert_eq!(
        err,
        RenderError::EmptyCanvas {
            width: 0,
            height: 5
        }
    );
}

#[test]
fn test_fill_circle_draws_center() {
    let mut img = Image::new_black(20, 20);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap();
        canvas
            .fill_circle(Vec2::new(10.0, 10.0), 2.0, Color::RED)
            .unwrap();
    }

    assert_eq!(img.pixel(10, 10), [1.0, 0.0, 0.0]);
    // Radius 2 disc on integer grid: 13 pixels.
    assert_eq!(img.count_pixels_matching(Color::RED, 1e-6), 13);
}

#[test]
fn test_fill_circle_clips_at_border() {
    let mut img = Image::new_black(10, 10);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap();
        canvas.fill_circle(Vec2::ZERO, 2.0, Color::RED).unwrap();
    }
    // Quarter of the disc survives, including the origin.
    assert_eq!(img.pixel(0, 0), [1.0, 0.0, 0.0]);
    assert_eq!(img.count_pixels_matching(Color::RED, 1e-6), 6);
}

#[test]
fn test_fill_circle_huge_radius_only_visits_image() {
    let mut img = Image::new_black(10, 10);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap();
        canvas
            .fill_circle(Vec2::new(5.0, 5.0), 1.0e7, Color::RED)
            .unwrap();
        canvas
            .fill_circle(Vec2::new(-1.0e6, -1.0e6), 2.0, Color::GREEN)
            .unwrap();
    }
    assert_eq!(img.count_pixels_matching(Color::RED, 1e-6), 100);
    assert_eq!(img.count_pixels_matching(Color::GREEN, 1e-6), 0);
}

#[test]
fn test_non_finite_coordinates_are_rejected() {
    let mut img = Image::new_black(10, 10);
    let mut canvas = ImageCanvas::new(&mut img).unwrap();
    let err = canvas
        .fill_circle(Vec2::new(f32::NAN, 1.0), 2.0, Color::RED)
        .unwrap_err();
    assert!(matches!(err, RenderError::NonFiniteCoordinate { .. }));

    let err = canvas
        .draw_text(Vec2::new(1.0, f32::INFINITY), "1", Color::RED)
        .unwrap_err();
    assert!(matches!(err, RenderError::NonFiniteCoordinate { .. }));
}

#[test]
fn test_text_sits_above_baseline() {
    let mut img = Image::new_black(40, 40);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap();
        canvas
            .draw_text(Vec2::new(10.0, 20.0), "8", Color::WHITE)
            .unwrap();
    }

    let (x0, y0, x1, y1) = lit_bounds(&img, Color::WHITE).unwrap();
    assert_eq!((x0, x1), (10, 14));
    assert_eq!((y0, y1), (13, 19));
}

#[test]
fn test_text_scale_enlarges_glyphs() {
    let mut img = Image::new_black(60, 60);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap().with_text_scale(2);
        canvas
            .draw_text(Vec2::new(10.0, 30.0), "8", Color::WHITE)
            .unwrap();
    }

    let (x0, y0, x1, y1) = lit_bounds(&img, Color::WHITE).unwrap();
    assert_eq!((x0, x1), (10, 19));
    assert_eq!((y0, y1), (16, 29));
}

#[test]
fn test_rotated_text_turns_clockwise_around_pivot() {
    let pivot = Vec2::new(20.0, 20.0);
    let mut img = Image::new_black(40, 40);
    {
        let mut canvas = ImageCanvas::new(&mut img).unwrap();
        with_rotation(&mut canvas, 90.0, pivot, |c| {
            c.draw_text(Vec2::new(20.0, 20.0), "8", Color::WHITE)
        })
        .unwrap();
        assert_eq!(canvas.depth(), 0);
    }

    // Upright glyph spans x 20..=24, y 13..=19. Rotating 90 degrees clockwise
    // about (20, 20) maps it to x 20..=26, y 20..=24.
    let (x0, y0, x1, y1) = lit_bounds(&img, Color::WHITE).unwrap();
    assert_eq!((x0, x1), (20, 26));
    assert_eq!((y0, y1), (20, 24));
}

#[test]
fn test_restore_without_save_fails() {
    let mut img = Image::new_black(4, 4);
    let mut canvas = ImageCanvas::new(&mut img).unwrap();
    assert_eq!(canvas.restore(), Err(RenderError::UnbalancedRestore));
}

#[test]
fn test_with_rotation_restores_after_draw_error() {
    let mut img = Image::new_black(10, 10);
    let mut canvas = ImageCanvas::new(&mut img).unwrap();

    let err = with_rotation(&mut canvas, 180.0, Vec2::new(5.0, 5.0), |c| {
        c.draw_text(Vec2::new(f32::NAN, 0.0), "3", Color::WHITE)
    })
    .unwrap_err();

    assert!(matches!(err, RenderError::NonFiniteCoordinate { .. }));
    assert_eq!(canvas.depth(), 0);
}

// ---------------------------------------------------------------------------
// DrawList
// ---------------------------------------------------------------------------

#[test]
fn test_draw_list_tracks_net_rotation() {
    let mut list = DrawList::new(100, 100);
    let pivot = Vec2::new(10.0, 10.0);

    with_rotation(&mut list, 270.0, pivot, |c| {
        c.draw_text(pivot, "1", Color::WHITE)
    })
    .unwrap();
    list.draw_text(pivot, "2", Color::WHITE).unwrap();
    with_rotation(&mut list, 90.0, pivot, |c| {
        c.draw_text(pivot, "3", Color::WHITE)
    })
    .unwrap();

    let rotations: Vec<_> = list.texts().map(|(t, _, r)| (t.to_string(), r)).collect();
    assert_eq!(
        rotations,
        vec![
            ("1".to_string(), 270.0),
            ("2".to_string(), 0.0),
            ("3".to_string(), 90.0)
        ]
    );
    assert_eq!(list.depth(), 0);
}

#[test]
fn test_draw_list_replay_matches_direct_drawing() {
    let pivot = Vec2::new(15.0, 15.0);

    let mut list = DrawList::new(30, 30);
    list.fill_circle(pivot, 2.0, Color::RED).unwrap();
    with_rotation(&mut list, 180.0, pivot, |c| {
        c.draw_text(pivot - Vec2::splat(7.0), "42", Color::RED)
    })
    .unwrap();

    let mut direct = Image::new_black(30, 30);
    {
        let mut canvas = ImageCanvas::new(&mut direct).unwrap();
        canvas.fill_circle(pivot, 2.0, Color::RED).unwrap();
        with_rotation(&mut canvas, 180.0, pivot, |c| {
            c.draw_text(pivot - Vec2::splat(7.0), "42", Color::RED)
        })
        .unwrap();
    }

    let mut replayed = Image::new_black(30, 30);
    {
        let mut canvas = ImageCanvas::new(&mut replayed).unwrap();
        list.replay(&mut canvas).unwrap();
    }

    assert_eq!(replayed, direct);
}
