use std::sync::Arc;

use super::*;
use crate::{assets::PreparedImage, foundation::core::Point};

#[derive(Clone, Debug, PartialEq)]
struct DrawCall {
    src: Rect,
    dest: Rect,
    transform: Affine,
    mode: InterpolationMode,
}

struct RecordingSurface {
    transform: Affine,
    mode: InterpolationMode,
    calls: Vec<DrawCall>,
    fail_draws: bool,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            transform: Affine::IDENTITY,
            mode: InterpolationMode::NearestNeighbor,
            calls: Vec::new(),
            fail_draws: false,
        }
    }
}

impl Surface for RecordingSurface {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn interpolation_mode(&self) -> InterpolationMode {
        self.mode
    }

    fn set_interpolation_mode(&mut self, mode: InterpolationMode) {
        self.mode = mode;
    }

    fn draw_image(&mut self, _image: &ImageHandle, src: Rect, dest: Rect) -> DrawResult<()> {
        self.calls.push(DrawCall {
            src,
            dest,
            transform: self.transform,
            mode: self.mode,
        });
        if self.fail_draws {
            return Err(DrawError::draw("backend refused"));
        }
        Ok(())
    }
}

fn handle(w: u32, h: u32) -> ImageHandle {
    ImageHandle::new(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    })
}

fn assert_affine_close(a: Affine, b: Affine) {
    for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs()) {
        assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
    }
}

#[test]
fn rotation_accumulates_modulo_360() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let img = handle(4, 4);
    let dest = DestRect::new(0, 0, 8, 8);

    let mut seen = Vec::new();
    for delta in [90, 90, 200] {
        engine
            .draw_rotated(&mut surface, Some(&img), dest, delta)
            .unwrap();
        seen.push(engine.current_angle());
    }
    assert_eq!(seen, vec![90, 180, 20]);
}

#[test]
fn negative_and_large_deltas_normalize_into_range() {
    let state = RotationState::default();
    assert_eq!(state.advance(-90), 270);
    assert_eq!(state.advance(720), 270);
    assert_eq!(state.advance(i32::MIN), (270i64 + i64::from(i32::MIN)).rem_euclid(360) as i32);
    assert_eq!(RotationState::new(-30).current(), 330);
    state.reset();
    assert_eq!(state.current(), 0);
}

#[test]
fn rotation_increments_are_not_lost_across_threads() {
    let engine = Arc::new(DrawEngine::new());
    let threads = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    engine.rotation().advance(1);
                }
            })
        })
        .collect::<Vec<_>>();
    for t in threads {
        t.join().unwrap();
    }
    assert_eq!(engine.current_angle(), 800 % 360);
}

#[test]
fn invalid_handles_fail_without_touching_the_surface() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let dest = DestRect::new(0, 0, 10, 10);
    let zero_height = handle(5, 0);
    let corrupt = ImageHandle::new(PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 3]),
    });
    assert_eq!(corrupt.status(), ImageStatus::Corrupt);

    for img in [None, Some(&zero_height), Some(&corrupt)] {
        let err = engine.draw_static(&mut surface, img, dest).unwrap_err();
        assert!(matches!(err, DrawError::InvalidHandle(_)), "{err}");
        let err = engine
            .draw_rotated(&mut surface, img, dest, 45)
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidHandle(_)), "{err}");
        let err = engine
            .draw_zoomed(&mut surface, img, dest, InterpolationMode::Bicubic)
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidHandle(_)), "{err}");
    }

    assert!(surface.calls.is_empty());
    assert_eq!(engine.current_angle(), 0);
}

#[test]
fn static_draw_stretches_full_source_into_dest() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let img = handle(64, 64);

    engine
        .draw_static(&mut surface, Some(&img), DestRect::new(0, 0, 128, 128))
        .unwrap();

    assert_eq!(
        surface.calls,
        vec![DrawCall {
            src: Rect::new(0.0, 0.0, 64.0, 64.0),
            dest: Rect::new(0.0, 0.0, 128.0, 128.0),
            transform: Affine::IDENTITY,
            mode: InterpolationMode::Bilinear,
        }]
    );
    assert_eq!(surface.mode, InterpolationMode::NearestNeighbor);
}

#[test]
fn rotated_draw_rotates_about_dest_center_and_restores_transform() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let img = handle(4, 4);
    let dest = DestRect::new(10, 20, 31, 40);

    engine
        .draw_rotated(&mut surface, Some(&img), dest, 90)
        .unwrap();

    let call = &surface.calls[0];
    assert_affine_close(call.transform, rotation_about_center(dest, 90));
    let center = Point::new(25.0, 40.0);
    let mapped = call.transform * center;
    assert!((mapped - center).hypot() < 1e-9);
    assert_eq!(surface.transform, Affine::IDENTITY);
}

#[test]
fn rotated_draw_composes_onto_existing_transform() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let base = Affine::scale(2.0);
    surface.set_transform(base);
    let img = handle(4, 4);
    let dest = DestRect::new(0, 0, 10, 10);

    engine
        .draw_rotated(&mut surface, Some(&img), dest, 30)
        .unwrap();

    assert_affine_close(
        surface.calls[0].transform,
        base * rotation_about_center(dest, 30),
    );
    assert_eq!(surface.transform, base);
}

#[test]
fn failed_rotated_draw_still_advances_angle_and_resets_transform() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    surface.fail_draws = true;
    let img = handle(4, 4);

    let err = engine
        .draw_rotated(&mut surface, Some(&img), DestRect::new(0, 0, 4, 4), 45)
        .unwrap_err();
    assert!(matches!(err, DrawError::Draw(_)));
    assert_eq!(engine.current_angle(), 45);
    assert_eq!(surface.transform, Affine::IDENTITY);
    assert_eq!(surface.mode, InterpolationMode::NearestNeighbor);
}

#[test]
fn zoomed_draw_uses_requested_mode_then_restores() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let img = handle(10, 5);

    engine
        .draw_zoomed(
            &mut surface,
            Some(&img),
            DestRect::new(0, 0, 100, 50),
            InterpolationMode::HighQualityBicubic,
        )
        .unwrap();

    assert_eq!(surface.calls[0].mode, InterpolationMode::HighQualityBicubic);
    assert_eq!(surface.calls[0].src, Rect::new(0.0, 0.0, 10.0, 5.0));
    assert_eq!(surface.calls[0].dest, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(surface.mode, InterpolationMode::NearestNeighbor);
}

#[test]
fn draw_failure_propagates_from_static_and_zoomed() {
    let engine = DrawEngine::new().with_static_interpolation(InterpolationMode::Bicubic);
    let mut surface = RecordingSurface::new();
    surface.fail_draws = true;
    let img = handle(2, 2);
    let dest = DestRect::new(0, 0, 2, 2);

    assert!(matches!(
        engine.draw_static(&mut surface, Some(&img), dest),
        Err(DrawError::Draw(_))
    ));
    assert!(matches!(
        engine.draw_zoomed(&mut surface, Some(&img), dest, InterpolationMode::LowQuality),
        Err(DrawError::Draw(_))
    ));
    assert_eq!(surface.calls[0].mode, InterpolationMode::Bicubic);
    assert_eq!(surface.calls.len(), 2);
}

#[test]
fn rotated_draw_near_i32_max_rotates_about_exact_center() {
    let engine = DrawEngine::new();
    let mut surface = RecordingSurface::new();
    let img = handle(4, 4);
    let dest = DestRect::new(i32::MAX - 1, 0, 10, 10);

    engine
        .draw_rotated(&mut surface, Some(&img), dest, 90)
        .unwrap();

    assert_eq!(surface.calls.len(), 1);
    let center = Point::new(f64::from(i32::MAX) - 1.0 + 5.0, 5.0);
    let mapped = surface.calls[0].transform * center;
    assert!((mapped - center).hypot() < 1e-3, "{mapped:?}");
    assert_eq!(surface.transform, Affine::IDENTITY);
}
