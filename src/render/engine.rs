use std::sync::atomic::{AtomicI32, Ordering};

use crate::{
    assets::{ImageHandle, ImageStatus},
    foundation::core::{Affine, DestRect, InterpolationMode, Rect},
    foundation::error::{DrawError, DrawResult},
    render::surface::{Surface, SurfaceScope},
};

/// Cumulative rotation in whole degrees, kept in `[0, 360)`.
///
/// One counter is shared by every rotated draw made through the owning engine, whichever image
/// is drawn. Increments are atomic: concurrent callers never lose each other's deltas, but the
/// order in which they apply is unspecified.
#[derive(Debug, Default)]
pub struct RotationState {
    degrees: AtomicI32,
}

impl RotationState {
    pub fn new(initial_degrees: i32) -> Self {
        Self {
            degrees: AtomicI32::new(wrap_degrees(0, initial_degrees)),
        }
    }

    pub fn current(&self) -> i32 {
        self.degrees.load(Ordering::Acquire)
    }

    /// Add `delta` and return the new normalized angle.
    pub fn advance(&self, delta: i32) -> i32 {
        let prev = self
            .degrees
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                Some(wrap_degrees(cur, delta))
            })
            .unwrap_or_else(|cur| cur);
        wrap_degrees(prev, delta)
    }

    pub fn reset(&self) {
        self.degrees.store(0, Ordering::Release);
    }
}

fn wrap_degrees(current: i32, delta: i32) -> i32 {
    (i64::from(current) + i64::from(delta)).rem_euclid(360) as i32
}

/// Applies static, rotated and zoomed blits of decoded images onto a [`Surface`].
///
/// Apart from the shared [`RotationState`], every call is independent. The engine never loads or
/// caches images.
#[derive(Debug)]
pub struct DrawEngine {
    rotation: RotationState,
    static_interpolation: InterpolationMode,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawEngine {
    pub fn new() -> Self {
        Self {
            rotation: RotationState::default(),
            static_interpolation: InterpolationMode::Bilinear,
        }
    }

    /// Resampling mode used by static and rotated draws.
    pub fn with_static_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.static_interpolation = mode;
        self
    }

    pub fn static_interpolation(&self) -> InterpolationMode {
        self.static_interpolation
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn current_angle(&self) -> i32 {
        self.rotation.current()
    }

    /// Blit the whole image into `dest`.
    pub fn draw_static<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        image: Option<&ImageHandle>,
        dest: DestRect,
    ) -> DrawResult<()> {
        let image = drawable(image)?;
        let mut scope = SurfaceScope::new(surface);
        scope.set_interpolation_mode(self.static_interpolation);
        blit(&mut *scope, image, dest)
    }

    /// Advance the shared angle by `delta_degrees`, then blit into `dest` rotated about its
    /// center.
    ///
    /// The angle changes before drawing, so it stays advanced even when the draw itself fails.
    /// Invalid handles are rejected first and leave the angle alone.
    pub fn draw_rotated<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        image: Option<&ImageHandle>,
        dest: DestRect,
        delta_degrees: i32,
    ) -> DrawResult<()> {
        let image = drawable(image)?;
        let angle = self.rotation.advance(delta_degrees);

        let mut scope = SurfaceScope::new(surface);
        let base = scope.saved_transform();
        scope.set_transform(base * rotation_about_center(dest, angle));
        scope.set_interpolation_mode(self.static_interpolation);
        blit(&mut *scope, image, dest)
    }

    /// Blit into `dest` with the given resampling mode.
    pub fn draw_zoomed<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        image: Option<&ImageHandle>,
        dest: DestRect,
        mode: InterpolationMode,
    ) -> DrawResult<()> {
        let image = drawable(image)?;
        let mut scope = SurfaceScope::new(surface);
        scope.set_interpolation_mode(mode);
        blit(&mut *scope, image, dest)
    }
}

/// `T(c) * R(angle) * T(-c)` with `c` the integer center of `dest`.
pub fn rotation_about_center(dest: DestRect, angle_degrees: i32) -> Affine {
    let (cx, cy) = dest.center();
    let (cx, cy) = (cx as f64, cy as f64);
    Affine::translate((cx, cy))
        * Affine::rotate(f64::from(angle_degrees).to_radians())
        * Affine::translate((-cx, -cy))
}

fn drawable(image: Option<&ImageHandle>) -> DrawResult<&ImageHandle> {
    let image = image.ok_or_else(|| DrawError::invalid_handle("no image"))?;
    if image.height() == 0 {
        return Err(DrawError::invalid_handle("image has zero height"));
    }
    if image.status() != ImageStatus::Ok {
        return Err(DrawError::invalid_handle(format!(
            "image status is {:?}",
            image.status()
        )));
    }
    Ok(image)
}

fn blit<S: Surface + ?Sized>(
    surface: &mut S,
    image: &ImageHandle,
    dest: DestRect,
) -> DrawResult<()> {
    let src = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
    surface.draw_image(image, src, dest.to_rect())
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
