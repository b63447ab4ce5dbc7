use std::ops::{Deref, DerefMut};

use crate::{
    assets::ImageHandle,
    foundation::core::{Affine, InterpolationMode, Rect},
    foundation::error::DrawResult,
};

/// Destination of draw operations: a raster target with a current transform and a current
/// resampling mode.
pub trait Surface {
    fn transform(&self) -> Affine;

    fn set_transform(&mut self, transform: Affine);

    fn reset_transform(&mut self) {
        self.set_transform(Affine::IDENTITY);
    }

    fn interpolation_mode(&self) -> InterpolationMode;

    fn set_interpolation_mode(&mut self, mode: InterpolationMode);

    /// Draw the `src` region of `image` (image pixels) stretched into `dest` (surface
    /// coordinates before the current transform is applied).
    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dest: Rect) -> DrawResult<()>;
}

/// Borrow of a surface that restores its transform and resampling mode when dropped.
pub struct SurfaceScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    saved_transform: Affine,
    saved_mode: InterpolationMode,
}

impl<'a, S: Surface + ?Sized> SurfaceScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let saved_transform = surface.transform();
        let saved_mode = surface.interpolation_mode();
        Self {
            surface,
            saved_transform,
            saved_mode,
        }
    }

    /// Transform that was current when the scope was opened.
    pub fn saved_transform(&self) -> Affine {
        self.saved_transform
    }
}

impl<S: Surface + ?Sized> Deref for SurfaceScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SurfaceScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SurfaceScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_transform(self.saved_transform);
        self.surface.set_interpolation_mode(self.saved_mode);
    }
}
