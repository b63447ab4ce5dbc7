use std::path::Path;

use crate::{
    assets::{ImageHandle, cache::ImageCache},
    foundation::core::{DestRect, InterpolationMode},
    foundation::error::DrawResult,
    render::{backend::BackendSession, engine::DrawEngine, surface::Surface},
    settings::DrawerSettings,
};

/// Path-based drawing entry points over one image cache and one draw engine.
///
/// Construct one per process (or one per independent rotation counter) and share it by reference
/// or `Arc`; every entry point takes `&self`. Creating a drawer starts a backend session;
/// dropping it clears the cache and then ends the session.
///
/// The `draw_*` methods report success as `bool` and log failures; the `try_draw_*` variants
/// return the typed error instead.
#[derive(Debug)]
pub struct ImageDrawer {
    cache: ImageCache,
    engine: DrawEngine,
    settings: DrawerSettings,
    session: BackendSession,
}

impl Default for ImageDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDrawer {
    pub fn new() -> Self {
        Self::with_settings(DrawerSettings::default())
    }

    pub fn with_settings(settings: DrawerSettings) -> Self {
        let session = BackendSession::start();
        Self {
            cache: ImageCache::new(),
            engine: DrawEngine::new().with_static_interpolation(settings.static_interpolation),
            settings,
            session,
        }
    }

    /// Build from [`DrawerSettings::from_env`].
    pub fn from_env() -> DrawResult<Self> {
        Ok(Self::with_settings(DrawerSettings::from_env()?))
    }

    pub fn settings(&self) -> &DrawerSettings {
        &self.settings
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn engine(&self) -> &DrawEngine {
        &self.engine
    }

    pub fn session_id(&self) -> u64 {
        self.session.id()
    }

    /// Release every cached image; see [`ImageCache::clear_all`].
    pub fn clear_cache(&self) -> usize {
        self.cache.clear_all()
    }

    pub fn draw_image<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
    ) -> bool {
        let path = path.as_ref();
        report("draw_image", path, self.try_draw_image(surface, path, dest))
    }

    /// Pass `0` as `delta_degrees` to redraw at the current angle.
    pub fn draw_image_rotation<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
        delta_degrees: i32,
    ) -> bool {
        let path = path.as_ref();
        report(
            "draw_image_rotation",
            path,
            self.try_draw_image_rotation(surface, path, dest, delta_degrees),
        )
    }

    /// `None` selects the configured zoom interpolation (high-quality bicubic by default).
    pub fn draw_image_zoom<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
        mode: Option<InterpolationMode>,
    ) -> bool {
        let path = path.as_ref();
        report("draw_image_zoom", path, self.try_draw_image_zoom(surface, path, dest, mode))
    }

    pub fn try_draw_image<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
    ) -> DrawResult<()> {
        let image = self.resolve(path.as_ref())?;
        self.engine.draw_static(surface, Some(&image), dest)
    }

    pub fn try_draw_image_rotation<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
        delta_degrees: i32,
    ) -> DrawResult<()> {
        let image = self.resolve(path.as_ref())?;
        self.engine.draw_rotated(surface, Some(&image), dest, delta_degrees)
    }

    pub fn try_draw_image_zoom<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        path: impl AsRef<Path>,
        dest: DestRect,
        mode: Option<InterpolationMode>,
    ) -> DrawResult<()> {
        let mode = mode.unwrap_or(self.settings.zoom_interpolation);
        let image = self.resolve(path.as_ref())?;
        self.engine.draw_zoomed(surface, Some(&image), dest, mode)
    }

    fn resolve(&self, path: &Path) -> DrawResult<ImageHandle> {
        self.cache.get_or_load(path, self.settings.load_strategy)
    }
}

impl Drop for ImageDrawer {
    fn drop(&mut self) {
        let released = self.cache.clear_all();
        tracing::debug!(session = self.session.id(), released, "image drawer dropped");
    }
}

fn report(op: &'static str, path: &Path, res: DrawResult<()>) -> bool {
    match res {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                op,
                path = %path.display(),
                kind = ?err.kind(),
                error = %err,
                "image draw failed"
            );
            false
        }
    }
}
