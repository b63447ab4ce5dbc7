//! imagedraw loads raster images on demand, keeps one decoded handle per source path, and draws
//! them into destination rectangles as plain, rotated or resampled blits.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `path -> ImageHandle` through [`ImageCache`] (load once, clear all)
//! 2. **Draw**: `ImageHandle + DestRect -> Surface` through [`DrawEngine`]
//! 3. **Read back** (CPU backend): [`CpuSurface::readback`] into a [`FrameRGBA`]
//!
//! [`ImageDrawer`] composes the first two steps behind path-based entry points that return
//! `bool`, which is what host applications call.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Load once**: at most one decode per path until the cache is cleared, even under concurrent
//!   first access.
//! - **Failures are values**: nothing here panics on bad input; failed loads are never cached.
//! - **Premultiplied RGBA8** end-to-end: decoded images and read-back frames are premultiplied.
//!
//! ```no_run
//! use imagedraw::{CpuSurface, DestRect, ImageDrawer, RenderSettings};
//!
//! # fn main() -> imagedraw::DrawResult<()> {
//! let drawer = ImageDrawer::new();
//! let mut surface = CpuSurface::new(256, 256, &RenderSettings::default())?;
//! let ok = drawer.draw_image_rotation(&mut surface, "logo.png", DestRect::new(0, 0, 128, 128), 15);
//! assert!(ok);
//! let frame = surface.readback()?;
//! frame.to_rgba_image()?.save("out.png").map_err(anyhow::Error::from)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod assets;
mod drawer;
mod foundation;
mod render;
mod settings;

pub use assets::cache::{CacheKey, ImageCache};
pub use assets::decode::{decode_file, decode_image};
pub use assets::loader::{
    LoadStrategy, MAX_BUFFERED_FILE_BYTES, check_file_exists, load_from_filesystem,
    load_from_memory,
};
pub use assets::{ImageHandle, ImageStatus, PreparedImage};
pub use drawer::ImageDrawer;
pub use foundation::core::{Affine, DestRect, InterpolationMode, Point, Rect, Vec2};
pub use foundation::error::{DrawError, DrawResult, FailureKind};
pub use foundation::sync::ExclusiveLock;
pub use render::backend::BackendSession;
pub use render::cpu::CpuSurface;
pub use render::engine::{DrawEngine, RotationState, rotation_about_center};
pub use render::surface::{Surface, SurfaceScope};
pub use render::{FrameRGBA, RenderSettings};
pub use settings::{DrawerSettings, ENV_LOAD_STRATEGY, ENV_ZOOM_INTERPOLATION};
