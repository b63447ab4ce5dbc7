use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    assets::{
        ImageHandle, ImageStatus,
        loader::LoadStrategy,
    },
    foundation::error::{DrawError, DrawResult},
    foundation::sync::ExclusiveLock,
};

/// Normalized source path used as the cache key.
///
/// Relative paths are resolved against the current directory; `.` components and repeated
/// separators are dropped. `..` is kept as-is and the filesystem is never consulted, so symlinks
/// and case folding behave as the filesystem defines them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(PathBuf);

impl CacheKey {
    pub fn normalize(path: &Path) -> DrawResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(DrawError::invalid_path("image path must be non-empty"));
        }

        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| DrawError::io(format!("resolve current directory: {e}")))?
                .join(path)
        };

        let norm = abs
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>();
        Ok(Self(norm))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Load-once image cache keyed by source path.
///
/// There is no individual eviction: entries live until [`ImageCache::clear_all`] or until the
/// cache is dropped. A failed load never leaves an entry behind, so the next request retries.
///
/// All access goes through one exclusive lock that is held across the whole
/// lookup → decode → insert sequence. Concurrent first requests for the same path therefore
/// decode once and observe the same handle, at the price of serializing unrelated loads.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: ExclusiveLock<HashMap<CacheKey, ImageHandle>>,
    decodes: AtomicU64,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached handle for `path`, loading it with `strategy` on a miss.
    pub fn get_or_load(
        &self,
        path: impl AsRef<Path>,
        strategy: LoadStrategy,
    ) -> DrawResult<ImageHandle> {
        self.get_or_load_path(path.as_ref(), strategy)
    }

    pub fn load_from_filesystem(&self, path: impl AsRef<Path>) -> DrawResult<ImageHandle> {
        self.get_or_load_path(path.as_ref(), LoadStrategy::Filesystem)
    }

    pub fn load_from_memory(&self, path: impl AsRef<Path>) -> DrawResult<ImageHandle> {
        self.get_or_load_path(path.as_ref(), LoadStrategy::Memory)
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, path, strategy),
        fields(path = %path.display(), strategy = strategy.as_str())
    )]
    fn get_or_load_path(&self, path: &Path, strategy: LoadStrategy) -> DrawResult<ImageHandle> {
        let key = CacheKey::normalize(path)?;
        let mut entries = self.entries.acquire();

        if let Some(handle) = entries.get(&key) {
            tracing::debug!("image cache hit");
            return Ok(handle.clone());
        }

        let handle = ImageHandle::new(strategy.load(key.as_path())?);
        if handle.status() != ImageStatus::Ok {
            return Err(DrawError::decode(format!(
                "decoded '{}' has an inconsistent pixel buffer",
                key.as_path().display()
            )));
        }

        self.decodes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            width = handle.width(),
            height = handle.height(),
            "image cache insert"
        );
        entries.insert(key, handle.clone());
        Ok(handle)
    }

    /// Lookup without loading.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<ImageHandle> {
        let key = CacheKey::normalize(path.as_ref()).ok()?;
        self.entries.acquire().get(&key).cloned()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_some()
    }

    /// Drop every cached handle and return how many were released.
    ///
    /// Handles already given out stay valid for their holders; the cache just stops sharing
    /// them, and the next request for the same path decodes afresh.
    pub fn clear_all(&self) -> usize {
        let released = self.entries.with(|entries| {
            let n = entries.len();
            entries.clear();
            n
        });
        tracing::debug!(released, "image cache cleared");
        released
    }

    pub fn len(&self) -> usize {
        self.entries.acquire().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total successful decodes performed by this cache.
    pub fn decode_count(&self) -> u64 {
        self.decodes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
