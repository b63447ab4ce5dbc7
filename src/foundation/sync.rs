//! Scoped mutual exclusion.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Exclusive lock around `T`; readers and writers are not distinguished.
///
/// Acquisition returns a guard that releases the lock when it goes out of scope, on every exit
/// path. A panic while the lock is held does not wedge later callers: poisoning is ignored and
/// the data is handed out as-is.
#[derive(Debug, Default)]
pub struct ExclusiveLock<T> {
    inner: Mutex<T>,
}

impl<T> ExclusiveLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    pub fn acquire(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.acquire();
        f(&mut guard)
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/sync.rs"]
mod tests;
