use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static ACTIVE: AtomicUsize = AtomicUsize::new(0);
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Lifetime token for the raster backend.
///
/// Starting a session is what a drawer does on construction; dropping it is the matching
/// shutdown. The token is not `Clone`, so each start is paired with exactly one shutdown.
#[derive(Debug)]
pub struct BackendSession {
    id: u64,
}

impl BackendSession {
    pub fn start() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let active = ACTIVE.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(session = id, active, "raster backend session started");
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of sessions currently alive in this process.
    pub fn active() -> usize {
        ACTIVE.load(Ordering::Acquire)
    }
}

impl Drop for BackendSession {
    fn drop(&mut self) {
        let active = ACTIVE.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::info!(session = self.id, active, "raster backend session stopped");
    }
}
