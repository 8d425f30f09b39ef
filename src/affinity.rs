//! Pluggable CPU-pinning hook. The affinity call is a platform leak in the
//! source (`pthread_setaffinity_np`); this exposes it as a trait with an
//! OS-backed default and a no-op fallback, per the design note on thread
//! affinity.

use tracing::warn;

pub trait AffinityHook: Send + Sync {
    fn pin(&self, worker_id: usize);
}

/// Pins worker `i` to the `i`-th core reported by `core_affinity`, cycling
/// through the available set if there are more workers than cores. Failure
/// to pin is logged and otherwise ignored, matching the error-handling
/// design's "thread-affinity failure: logged but non-fatal".
pub struct OsAffinityHook {
    core_ids: Vec<core_affinity::CoreId>,
}

impl OsAffinityHook {
    pub fn new() -> Self {
        let core_ids = core_affinity::get_core_ids().unwrap_or_default();
        OsAffinityHook { core_ids }
    }
}

impl Default for OsAffinityHook {
    fn default() -> Self {
        Self::new()
    }
}

impl AffinityHook for OsAffinityHook {
    fn pin(&self, worker_id: usize) {
        if self.core_ids.is_empty() {
            warn!(worker_id, "no CPU core ids reported by the OS; running unpinned");
            return;
        }
        let id = self.core_ids[worker_id % self.core_ids.len()];
        if !core_affinity::set_for_current(id) {
            warn!(worker_id, core = id.id, "failed to pin worker to CPU core; continuing unpinned");
        }
    }
}

/// Pins nothing. Used in tests and on platforms where affinity pinning
/// isn't meaningful.
pub struct NoopAffinityHook;

impl AffinityHook for NoopAffinityHook {
    fn pin(&self, _worker_id: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_hook_never_panics() {
        let hook = NoopAffinityHook;
        hook.pin(0);
        hook.pin(9999);
    }
}
