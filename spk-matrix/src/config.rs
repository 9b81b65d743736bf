use core::sync::atomic::{AtomicBool, Ordering};

static MULTITHREAD_ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether batch solves may fan out over the rayon pool.
/// Always `false` when built without the `multithread` feature.
pub fn is_multithread_enabled() -> bool {
    cfg!(feature = "multithread") && MULTITHREAD_ENABLED.load(Ordering::Relaxed)
}

pub fn set_multithread_enabled(val: bool) {
    MULTITHREAD_ENABLED.store(val, Ordering::Relaxed)
}
