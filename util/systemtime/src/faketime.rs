use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static FAKETIME_ENABLED: AtomicBool = AtomicBool::new(false);
static FAKETIME_MILLIS: AtomicU64 = AtomicU64::new(0);

pub(crate) fn current_faketime() -> Option<u64> {
    if FAKETIME_ENABLED.load(Ordering::SeqCst) {
        Some(FAKETIME_MILLIS.load(Ordering::SeqCst))
    } else {
        None
    }
}

/// Holds the process-wide faketime override active while it is alive.
/// Disables the override on drop, so a test cannot leak a fake clock into
/// the next one.
pub struct FaketimeGuard {
    _private: (),
}

impl FaketimeGuard {
    /// Overrides `unix_time_as_millis` to return `millis` until disabled or
    /// dropped.
    pub fn set_faketime(&self, millis: u64) {
        FAKETIME_MILLIS.store(millis, Ordering::SeqCst);
        FAKETIME_ENABLED.store(true, Ordering::SeqCst);
    }

    /// Reverts `unix_time_as_millis` to the real clock without dropping the
    /// guard.
    pub fn disable_faketime(&self) {
        FAKETIME_ENABLED.store(false, Ordering::SeqCst);
    }
}

impl Drop for FaketimeGuard {
    fn drop(&mut self) {
        FAKETIME_ENABLED.store(false, Ordering::SeqCst);
    }
}

/// Acquires the faketime guard for this process.
pub fn faketime() -> FaketimeGuard {
    FaketimeGuard { _private: () }
}
