//! A tiny time source: real wall-clock milliseconds in production, and a
//! process-wide fake clock behind the `enable_faketime` feature for
//! deterministic tests of anything timing-sensitive (e.g. a scan-time guard).

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "enable_faketime")]
mod faketime;

#[cfg(feature = "enable_faketime")]
pub use faketime::{faketime, FaketimeGuard};

/// The real wall-clock time in milliseconds since the Unix epoch. Never
/// affected by a faketime override; use this for anything that must reflect
/// actual elapsed time (timeouts, rate limiting).
pub fn system_time_as_millis() -> u64 {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time is before the Unix epoch");
    duration.as_secs() * 1_000 + u64::from(duration.subsec_millis())
}

/// The current time in milliseconds since the Unix epoch. Honors a faketime
/// override installed through [`faketime`] when the `enable_faketime`
/// feature is enabled; otherwise identical to [`system_time_as_millis`].
pub fn unix_time_as_millis() -> u64 {
    #[cfg(feature = "enable_faketime")]
    {
        if let Some(millis) = faketime::current_faketime() {
            return millis;
        }
    }
    system_time_as_millis()
}

#[cfg(test)]
mod test_faketime;
#[cfg(test)]
mod test_realtime;
