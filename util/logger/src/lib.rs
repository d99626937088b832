//! Logging facade used throughout this workspace.
//!
//! Crates depend on `ckb-logger` rather than on `log` directly, so the
//! binary that embeds them is free to swap the installed subscriber (plain
//! `env_logger`, a structured sink, ...) without touching library code.

pub use log::{debug, error, info, log_enabled, trace, warn};
pub use log::{Level, LevelFilter};
