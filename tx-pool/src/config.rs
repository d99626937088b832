use std::time::Duration;

/// Tuning constants for the family weight-propagation guard (§4.5, §9 of
/// the design). Exposed on [`NodeSettings`] rather than hard-coded, so an
/// operator can retune them without a rebuild if an adversarial transaction
/// graph calls for it.
pub const DEFAULT_MAX_PARENT_SCAN_DEPTH: u32 = 500;
pub const DEFAULT_MAX_PARENT_SCAN_TIME: Duration = Duration::from_millis(500);

/// Node-level parameters the pool reads: its capacity, and the shape of its
/// invalidation cache. The node's full configuration (networking, storage,
/// ...) is out of scope for this crate; this is the focused slice it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSettings {
    /// Hard cap on the number of transactions the pool holds at once.
    pub mempool_capacity: u32,
    /// Size hint for the invalidation cache (§4.1).
    pub invalid_modifiers_cache_size: u32,
    /// Per-entry retention window for the invalidation cache.
    pub invalid_modifiers_cache_expiration: Duration,
    /// Depth guard for `update_family` (§4.5).
    pub max_parent_scan_depth: u32,
    /// Wall-clock guard for `update_family` (§4.5).
    pub max_parent_scan_time: Duration,
}

impl NodeSettings {
    pub fn new(
        mempool_capacity: u32,
        invalid_modifiers_cache_size: u32,
        invalid_modifiers_cache_expiration: Duration,
    ) -> Self {
        NodeSettings {
            mempool_capacity,
            invalid_modifiers_cache_size,
            invalid_modifiers_cache_expiration,
            max_parent_scan_depth: DEFAULT_MAX_PARENT_SCAN_DEPTH,
            max_parent_scan_time: DEFAULT_MAX_PARENT_SCAN_TIME,
        }
    }
}

/// The monetary parameters the weight function needs: which proposition
/// identifies a fee-paying output (§4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonetarySettings {
    pub fee_proposition_bytes: Vec<u8>,
}

impl MonetarySettings {
    pub fn new(fee_proposition_bytes: Vec<u8>) -> Self {
        MonetarySettings {
            fee_proposition_bytes,
        }
    }
}

/// Raised by constructors when a caller supplies a configuration the pool
/// can never operate under (§7: "implementations should assert ... at the
/// boundary"). Mutators on an already-constructed pool remain total; only
/// construction can fail.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolConfigError {
    #[error("mempool_capacity must be greater than zero")]
    ZeroCapacity,
    #[error("invalid_modifiers_cache_size must be greater than zero")]
    ZeroCacheSize,
}

impl NodeSettings {
    pub(crate) fn validate(&self) -> Result<(), PoolConfigError> {
        if self.mempool_capacity == 0 {
            return Err(PoolConfigError::ZeroCapacity);
        }
        if self.invalid_modifiers_cache_size == 0 {
            return Err(PoolConfigError::ZeroCacheSize);
        }
        Ok(())
    }
}
