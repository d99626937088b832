//! A probabilistic, size- and time-bounded set of transaction ids that were
//! rejected as invalid (§4.1). Never produces false negatives within its
//! configured window; may produce false positives, and may silently forget
//! an id once the window has elapsed or the cache has filled past its size
//! hint.
//!
//! Modeled on the rolling bloom filter CKB's network crate uses to
//! remember addresses it has already gossiped (`AddrKnown`, itself a port
//! of bitcoin's `CRollingBloomFilter`): two stable bloom filter generations,
//! with the older one dropped and a fresh one started once the active
//! generation has been alive for the configured expiration window. An id
//! inserted right after a rotation survives for one to two windows, which
//! satisfies "at least the configured window" without ever having to touch
//! every stored id to expire it individually.

use std::collections::hash_map::RandomState;
use std::time::Duration;

use bloom_filters::{BloomFilter, DefaultBuildHashKernels, StableBloomFilter};

use ordered_tx_pool_types::Digest32;

/// False-positive rate the underlying stable bloom filter is built for.
/// 3% matches CKB's own `AddrKnown` default and is generous for a cache
/// whose only job is "don't re-admit something we just rejected".
const FALSE_POSITIVE_RATE: f64 = 0.03;
const NUM_HASH_FUNCTIONS: usize = 3;

type Filter = StableBloomFilter<DefaultBuildHashKernels<RandomState>>;

fn new_filter(buckets_num: usize) -> Filter {
    StableBloomFilter::new(
        buckets_num.max(1),
        NUM_HASH_FUNCTIONS,
        FALSE_POSITIVE_RATE,
        DefaultBuildHashKernels::new(rand::random(), RandomState::default()),
    )
}

/// The approximate expiring cache described in §4.1 of the design.
pub struct ApproxExpiringCache {
    current: Filter,
    previous: Filter,
    buckets_num: usize,
    expiration_millis: u64,
    generation_started_at: u64,
    len_hint: usize,
}

impl ApproxExpiringCache {
    /// Builds an empty cache. `size_hint` bounds each generation's bucket
    /// count; `expiration` is the minimum time an inserted id is guaranteed
    /// to remain reported by `might_contain`.
    pub fn empty(size_hint: u32, expiration: Duration) -> Self {
        let buckets_num = size_hint as usize;
        ApproxExpiringCache {
            current: new_filter(buckets_num),
            previous: new_filter(buckets_num),
            buckets_num,
            expiration_millis: expiration.as_millis() as u64,
            generation_started_at: ckb_systemtime::unix_time_as_millis(),
            len_hint: 0,
        }
    }

    fn rotate_if_expired(&mut self, now: u64) {
        if self.expiration_millis == 0 {
            return;
        }
        if now.saturating_sub(self.generation_started_at) >= self.expiration_millis {
            self.previous = std::mem::replace(&mut self.current, new_filter(self.buckets_num));
            self.generation_started_at = now;
            self.len_hint = 0;
        }
    }

    /// Records `id`. Returns the updated cache (it also mutates in place;
    /// the return value lets call sites thread it the same way they thread
    /// the rest of the snapshot-returning API in `component::pool`).
    pub fn put(&mut self, id: &Digest32) -> &mut Self {
        let now = ckb_systemtime::unix_time_as_millis();
        self.rotate_if_expired(now);
        self.current.insert(id);
        self.len_hint += 1;
        self
    }

    /// May return `true` for an id that was never inserted (bounded
    /// false-positive rate); must return `true` for any id inserted within
    /// the configured window and not yet evicted by a later rotation or by
    /// the stable filter's own decay once it is full.
    pub fn might_contain(&self, id: &Digest32) -> bool {
        self.current.contains(id) || self.previous.contains(id)
    }

    /// Approximate number of ids recorded in the active generation. For
    /// observability only; never consulted by `might_contain` or `put`.
    pub fn len_hint(&self) -> usize {
        self.len_hint
    }
}

impl std::fmt::Debug for ApproxExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApproxExpiringCache")
            .field("buckets_num", &self.buckets_num)
            .field("expiration_millis", &self.expiration_millis)
            .field("len_hint", &self.len_hint)
            .finish()
    }
}
