//! `OrderedTxPool`: five coordinated indices over the same set of pooled
//! transactions, plus the mutators that keep them coherent (§3, §4.4, §4.5).
//!
//! The design notes (§9) offer two ways to realize the "every mutator
//! returns a new snapshot" contract: true persistent maps, or a single
//! mutable pool that the owner swaps behind a shared pointer (e.g.
//! `arc_swap::ArcSwap<OrderedTxPool>`). This crate takes the second, simpler
//! road — every mutator below takes `&mut self` and mutates in place, the
//! way a `pool.add_entry(..)` / `pool.remove_entry(..)` style map API
//! does. A caller that wants consistent concurrent
//! iteration over an older state clones an `Arc` of the pool before calling
//! a mutator and hands the clone to readers; this crate does not impose
//! that policy, it only makes in-place mutation cheap enough for it to work.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use ordered_tx_pool_types::{Digest32, Transaction, UnconfirmedTransaction};

use crate::component::invalidated::ApproxExpiringCache;
use crate::component::weighted::{weighted, WeightedTxId};
use crate::config::{MonetarySettings, NodeSettings, PoolConfigError};

/// The mempool itself (§3, §4.4).
pub struct OrderedTxPool {
    /// Ordered by `(-weight, id)`: first = highest priority, last = eviction victim.
    ordered_transactions: BTreeMap<WeightedTxId, UnconfirmedTransaction>,
    /// `transaction_id -> current WeightedTxId`. The authoritative "is this id present" index.
    transactions_registry: FxHashMap<Digest32, WeightedTxId>,
    /// `output_id -> WeightedTxId` of the transaction that produced it.
    outputs: FxHashMap<Digest32, WeightedTxId>,
    /// `output_id -> WeightedTxId` of the transaction that consumes it.
    inputs: FxHashMap<Digest32, WeightedTxId>,
    /// Monotone side channel recording ids the node decided not to re-admit (§4.1, §5).
    invalidated_tx_ids: ApproxExpiringCache,
    monetary: MonetarySettings,
    settings: NodeSettings,
}

impl OrderedTxPool {
    /// Builds an empty pool. Fails only on a degenerate configuration
    /// (§7); the mutators below never fail once construction succeeds.
    pub fn new(settings: NodeSettings, monetary: MonetarySettings) -> Result<Self, PoolConfigError> {
        settings.validate()?;
        let invalidated_tx_ids = ApproxExpiringCache::empty(
            settings.invalid_modifiers_cache_size,
            settings.invalid_modifiers_cache_expiration,
        );
        Ok(OrderedTxPool {
            ordered_transactions: BTreeMap::new(),
            transactions_registry: FxHashMap::default(),
            outputs: FxHashMap::default(),
            inputs: FxHashMap::default(),
            invalidated_tx_ids,
            monetary,
            settings,
        })
    }

    /// Cardinality of `ordered_transactions` (§4.4).
    pub fn size(&self) -> usize {
        self.ordered_transactions.len()
    }

    /// True iff `transactions_registry` contains `id` (§4.4).
    pub fn contains(&self, id: &Digest32) -> bool {
        self.transactions_registry.contains_key(id)
    }

    /// `invalidated_tx_ids.might_contain(id)` (§4.4, §6).
    pub fn is_invalidated(&self, id: &Digest32) -> bool {
        self.invalidated_tx_ids.might_contain(id)
    }

    /// Registry lookup, then ordered-map lookup. Returns `None` and logs a
    /// warning if the registry points at a key `ordered_transactions` does
    /// not have — an internal inconsistency that should never occur (§4.4, §7).
    pub fn get(&self, id: &Digest32) -> Option<&UnconfirmedTransaction> {
        let wtx = self.transactions_registry.get(id)?;
        match self.ordered_transactions.get(wtx) {
            Some(unconfirmed) => Some(unconfirmed),
            None => {
                ckb_logger::warn!(
                    "ordered-tx-pool: registry maps {} to a key absent from ordered_transactions",
                    id
                );
                None
            }
        }
    }

    /// True iff `tx.id` is not already pooled and the pool is not already
    /// over capacity. Does **not** consult `is_invalidated`; the caller
    /// decides whether to skip invalidated ids (§4.4).
    pub fn can_accept(&self, tx: &Transaction) -> bool {
        !self.contains(&tx.id) && self.size() <= self.settings.mempool_capacity as usize
    }

    /// Every input of `tx` that already has a consumer in the pool,
    /// surfaced as the consuming transactions' current keys. A read-only
    /// view of what the `inputs` index already tracks (§3).
    pub fn double_spends(&self, tx: &Transaction) -> Vec<WeightedTxId> {
        tx.inputs
            .iter()
            .filter_map(|input| self.inputs.get(&input.referenced_output_id))
            .cloned()
            .collect()
    }

    /// Current weight of `id`, if pooled. `iter_by_weight`'s ordering
    /// already encodes the same information for production callers; this
    /// is mainly for tests and diagnostics.
    pub fn weight_of(&self, id: &Digest32) -> Option<i64> {
        self.transactions_registry.get(id).map(|wtx| wtx.weight)
    }

    /// Highest-weight-first traversal of the pool (§3's ordering invariant,
    /// surfaced for an external collaborator such as block assembly).
    pub fn iter_by_weight(&self) -> impl Iterator<Item = &UnconfirmedTransaction> {
        self.ordered_transactions.values()
    }

    /// Admits `unconfirmed` at `fee_factor`, or — if its id is already
    /// pooled — replaces the stored metadata without re-keying or
    /// re-running `update_family` (§4.4: "the weight has not changed; only
    /// the metadata may have").
    pub fn put(&mut self, unconfirmed: UnconfirmedTransaction, fee_factor: u32) -> &mut Self {
        debug_assert!(fee_factor > 0, "fee_factor must be asserted > 0 at the boundary");
        let tx_id = unconfirmed.transaction.id;

        if let Some(wtx_old) = self.transactions_registry.get(&tx_id).cloned() {
            if let Some(slot) = self.ordered_transactions.get_mut(&wtx_old) {
                *slot = unconfirmed;
            } else {
                ckb_logger::warn!(
                    "ordered-tx-pool: registry maps {} to a key absent from ordered_transactions",
                    tx_id
                );
            }
            return self;
        }

        let now = ckb_systemtime::unix_time_as_millis();
        let wtx = weighted(&unconfirmed.transaction, fee_factor, &self.monetary, now);

        self.transactions_registry.insert(tx_id, wtx.clone());
        for output in &unconfirmed.transaction.outputs {
            self.outputs.insert(output.id, wtx.clone());
        }
        for input in &unconfirmed.transaction.inputs {
            self.inputs.insert(input.referenced_output_id, wtx.clone());
        }
        let tx_for_family = unconfirmed.transaction.clone();
        self.ordered_transactions.insert(wtx.clone(), unconfirmed);

        self.update_family(&tx_for_family, wtx.weight, now, 0);

        while self.size() > self.settings.mempool_capacity as usize {
            if self.evict_one().is_none() {
                break;
            }
        }

        self
    }

    /// Removes `tx` and reverses its weight contribution to its ancestors.
    /// A no-op if `tx.id` is not pooled (§4.4).
    pub fn remove(&mut self, tx: &Transaction) -> &mut Self {
        let wtx = match self.transactions_registry.get(&tx.id) {
            Some(wtx) => wtx.clone(),
            None => return self,
        };
        self.ordered_transactions.remove(&wtx);
        self.purge_indices(tx);

        let now = ckb_systemtime::unix_time_as_millis();
        self.update_family(tx, -wtx.weight, now, 0);
        self
    }

    /// Left fold of [`Self::remove`] over `txs` (§4.4).
    pub fn remove_many<'a, I>(&mut self, txs: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        for tx in txs {
            self.remove(tx);
        }
        self
    }

    /// Removes `tx` (if present) and records its id in the invalidation
    /// cache so it will not be re-admitted. Three cases (§4.4):
    ///
    /// 1. `tx.id` is registered: behaves like [`Self::remove`], plus records the id.
    /// 2. `tx.id` is not registered, but a stale entry for the same id is
    ///    still physically present in `ordered_transactions` (should not
    ///    happen; handled defensively). Purged without running `update_family`.
    /// 3. Neither: just records the id.
    pub fn invalidate(&mut self, tx: &Transaction) -> &mut Self {
        if let Some(wtx) = self.transactions_registry.get(&tx.id).cloned() {
            self.ordered_transactions.remove(&wtx);
            self.purge_indices(tx);

            let now = ckb_systemtime::unix_time_as_millis();
            self.update_family(tx, -wtx.weight, now, 0);
            self.invalidated_tx_ids.put(&tx.id);
            return self;
        }

        if let Some(stale_key) = self
            .ordered_transactions
            .keys()
            .find(|key| key.id == tx.id)
            .cloned()
        {
            ckb_logger::warn!(
                "ordered-tx-pool: {} was present in ordered_transactions but missing from the registry; purging defensively",
                tx.id
            );
            if let Some(unconfirmed) = self.ordered_transactions.remove(&stale_key) {
                self.purge_indices(&unconfirmed.transaction);
            }
            self.invalidated_tx_ids.put(&tx.id);
            return self;
        }

        self.invalidated_tx_ids.put(&tx.id);
        self
    }

    /// Raises (or, with a negative `delta`, lowers) the weight of every
    /// transaction in `tx`'s family — the set of pooled transactions whose
    /// outputs `tx` spends, transitively — by `delta` (§4.5).
    ///
    /// Self-cancels once `depth` exceeds `max_parent_scan_depth` or once
    /// `start_time` is more than `max_parent_scan_time` in the past,
    /// logging a warning either way; this bounds the worst-case cost of a
    /// single call regardless of the pool's transaction graph. A guard trip
    /// is a budget failure, not a correctness failure: every invariant but
    /// strict weight monotonicity still holds afterward.
    fn update_family(&mut self, tx: &Transaction, delta: i64, start_time: u64, depth: u32) {
        if depth > self.settings.max_parent_scan_depth {
            ckb_logger::warn!(
                "ordered-tx-pool: update_family depth guard tripped at {} for {}",
                depth,
                tx.id
            );
            return;
        }
        let elapsed = ckb_systemtime::unix_time_as_millis().saturating_sub(start_time);
        if elapsed > self.settings.max_parent_scan_time.as_millis() as u64 {
            ckb_logger::warn!(
                "ordered-tx-pool: update_family time guard tripped after {}ms for {}",
                elapsed,
                tx.id
            );
            return;
        }

        // Unique parent keys: dedup by id, so a diamond-shaped family
        // contributes `delta` once per ancestor per call, not once per
        // input edge (§4.5, §9 — a deliberate simplification).
        let mut seen = FxHashSet::default();
        let parent_keys: Vec<WeightedTxId> = tx
            .inputs
            .iter()
            .filter_map(|input| self.outputs.get(&input.referenced_output_id))
            .filter(|wtx| seen.insert(wtx.id))
            .cloned()
            .collect();

        for parent_key in parent_keys {
            let parent_tx = match self.ordered_transactions.get(&parent_key) {
                Some(unconfirmed) => unconfirmed.transaction.clone(),
                None => continue, // stale edge: the parent left the pool already.
            };

            let unconfirmed = match self.ordered_transactions.remove(&parent_key) {
                Some(unconfirmed) => unconfirmed,
                None => continue,
            };
            let new_key = parent_key.with_weight_delta(delta);

            self.transactions_registry.insert(parent_tx.id, new_key.clone());
            for output in &parent_tx.outputs {
                self.outputs.insert(output.id, new_key.clone());
            }
            for input in &parent_tx.inputs {
                self.inputs.insert(input.referenced_output_id, new_key.clone());
            }
            self.ordered_transactions.insert(new_key, unconfirmed);

            self.update_family(&parent_tx, delta, start_time, depth + 1);
        }
    }

    /// Drops the lowest-weight (last-keyed) entry, if any, used by `put`'s
    /// overflow loop. Does not propagate the reversal through
    /// `update_family` — the source only ever evicts one entry per `put`,
    /// a simplification noted in §9's open questions.
    fn evict_one(&mut self) -> Option<Digest32> {
        let victim_key = self.ordered_transactions.keys().next_back().cloned()?;
        let unconfirmed = self.ordered_transactions.remove(&victim_key)?;
        self.purge_indices(&unconfirmed.transaction);
        Some(victim_key.id)
    }

    /// Removes `tx`'s entries from the registry and the outputs/inputs
    /// indices. Does not touch `ordered_transactions`; callers remove that
    /// entry themselves first since they, not this helper, know which key
    /// it currently lives under.
    fn purge_indices(&mut self, tx: &Transaction) {
        self.transactions_registry.remove(&tx.id);
        for output in &tx.outputs {
            self.outputs.remove(&output.id);
        }
        for input in &tx.inputs {
            self.inputs.remove(&input.referenced_output_id);
        }
    }
}

impl std::fmt::Debug for OrderedTxPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedTxPool")
            .field("size", &self.size())
            .field("capacity", &self.settings.mempool_capacity)
            .finish()
    }
}
