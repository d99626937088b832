//! The weighted transaction key (§4.2) and the weight function (§4.3).

use std::cmp::Ordering;

use ordered_tx_pool_types::{Digest32, Transaction};

use crate::config::MonetarySettings;

/// `(id, weight, fee_per_factor, created_at)`.
///
/// Equality and hashing look at `id` alone: a transaction's weight changes
/// over its lifetime in the pool (see `component::pool::update_family`),
/// but it is still "the same entry" as far as the registry index is
/// concerned. Ordering, by contrast, is `(-weight, id)` — used only by the
/// ordered index, never by the registry's `HashMap`.
#[derive(Clone, Debug)]
pub struct WeightedTxId {
    pub id: Digest32,
    pub weight: i64,
    pub fee_per_factor: i64,
    pub created_at: u64,
}

impl WeightedTxId {
    pub fn new(id: Digest32, weight: i64, fee_per_factor: i64, created_at: u64) -> Self {
        WeightedTxId {
            id,
            weight,
            fee_per_factor,
            created_at,
        }
    }

    /// Builds the re-keyed entry `update_family` installs for a parent
    /// whose weight just moved by `delta`: same id, same `fee_per_factor`
    /// and `created_at`, weight saturating-added (§4.3: "saturate on
    /// overflow").
    pub fn with_weight_delta(&self, delta: i64) -> Self {
        WeightedTxId {
            id: self.id,
            weight: self.weight.saturating_add(delta),
            fee_per_factor: self.fee_per_factor,
            created_at: self.created_at,
        }
    }
}

impl PartialEq for WeightedTxId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WeightedTxId {}

impl std::hash::Hash for WeightedTxId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Ordering for the ordered index: highest weight first, ties broken by id
/// ascending. Implemented as `(-weight, id)` so the map's natural ascending
/// iteration already yields highest-priority-first; the *last* key under
/// this order is always the eviction victim.
impl Ord for WeightedTxId {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for WeightedTxId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn fee_per_factor(fee: u64, fee_factor: u32) -> i64 {
    debug_assert!(fee_factor > 0, "fee_factor must be asserted > 0 at the boundary");
    // 64-bit signed arithmetic per §4.3/§7; saturate rather than panic on
    // overflow, which in practice only a pathologically large `fee` could
    // trigger.
    let fee = fee as i64;
    let scaled = fee.saturating_mul(1024);
    scaled / i64::from(fee_factor.max(1))
}

/// Sums the value of every output paying to `monetary.fee_proposition_bytes`.
fn fee(tx: &Transaction, monetary: &MonetarySettings) -> u64 {
    tx.outputs
        .iter()
        .filter(|output| output.proposition_bytes == monetary.fee_proposition_bytes)
        .map(|output| output.value)
        .fold(0u64, |acc, value| acc.saturating_add(value))
}

/// Computes the initial [`WeightedTxId`] for `tx` at `fee_factor` (§4.3).
/// `weight` starts out equal to `fee_per_factor`; `component::pool::put`
/// raises it afterwards via `update_family` as descendants are admitted.
///
/// There is deliberately only one arity here (over `&Transaction`); the
/// source's second arity over `UnconfirmedTransaction` computed the same
/// value off `unconfirmed.transaction`, so callers holding an
/// `UnconfirmedTransaction` just pass `&unconfirmed.transaction`.
pub fn weighted(tx: &Transaction, fee_factor: u32, monetary: &MonetarySettings, created_at: u64) -> WeightedTxId {
    let fpf = fee_per_factor(fee(tx, monetary), fee_factor);
    WeightedTxId::new(tx.id, fpf, fpf, created_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> Digest32 {
        Digest32::new([byte; 32])
    }

    fn key(id_byte: u8, weight: i64) -> WeightedTxId {
        WeightedTxId::new(id(id_byte), weight, weight, 0)
    }

    #[test]
    fn equality_and_hash_ignore_weight() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = key(1, 10);
        let b = key(1, 999);
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn ordering_is_highest_weight_first_then_id() {
        let mut keys = vec![key(2, 10), key(1, 20), key(3, 20)];
        keys.sort();
        let ids: Vec<u8> = keys.iter().map(|k| k.id.as_bytes()[0]).collect();
        // weight 20 before weight 10; among the two weight-20 entries, id 1 before id 3.
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn with_weight_delta_saturates() {
        let k = key(1, i64::MAX - 1);
        let bumped = k.with_weight_delta(10);
        assert_eq!(bumped.weight, i64::MAX);
        assert_eq!(bumped.id, k.id);
        assert_eq!(bumped.fee_per_factor, k.fee_per_factor);
    }

    #[test]
    fn weight_is_fee_times_1024_over_fee_factor() {
        let monetary = MonetarySettings::new(b"fee".to_vec());
        let tx = Transaction::new(
            id(9),
            vec![],
            vec![
                ordered_tx_pool_types::TxOutput::new(id(1), 100, b"fee".to_vec()),
                ordered_tx_pool_types::TxOutput::new(id(2), 50, b"not-fee".to_vec()),
            ],
            10,
        );
        let wtx = weighted(&tx, 1, &monetary, 0);
        assert_eq!(wtx.fee_per_factor, (100 * 1024) / 1);
        assert_eq!(wtx.weight, wtx.fee_per_factor);
    }
}
