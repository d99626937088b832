use std::sync::{Mutex, MutexGuard};

use ordered_tx_pool_types::{Digest32, Transaction, TxInput, TxOutput, UnconfirmedTransaction};

use crate::config::{MonetarySettings, NodeSettings};
use crate::OrderedTxPool;

/// `enable_faketime` (turned on for this crate's whole test binary, see
/// `tx-pool/Cargo.toml`'s dev-dependency on `ckb-systemtime`) makes
/// `ckb_systemtime::unix_time_as_millis` read a single process-wide clock
/// override (`util/systemtime/src/faketime.rs`'s `FAKETIME_ENABLED`/
/// `FAKETIME_MILLIS` statics). `component::tests::invalidated`'s tests flip
/// that override; every other test in this binary calls `put`/`remove`/
/// `update_family`, which read the same clock, assuming it tracks real wall
/// time. Under cargo test's default multi-threaded runner those two kinds of
/// tests can interleave and corrupt each other's `created_at`/elapsed-time
/// readings. Every test in `component::tests` acquires this lock for its
/// duration so the two families never run concurrently.
static TEST_CLOCK_LOCK: Mutex<()> = Mutex::new(());

/// Acquire before any test that reads or writes the process clock (directly
/// via `ckb_systemtime::faketime()`, or indirectly via a pool mutator).
/// Recovers from a poisoned lock rather than propagating the poison, so one
/// panicking test does not fail every test after it.
pub(crate) fn lock_test_clock() -> MutexGuard<'static, ()> {
    TEST_CLOCK_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) const FEE_PROPOSITION: &[u8] = b"fee-recipient";

/// `fee_factor` chosen so `fee_per_factor = fee * 1024 / fee_factor == fee`,
/// letting tests name a transaction's intended weight directly instead of
/// reverse-engineering it from the 1024 scaling constant.
pub(crate) const UNIT_FEE_FACTOR: u32 = 1024;

pub(crate) fn digest(byte: u8) -> Digest32 {
    Digest32::new([byte; 32])
}

pub(crate) fn monetary() -> MonetarySettings {
    MonetarySettings::new(FEE_PROPOSITION.to_vec())
}

pub(crate) fn node_settings(capacity: u32) -> NodeSettings {
    NodeSettings::new(capacity, 1_000, std::time::Duration::from_secs(60))
}

pub(crate) fn test_pool(capacity: u32) -> OrderedTxPool {
    OrderedTxPool::new(node_settings(capacity), monetary()).expect("valid test config")
}

/// Installs `env_logger` so a test exercising a `ckb_logger::warn!` path
/// (the `update_family` guards, the internal-inconsistency checks in `get`
/// and `invalidate`) can have its warning observed with
/// `cargo test -- --nocapture` instead of running silently. Safe to call
/// from more than one test in the same binary; `try_init` just reports
/// `Err` on the second call, which is ignored.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A transaction named `id_byte`, consuming `spends` output ids and
/// producing one fee output of `fee_value` (id `id_byte | 0x80`, to keep it
/// distinct from every plain input/output id used in a test) plus whatever
/// `extra_outputs` the caller wants.
pub(crate) fn tx_with_fee(
    id_byte: u8,
    fee_value: u64,
    spends: Vec<u8>,
    extra_outputs: Vec<TxOutput>,
) -> Transaction {
    let mut outputs = vec![TxOutput::new(
        digest(id_byte | 0x80),
        fee_value,
        FEE_PROPOSITION.to_vec(),
    )];
    outputs.extend(extra_outputs);
    Transaction::new(
        digest(id_byte),
        spends.into_iter().map(|b| TxInput::new(digest(b))).collect(),
        outputs,
        100,
    )
}

pub(crate) fn non_fee_output(id_byte: u8, value: u64) -> TxOutput {
    TxOutput::new(digest(id_byte), value, b"not-the-fee-proposition".to_vec())
}

pub(crate) fn unconfirmed(tx: Transaction) -> UnconfirmedTransaction {
    UnconfirmedTransaction::without_metadata(tx)
}

pub(crate) fn unconfirmed_with_metadata(tx: Transaction, metadata: &[u8]) -> UnconfirmedTransaction {
    UnconfirmedTransaction::new(tx, metadata.to_vec())
}
