//! An in-memory weighted transaction mempool for a UTXO-based node.
//!
//! [`OrderedTxPool`] holds a bounded set of unconfirmed transactions
//! ordered by fee density, and raises a parent transaction's effective
//! weight whenever a pooled child spends one of its outputs, so a parent
//! can never be evicted out from under its children. Validation, chain
//! state, gossip, serialization, node configuration and block assembly are
//! all external collaborators this crate knows nothing about — it only
//! consumes the [`Transaction`](ordered_tx_pool_types::Transaction) shape
//! they hand it.

pub mod component;
pub mod config;

pub use component::invalidated::ApproxExpiringCache;
pub use component::pool::OrderedTxPool;
pub use component::weighted::{weighted, WeightedTxId};
pub use config::{MonetarySettings, NodeSettings, PoolConfigError};

pub use ordered_tx_pool_types::{Digest32, Transaction, TxInput, TxOutput, UnconfirmedTransaction};
