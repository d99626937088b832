//! Value types the mempool consumes from its external collaborators.
//!
//! Nothing in this crate performs validation, signature checking or I/O;
//! `Transaction` is the shape a (generic) validation layer is expected to
//! hand the pool once it has already decided the transaction is
//! well-formed.

mod digest;
mod transaction;
mod unconfirmed;

pub use digest::{Digest32, FromSliceError};
pub use transaction::{Transaction, TxInput, TxOutput};
pub use unconfirmed::UnconfirmedTransaction;
