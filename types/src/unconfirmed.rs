use crate::transaction::Transaction;

/// A [`Transaction`] together with opaque metadata attached by the caller
/// (e.g. how it was received, a peer id, an acceptance timestamp the node
/// wants to keep around). The pool never inspects `metadata`; it only
/// replaces it wholesale on a duplicate `put` (see `component::pool`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnconfirmedTransaction {
    pub transaction: Transaction,
    pub metadata: Vec<u8>,
}

impl UnconfirmedTransaction {
    pub fn new(transaction: Transaction, metadata: Vec<u8>) -> Self {
        UnconfirmedTransaction {
            transaction,
            metadata,
        }
    }

    pub fn without_metadata(transaction: Transaction) -> Self {
        UnconfirmedTransaction {
            transaction,
            metadata: Vec::new(),
        }
    }
}
