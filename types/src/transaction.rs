use crate::digest::Digest32;

/// One input of a [`Transaction`]: a reference to an output produced by some
/// earlier transaction (in the pool, in a block, or both).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// The id of the output this input consumes.
    pub referenced_output_id: Digest32,
}

impl TxInput {
    pub const fn new(referenced_output_id: Digest32) -> Self {
        TxInput {
            referenced_output_id,
        }
    }
}

/// One output produced by a [`Transaction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// The id this output is identified by once the transaction lands.
    pub id: Digest32,
    pub value: u64,
    /// The script/proposition the output pays to, as an opaque byte string.
    pub proposition_bytes: Vec<u8>,
}

impl TxOutput {
    pub fn new(id: Digest32, value: u64, proposition_bytes: Vec<u8>) -> Self {
        TxOutput {
            id,
            value,
            proposition_bytes,
        }
    }
}

/// An unconfirmed state transition: consumes previously produced outputs,
/// produces new ones. Created externally by a validation layer that is out
/// of scope for this crate; never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Digest32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// The transaction's cost metric: serialized size in bytes, or an
    /// execution-cost unit, depending on what the embedding node charges
    /// fees against. Used only as the divisor in the weight function.
    pub size_or_cost: u32,
}

impl Transaction {
    pub fn new(
        id: Digest32,
        inputs: Vec<TxInput>,
        outputs: Vec<TxOutput>,
        size_or_cost: u32,
    ) -> Self {
        Transaction {
            id,
            inputs,
            outputs,
            size_or_cost,
        }
    }
}
