use std::fmt;

/// A fixed-size 32-byte digest: a transaction id or an output id.
///
/// Equality, hashing and ordering are all plain byte comparisons — this is
/// the type `WeightedTxId`'s tie-break ("id in ascending byte order", see
/// `component::weighted`) relies on, so it derives `Ord` rather than
/// defining a bespoke comparator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest32([u8; 32]);

/// Returned by [`Digest32::from_slice`] when the input is not exactly 32
/// bytes long.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected a 32-byte digest, got {0} bytes")]
pub struct FromSliceError(pub usize);

impl Digest32 {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Digest32(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, FromSliceError> {
        if bytes.len() != 32 {
            return Err(FromSliceError(bytes.len()));
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        Ok(Digest32(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Digest32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest32 {
    fn from(bytes: [u8; 32]) -> Self {
        Digest32(bytes)
    }
}

fn write_hex(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut buf = [0u8; 64];
    faster_hex::hex_encode(bytes, &mut buf).expect("64-byte buffer fits a 32-byte digest");
    f.write_str(std::str::from_utf8(&buf).expect("hex output is always valid UTF-8"))
}

impl fmt::Debug for Digest32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest32(0x")?;
        write_hex(&self.0, f)?;
        write!(f, ")")
    }
}

impl fmt::Display for Digest32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(&self.0, f)
    }
}
