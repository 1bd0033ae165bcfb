//! Error types returned by the generator and the base58 codec.

/// Error generating a new identifier.
///
/// None of these are retried internally, and the generator state is left as it was before the
/// failed call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The random number generator could not produce bytes.
    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(rand::Error),

    /// The timestamp is not a 48-bit positive integer.
    #[error("timestamp out of range: {unix_ts_ms}")]
    TimestampOutOfRange { unix_ts_ms: u64 },

    /// The clock moved back further than the rollback allowance.
    #[error("clock moved back from {last_unix_ts_ms} to {unix_ts_ms}")]
    ClockRollback {
        unix_ts_ms: u64,
        last_unix_ts_ms: u64,
    },
}

impl From<rand::Error> for GenerateError {
    fn from(err: rand::Error) -> Self {
        Self::RandomSourceUnavailable(err)
    }
}

/// Error parsing an invalid string representation of hqid7.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The string is not exactly [`ENCODED_LEN`](crate::base58::ENCODED_LEN) bytes long.
    #[error("invalid length: {len}")]
    InvalidLength { len: usize },

    /// The string contains a byte outside the base58 alphabet.
    #[error("invalid digit {byte:#04x} at position {position}")]
    InvalidDigit { byte: u8, position: usize },

    /// The encoded value does not fit in 128 bits.
    #[error("decoded value exceeds 128 bits")]
    Overflow,
}
