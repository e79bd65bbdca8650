use alloy_primitives::Address;

/// Rejections raised by the relayer guards.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StakingError {
    /// The address is reserved for the relayer system contract.
    #[error("addr error: {0} is a forbidden address")]
    ForbiddenAddress(Address),
    /// A vote key must be a 65-byte uncompressed point.
    #[error("invalid public key length: expected 65 bytes, got {0}")]
    InvalidPublicKeyLength(usize),
    /// The bytes do not describe a point on secp256k1.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[from] secp256k1::Error),
    /// An epoch range would cover more epochs than a single query may return.
    #[error("range [{begin}, {end}] covers {epochs} epochs, at most {max} allowed")]
    EpochRangeTooWide { begin: u64, end: u64, epochs: u64, max: u64 },
    /// Adding a reward to an existing entry overflowed 256 bits.
    #[error("reward amount overflow for {0}")]
    AmountOverflow(Address),
}
