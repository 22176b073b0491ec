//! Error type shared by every module of the crate.

/// Errors returned by the cipher, encoding and key handling routines.
///
/// Every variant is a contract violation: none of them is transient and
/// none should be retried with the same input.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid block length: expected {expected} bytes, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },

    #[error("invalid AES key length: {0} bytes (must be 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("invalid padding block size: {0} bytes (must be between 1 and 256)")]
    InvalidBlockSize(usize),

    #[error("padding is missing or corrupted")]
    MalformedPadding,

    #[error("unsupported encoding version {0}")]
    UnsupportedVersion(u8),

    #[error("encoded stream is truncated")]
    TruncatedEncoding,

    #[error("expected {expected} encoded fields, found {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("field of {0} bytes does not fit a 32-bit length prefix")]
    FieldTooLong(usize),

    #[error("invalid prime size: {actual} bits (must be a multiple of 8 in {min}..={max})")]
    InvalidPrimeSize { min: usize, max: usize, actual: usize },

    #[error("invalid prime size: {0} bytes (must be at least 1)")]
    InvalidPrimeByteSize(usize),

    #[error("Miller-Rabin accuracy must be at least 1 round")]
    InvalidAccuracy,

    #[error("random integer range is empty")]
    EmptyRange,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(&'static str),

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(&'static str),

    #[error("malformed signature")]
    MalformedSignature,

    #[error("element has no modular inverse")]
    NotInvertible,
}

pub type Result<T> = std::result::Result<T, Error>;
