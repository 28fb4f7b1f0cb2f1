//! Type definitions and protocol constants for Fast Pair.

use thiserror::Error;

/// AES-128 key size in bytes. Shared secrets and account keys use this size.
pub const AES_KEY_SIZE: usize = 16;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Nonce size for AES-CTR encryption.
pub const CTR_NONCE_SIZE: usize = 8;

/// Size of a full HMAC-SHA256 tag.
pub const HMAC_SHA256_SIZE: usize = 32;

/// Size of the truncated HMAC tag carried in packets.
pub const TRUNCATED_HMAC_SIZE: usize = 8;

/// HMAC-SHA256 block size, the largest key accepted without hashing.
pub const HMAC_BLOCK_SIZE: usize = 64;

/// Size of a P-256 private scalar.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a P-256 public key on the wire (`x ++ y`, no SEC1 tag).
pub const PUBLIC_KEY_SIZE: usize = 64;

/// Size of the shared secret derived from ECDH.
pub const SHARED_SECRET_SIZE: usize = AES_KEY_SIZE;

/// Size of an account key.
pub const ACCOUNT_KEY_SIZE: usize = AES_KEY_SIZE;

/// Type tag stored in byte 0 of every account key.
pub const ACCOUNT_KEY_TYPE: u8 = 0x04;

/// Size of a Bluetooth public address.
pub const BLUETOOTH_ADDRESS_SIZE: usize = 6;

/// Errors that can occur during Fast Pair crypto operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FastPairError {
    /// Caller supplied a wrong-length key, nonce or payload.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HMAC verification of a packet failed.
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// Public or private key material could not be used for ECDH.
    #[error("Key agreement failed: {0}")]
    KeyAgreement(String),

    /// A history record could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Result type for Fast Pair operations.
pub type Result<T> = std::result::Result<T, FastPairError>;

/// Checks that `key` is exactly one AES-128 key long.
pub(crate) fn check_aes_key(key: &[u8], what: &str) -> Result<()> {
    if key.len() != AES_KEY_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "{}: expected {} bytes, got {}",
            what,
            AES_KEY_SIZE,
            key.len()
        )));
    }
    Ok(())
}
