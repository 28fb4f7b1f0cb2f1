//! P-256 key pairs and ECDH shared secret derivation for Fast Pair.

use std::fmt;

use p256::ecdh::diffie_hellman;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::{
    FastPairError, Result, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SHARED_SECRET_SIZE,
};

/// SEC1 tag of an uncompressed point.
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// 16-byte secret shared by both sides of a key exchange.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Raw secret bytes, usable as an AES-128 or HMAC key.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// A P-256 key pair used for one key exchange.
#[derive(Clone)]
pub struct EcdhKeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl EcdhKeyPair {
    /// Generate a fresh random key pair.
    pub fn create() -> Self {
        let secret = SecretKey::random(&mut rand::thread_rng());
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Restore a key pair from a stored 32-byte private scalar.
    ///
    /// The public key is re-derived from the scalar.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self> {
        if private_key.len() != PRIVATE_KEY_SIZE {
            return Err(FastPairError::KeyAgreement(format!(
                "Private key must be {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                private_key.len()
            )));
        }

        let secret = SecretKey::from_slice(private_key)
            .map_err(|e| FastPairError::KeyAgreement(format!("Invalid private key: {}", e)))?;
        let public = secret.public_key();
        Ok(Self { secret, public })
    }

    /// Private scalar, big-endian, for persisting the key pair.
    pub fn private_key(&self) -> [u8; PRIVATE_KEY_SIZE] {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        bytes.copy_from_slice(&self.secret.to_bytes());
        bytes
    }

    /// Public key as sent to the peer: uncompressed `x ++ y` without the SEC1 tag.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let point = self.public.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        bytes
    }

    /// Derive the shared secret with a peer's public key.
    ///
    /// The secret is the first 16 bytes of SHA-256 over the ECDH x-coordinate.
    /// `remote_public_key` may be 64 bytes (`x ++ y`), 65 bytes (SEC1 tagged),
    /// or 63 bytes when the peer dropped a leading zero byte.
    pub fn generate_secret(&self, remote_public_key: &[u8]) -> Result<SharedSecret> {
        let remote = parse_public_key(remote_public_key)?;

        let shared = diffie_hellman(self.secret.to_nonzero_scalar(), remote.as_affine());
        let digest = Sha256::digest(shared.raw_secret_bytes());

        let mut secret = [0u8; SHARED_SECRET_SIZE];
        secret.copy_from_slice(&digest[..SHARED_SECRET_SIZE]);
        Ok(SharedSecret(secret))
    }
}

impl fmt::Debug for EcdhKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdhKeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

/// Restore a public key that lost its leading zero byte on the peer side.
///
/// Some accessories serialize the x-coordinate as a minimal big-endian
/// integer, so a key whose first byte is zero arrives one byte short.
pub fn correct_short_public_key(public_key: &[u8]) -> Result<[u8; PUBLIC_KEY_SIZE]> {
    if public_key.len() != PUBLIC_KEY_SIZE - 1 {
        return Err(FastPairError::KeyAgreement(format!(
            "Short public key must be {} bytes, got {}",
            PUBLIC_KEY_SIZE - 1,
            public_key.len()
        )));
    }

    log::warn!("Correcting {}-byte public key by prepending a zero byte", public_key.len());
    let mut corrected = [0u8; PUBLIC_KEY_SIZE];
    corrected[1..].copy_from_slice(public_key);
    Ok(corrected)
}

/// Decode a peer public key into a point on P-256.
fn parse_public_key(public_key: &[u8]) -> Result<PublicKey> {
    let mut sec1 = [0u8; PUBLIC_KEY_SIZE + 1];
    sec1[0] = SEC1_UNCOMPRESSED_TAG;

    match public_key.len() {
        PUBLIC_KEY_SIZE => sec1[1..].copy_from_slice(public_key),
        len if len == PUBLIC_KEY_SIZE - 1 => {
            sec1[1..].copy_from_slice(&correct_short_public_key(public_key)?)
        }
        len if len == PUBLIC_KEY_SIZE + 1 && public_key[0] == SEC1_UNCOMPRESSED_TAG => {
            sec1.copy_from_slice(public_key)
        }
        len => {
            return Err(FastPairError::KeyAgreement(format!(
                "Public key must be {} bytes, got {}",
                PUBLIC_KEY_SIZE, len
            )))
        }
    }

    PublicKey::from_sec1_bytes(&sec1)
        .map_err(|e| FastPairError::KeyAgreement(format!("Invalid public key point: {}", e)))
}
