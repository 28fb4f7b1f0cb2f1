//! Encrypted personalized-name packets.
//!
//! Packet layout:
//! - [0..n]        AES-CTR encrypted UTF-8 name
//! - [n..n+8]      nonce
//! - [n+8..n+16]   first 8 bytes of HMAC-SHA256(secret, nonce ++ ciphertext)

use crate::crypto::{aes_ctr_encrypt_with_nonce, generate_nonce};
use crate::mac::{build, compare_tags, truncate_tag};
use crate::types::{FastPairError, Result, AES_KEY_SIZE, CTR_NONCE_SIZE, TRUNCATED_HMAC_SIZE};

/// Nonce size in a naming packet.
pub const NAMING_NONCE_SIZE: usize = CTR_NONCE_SIZE;

/// Truncated HMAC size in a naming packet.
pub const NAMING_HMAC_SIZE: usize = TRUNCATED_HMAC_SIZE;

/// Maximum length of an encoded name in bytes.
pub const MAX_LENGTH_OF_NAME: usize = 48;

/// Encode `name` into a naming packet keyed with `secret`.
pub fn encode_naming_packet(secret: &[u8], name: &str) -> Result<Vec<u8>> {
    if secret.len() != AES_KEY_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Incorrect secret for encoding name packet, secret.length = {}",
            secret.len()
        )));
    }

    let name_bytes = name.as_bytes();
    if name_bytes.len() > MAX_LENGTH_OF_NAME {
        return Err(FastPairError::InvalidArgument(format!(
            "Name too long: {} bytes (max {})",
            name_bytes.len(),
            MAX_LENGTH_OF_NAME
        )));
    }

    let nonce = generate_nonce();
    let ciphertext = aes_ctr_encrypt_with_nonce(secret, &nonce, name_bytes)?;
    let tag = naming_tag(secret, &nonce, &ciphertext)?;

    let mut packet = Vec::with_capacity(ciphertext.len() + NAMING_NONCE_SIZE + NAMING_HMAC_SIZE);
    packet.extend_from_slice(&ciphertext);
    packet.extend_from_slice(&nonce);
    packet.extend_from_slice(&tag);

    log::debug!("Encoded naming packet of {} bytes", packet.len());
    Ok(packet)
}

/// Verify and decrypt a naming packet.
///
/// Fails with [`FastPairError::Integrity`] if the tag does not match, without
/// decrypting anything.
pub fn decode_naming_packet(secret: &[u8], packet: &[u8]) -> Result<String> {
    if secret.len() != AES_KEY_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Incorrect secret for decoding name packet, secret.length = {}",
            secret.len()
        )));
    }

    let min = NAMING_NONCE_SIZE + NAMING_HMAC_SIZE;
    let max = MAX_LENGTH_OF_NAME + min;
    if packet.len() < min || packet.len() > max {
        return Err(FastPairError::InvalidArgument(format!(
            "naming packet size is incorrect, packet.length = {}",
            packet.len()
        )));
    }

    let (body, tag) = packet.split_at(packet.len() - NAMING_HMAC_SIZE);
    let (ciphertext, nonce) = body.split_at(body.len() - NAMING_NONCE_SIZE);

    let expected = naming_tag(secret, nonce, ciphertext)?;
    if !compare_tags(&expected, tag) {
        log::debug!("Naming packet HMAC mismatch ({} bytes)", packet.len());
        return Err(FastPairError::Integrity(
            "verify HMAC failed, could be incorrect key or naming packet".into(),
        ));
    }

    let plaintext = aes_ctr_encrypt_with_nonce(secret, nonce, ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|_| FastPairError::Integrity("naming packet does not contain UTF-8".into()))
}

fn naming_tag(secret: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<[u8; NAMING_HMAC_SIZE]> {
    let mut data = Vec::with_capacity(nonce.len() + ciphertext.len());
    data.extend_from_slice(nonce);
    data.extend_from_slice(ciphertext);
    Ok(truncate_tag(&build(secret, &data)?))
}
