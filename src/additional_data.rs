//! Encrypted additional-data packets.
//!
//! Same frame as a naming packet, but the payload is opaque binary data with
//! its own size bound: `ciphertext ++ nonce (8) ++ truncated HMAC (8)`.

use crate::crypto::{aes_ctr_encrypt_with_nonce, generate_nonce};
use crate::mac::{build, compare_tags, truncate_tag};
use crate::types::{FastPairError, Result, AES_KEY_SIZE, CTR_NONCE_SIZE, TRUNCATED_HMAC_SIZE};

/// Nonce size in an additional-data packet.
pub const ADDITIONAL_DATA_NONCE_SIZE: usize = CTR_NONCE_SIZE;

/// Truncated HMAC size in an additional-data packet.
pub const ADDITIONAL_DATA_HMAC_SIZE: usize = TRUNCATED_HMAC_SIZE;

/// Maximum length of the additional data in bytes.
pub const MAX_LENGTH_OF_DATA: usize = 64;

/// Encrypt and authenticate `data` with `secret`.
pub fn encode_additional_data_packet(secret: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if secret.len() != AES_KEY_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Incorrect secret for encoding additional data packet, secret.length = {}",
            secret.len()
        )));
    }
    if data.len() > MAX_LENGTH_OF_DATA {
        return Err(FastPairError::InvalidArgument(format!(
            "Additional data too long: {} bytes (max {})",
            data.len(),
            MAX_LENGTH_OF_DATA
        )));
    }

    let nonce = generate_nonce();
    let ciphertext = aes_ctr_encrypt_with_nonce(secret, &nonce, data)?;

    let mut authenticated = Vec::with_capacity(ADDITIONAL_DATA_NONCE_SIZE + ciphertext.len());
    authenticated.extend_from_slice(&nonce);
    authenticated.extend_from_slice(&ciphertext);
    let tag = truncate_tag(&build(secret, &authenticated)?);

    let mut packet = ciphertext;
    packet.extend_from_slice(&nonce);
    packet.extend_from_slice(&tag);

    log::debug!("Encoded additional data packet of {} bytes", packet.len());
    Ok(packet)
}

/// Verify and decrypt an additional-data packet.
pub fn decode_additional_data_packet(secret: &[u8], packet: &[u8]) -> Result<Vec<u8>> {
    if secret.len() != AES_KEY_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Incorrect secret for decoding additional data packet, secret.length = {}",
            secret.len()
        )));
    }

    let overhead = ADDITIONAL_DATA_NONCE_SIZE + ADDITIONAL_DATA_HMAC_SIZE;
    if packet.len() < overhead || packet.len() > MAX_LENGTH_OF_DATA + overhead {
        return Err(FastPairError::InvalidArgument(format!(
            "additional data packet size is incorrect, packet.length = {}",
            packet.len()
        )));
    }

    let tag_start = packet.len() - ADDITIONAL_DATA_HMAC_SIZE;
    let nonce_start = tag_start - ADDITIONAL_DATA_NONCE_SIZE;
    let ciphertext = &packet[..nonce_start];
    let nonce = &packet[nonce_start..tag_start];
    let tag = &packet[tag_start..];

    let mut authenticated = Vec::with_capacity(tag_start);
    authenticated.extend_from_slice(nonce);
    authenticated.extend_from_slice(ciphertext);
    let expected = truncate_tag(&build(secret, &authenticated)?);

    if !compare_tags(&expected, tag) {
        log::debug!("Additional data packet HMAC mismatch ({} bytes)", packet.len());
        return Err(FastPairError::Integrity(
            "verify HMAC failed, could be incorrect key or additional data packet".into(),
        ));
    }

    aes_ctr_encrypt_with_nonce(secret, nonce, ciphertext)
}
