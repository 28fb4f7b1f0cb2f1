//! HMAC framing for message stream packets.
//!
//! Message stream packets are authenticated but not encrypted. Two nonces
//! feed the tag: a section nonce shared by a run of messages and supplied by
//! the caller, and a message nonce generated for every packet.
//!
//! Packet layout:
//! - [0..n]        raw message bytes
//! - [n..n+8]      message nonce
//! - [n+8..n+16]   first 8 bytes of HMAC-SHA256(account key, section nonce ++ message nonce ++ message)

use rand::RngCore;

use crate::mac::{build_with_64_byte_key, compare_tags, truncate_tag};
use crate::types::{FastPairError, Result, HMAC_BLOCK_SIZE, TRUNCATED_HMAC_SIZE};

/// Size of the per-packet message nonce.
pub const MESSAGE_NONCE_SIZE: usize = 8;

/// Size of the caller-supplied section nonce.
pub const SECTION_NONCE_SIZE: usize = 8;

/// Truncated HMAC size in a message stream packet.
pub const MESSAGE_STREAM_HMAC_SIZE: usize = TRUNCATED_HMAC_SIZE;

/// Frame `message` with a fresh message nonce and a truncated tag.
pub fn encode_message_packet(
    account_key: &[u8],
    section_nonce: &[u8],
    message: &[u8],
) -> Result<Vec<u8>> {
    check_account_key(account_key)?;
    if section_nonce.len() != SECTION_NONCE_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Section nonce must be {} bytes, got {}",
            SECTION_NONCE_SIZE,
            section_nonce.len()
        )));
    }

    let mut message_nonce = [0u8; MESSAGE_NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut message_nonce);

    let tag = message_tag(account_key, section_nonce, &message_nonce, message)?;

    let mut packet =
        Vec::with_capacity(message.len() + MESSAGE_NONCE_SIZE + MESSAGE_STREAM_HMAC_SIZE);
    packet.extend_from_slice(message);
    packet.extend_from_slice(&message_nonce);
    packet.extend_from_slice(&tag);
    Ok(packet)
}

/// Check the tag of a message stream packet.
///
/// Returns `false` for a wrong key, a wrong section nonce, a tampered packet
/// or a packet too short to be framed. Never fails.
pub fn verify_message_hmac(account_key: &[u8], section_nonce: &[u8], packet: &[u8]) -> bool {
    if check_account_key(account_key).is_err() || section_nonce.len() != SECTION_NONCE_SIZE {
        return false;
    }
    let Some((message, message_nonce, tag)) = split_packet(packet) else {
        return false;
    };

    match message_tag(account_key, section_nonce, message_nonce, message) {
        Ok(expected) => {
            let matched = compare_tags(&expected, tag);
            if !matched {
                log::debug!("Message stream HMAC mismatch ({} bytes)", packet.len());
            }
            matched
        }
        Err(_) => false,
    }
}

/// Raw message bytes of a framed packet, without nonce and tag.
///
/// Only framing is checked; call [`verify_message_hmac`] first.
pub fn strip_message_packet(packet: &[u8]) -> Option<&[u8]> {
    split_packet(packet).map(|(message, _, _)| message)
}

fn split_packet(packet: &[u8]) -> Option<(&[u8], &[u8], &[u8])> {
    let overhead = MESSAGE_NONCE_SIZE + MESSAGE_STREAM_HMAC_SIZE;
    if packet.len() < overhead {
        return None;
    }
    let nonce_start = packet.len() - overhead;
    let tag_start = nonce_start + MESSAGE_NONCE_SIZE;
    Some((
        &packet[..nonce_start],
        &packet[nonce_start..tag_start],
        &packet[tag_start..],
    ))
}

fn check_account_key(account_key: &[u8]) -> Result<()> {
    if account_key.is_empty() || account_key.len() > HMAC_BLOCK_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Account key must be 1 to {} bytes, got {}",
            HMAC_BLOCK_SIZE,
            account_key.len()
        )));
    }
    Ok(())
}

fn message_tag(
    account_key: &[u8],
    section_nonce: &[u8],
    message_nonce: &[u8],
    message: &[u8],
) -> Result<[u8; MESSAGE_STREAM_HMAC_SIZE]> {
    let mut data = Vec::with_capacity(section_nonce.len() + message_nonce.len() + message.len());
    data.extend_from_slice(section_nonce);
    data.extend_from_slice(message_nonce);
    data.extend_from_slice(message);
    Ok(truncate_tag(&build_with_64_byte_key(account_key, &data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_key::create_account_key;
    use crate::mac::build_with_64_byte_key;

    const SECTION_NONCE: [u8; SECTION_NONCE_SIZE] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];

    #[test]
    fn test_encode_and_verify() {
        let key = create_account_key();
        let message = [0x03u8, 0x01, 0x00, 0x02, 0x64, 0x55];

        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, &message).unwrap();
        assert_eq!(
            packet.len(),
            message.len() + MESSAGE_NONCE_SIZE + MESSAGE_STREAM_HMAC_SIZE
        );
        assert_eq!(&packet[..message.len()], &message);

        assert!(verify_message_hmac(key.as_bytes(), &SECTION_NONCE, &packet));
        assert_eq!(strip_message_packet(&packet), Some(&message[..]));
    }

    #[test]
    fn test_tag_layout() {
        let key = create_account_key();
        let message = b"ring";

        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, message).unwrap();
        let message_nonce = &packet[message.len()..message.len() + MESSAGE_NONCE_SIZE];

        let mut data = SECTION_NONCE.to_vec();
        data.extend_from_slice(message_nonce);
        data.extend_from_slice(message);
        let full = build_with_64_byte_key(key.as_bytes(), &data).unwrap();

        assert_eq!(&packet[packet.len() - MESSAGE_STREAM_HMAC_SIZE..], &full[..8]);
    }

    #[test]
    fn test_changed_account_key_fails() {
        let key = create_account_key();
        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, b"status").unwrap();

        let other = create_account_key();
        assert!(!verify_message_hmac(other.as_bytes(), &SECTION_NONCE, &packet));
    }

    #[test]
    fn test_changed_section_nonce_fails() {
        let key = create_account_key();
        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, b"status").unwrap();

        let mut other_nonce = SECTION_NONCE;
        other_nonce[0] ^= 0x01;
        assert!(!verify_message_hmac(key.as_bytes(), &other_nonce, &packet));
    }

    #[test]
    fn test_every_bit_flip_is_detected() {
        let key = create_account_key();
        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, b"status").unwrap();

        for byte in 0..packet.len() {
            for bit in 0..8 {
                let mut tampered = packet.clone();
                tampered[byte] ^= 1 << bit;
                assert!(!verify_message_hmac(key.as_bytes(), &SECTION_NONCE, &tampered));
            }
        }
    }

    #[test]
    fn test_fresh_message_nonce() {
        let key = create_account_key();
        let first = encode_message_packet(key.as_bytes(), &SECTION_NONCE, b"same").unwrap();
        let second = encode_message_packet(key.as_bytes(), &SECTION_NONCE, b"same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_message() {
        let key = create_account_key();
        let packet = encode_message_packet(key.as_bytes(), &SECTION_NONCE, &[]).unwrap();
        assert_eq!(packet.len(), MESSAGE_NONCE_SIZE + MESSAGE_STREAM_HMAC_SIZE);
        assert!(verify_message_hmac(key.as_bytes(), &SECTION_NONCE, &packet));
        assert_eq!(strip_message_packet(&packet), Some(&[][..]));
    }

    #[test]
    fn test_short_packet_does_not_verify() {
        let key = create_account_key();
        assert!(!verify_message_hmac(key.as_bytes(), &SECTION_NONCE, &[0u8; 15]));
        assert!(!verify_message_hmac(key.as_bytes(), &SECTION_NONCE, &[]));
        assert_eq!(strip_message_packet(&[0u8; 15]), None);
    }

    #[test]
    fn test_invalid_arguments() {
        let key = create_account_key();

        let result = encode_message_packet(key.as_bytes(), &[0u8; 4], b"data");
        assert!(matches!(result, Err(FastPairError::InvalidArgument(_))));

        let result = encode_message_packet(&[], &SECTION_NONCE, b"data");
        assert!(matches!(result, Err(FastPairError::InvalidArgument(_))));

        let result = encode_message_packet(&[0u8; 65], &SECTION_NONCE, b"data");
        assert!(matches!(result, Err(FastPairError::InvalidArgument(_))));

        assert!(!verify_message_hmac(&[0u8; 65], &SECTION_NONCE, &[0u8; 32]));
    }
}
