//! HMAC-SHA256 tags and constant-time tag comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::types::{
    check_aes_key, FastPairError, Result, HMAC_BLOCK_SIZE, HMAC_SHA256_SIZE,
    TRUNCATED_HMAC_SIZE,
};

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 with a 16-byte key.
///
/// The key is zero-extended to the 64-byte block size before the pad XOR.
pub fn build(key: &[u8], data: &[u8]) -> Result<[u8; HMAC_SHA256_SIZE]> {
    check_aes_key(key, "Invalid HMAC key")?;
    compute(key, data)
}

/// Compute HMAC-SHA256 with block-sized key material.
///
/// Used by the message stream, where the key is an account key that may be
/// extended with additional context up to 64 bytes.
pub fn build_with_64_byte_key(key: &[u8], data: &[u8]) -> Result<[u8; HMAC_SHA256_SIZE]> {
    if key.len() > HMAC_BLOCK_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "HMAC key must be at most {} bytes, got {}",
            HMAC_BLOCK_SIZE,
            key.len()
        )));
    }
    compute(key, data)
}

fn compute(key: &[u8], data: &[u8]) -> Result<[u8; HMAC_SHA256_SIZE]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| FastPairError::InvalidArgument(format!("HMAC init failed: {}", e)))?;
    mac.update(data);

    let mut tag = [0u8; HMAC_SHA256_SIZE];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// First bytes of a full tag, as carried on the wire.
pub fn truncate_tag(tag: &[u8; HMAC_SHA256_SIZE]) -> [u8; TRUNCATED_HMAC_SIZE] {
    let mut truncated = [0u8; TRUNCATED_HMAC_SIZE];
    truncated.copy_from_slice(&tag[..TRUNCATED_HMAC_SIZE]);
    truncated
}

/// Compare two tags without an early exit on the first differing byte.
///
/// Tags of different lengths never match.
pub fn compare_tags(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "0123456789ABCDEF0123456789ABCDEF";
    const DATA_HEX: &str =
        "0001020304050607EE4A2483738052E44E9B2A145E5DDFAA44B9E5536AF438E1E5C6";
    const HMAC_HEX: &str = "55EC5E6055AF6E92618B7D8710D4413709AB5DA27CA26A66F52E5AD4E8209052";

    #[test]
    fn test_build_known_answer() {
        let key = hex::decode(KEY_HEX).unwrap();
        let data = hex::decode(DATA_HEX).unwrap();

        let tag = build(&key, &data).unwrap();
        assert_eq!(hex::encode_upper(tag), HMAC_HEX);
        assert_eq!(hex::encode_upper(truncate_tag(&tag)), "55EC5E6055AF6E92");
    }

    #[test]
    fn test_manual_construction_matches() {
        use sha2::Digest;

        let key = hex::decode(KEY_HEX).unwrap();
        let data = b"manual hmac";

        let mut padded = [0u8; HMAC_BLOCK_SIZE];
        padded[..key.len()].copy_from_slice(&key);
        let ipad: Vec<u8> = padded.iter().map(|b| b ^ 0x36).collect();
        let opad: Vec<u8> = padded.iter().map(|b| b ^ 0x5c).collect();

        let inner = Sha256::new().chain_update(&ipad).chain_update(data).finalize();
        let outer = Sha256::new().chain_update(&opad).chain_update(inner).finalize();

        assert_eq!(build(&key, data).unwrap().as_slice(), outer.as_slice());
    }

    #[test]
    fn test_build_rejects_wrong_key_length() {
        for len in [0usize, 15, 17, 32, 64] {
            let result = build(&vec![0u8; len], b"data");
            assert!(matches!(result, Err(FastPairError::InvalidArgument(_))), "len {}", len);
        }
    }

    #[test]
    fn test_64_byte_key_matches_zero_extended_key() {
        let key = hex::decode(KEY_HEX).unwrap();
        let mut extended = [0u8; HMAC_BLOCK_SIZE];
        extended[..key.len()].copy_from_slice(&key);

        let short = build_with_64_byte_key(&key, b"payload").unwrap();
        let full = build_with_64_byte_key(&extended, b"payload").unwrap();
        assert_eq!(short, full);
        assert_eq!(short, build(&key, b"payload").unwrap());
    }

    #[test]
    fn test_64_byte_key_rejects_oversized_key() {
        let result = build_with_64_byte_key(&[0u8; HMAC_BLOCK_SIZE + 1], b"data");
        assert!(matches!(result, Err(FastPairError::InvalidArgument(_))));
    }

    #[test]
    fn test_compare_tags() {
        let a = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut b = a;
        assert!(compare_tags(&a, &b));

        b[7] ^= 0x01;
        assert!(!compare_tags(&a, &b));

        assert!(!compare_tags(&a, &a[..7]));
        assert!(compare_tags(&[], &[]));
    }
}
