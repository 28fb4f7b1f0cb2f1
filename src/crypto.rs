//! AES-128 encryption primitives for Fast Pair.
//!
//! Two modes are provided: a single-block ECB primitive for fixed 16-byte
//! payloads, and the Fast Pair flavor of CTR mode for variable-length data.
//! The CTR counter block for block `i` is `i (1 byte) ++ 0x00 * 7 ++ nonce (8 bytes)`.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use rand::RngCore;

use crate::types::{
    check_aes_key, FastPairError, Result, AES_BLOCK_SIZE, AES_KEY_SIZE, CTR_NONCE_SIZE,
};

/// Generate a random AES-128 key.
pub fn generate_key() -> [u8; AES_KEY_SIZE] {
    let mut key = [0u8; AES_KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Generate a random CTR nonce.
pub fn generate_nonce() -> [u8; CTR_NONCE_SIZE] {
    let mut nonce = [0u8; CTR_NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

fn new_cipher(key: &[u8]) -> Result<Aes128> {
    check_aes_key(key, "Invalid AES key")?;
    Aes128::new_from_slice(key)
        .map_err(|e| FastPairError::InvalidArgument(format!("Cipher init failed: {}", e)))
}

fn single_block(data: &[u8], what: &str) -> Result<[u8; AES_BLOCK_SIZE]> {
    if data.len() > AES_BLOCK_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "{}: {} bytes exceeds one block ({} bytes)",
            what,
            data.len(),
            AES_BLOCK_SIZE
        )));
    }
    let mut block = [0u8; AES_BLOCK_SIZE];
    block[..data.len()].copy_from_slice(data);
    Ok(block)
}

/// Encrypt at most one block with AES-128-ECB.
///
/// Input shorter than a block is zero-padded; longer input is rejected.
pub fn aes_ecb_encrypt(key: &[u8], plaintext: &[u8]) -> Result<[u8; AES_BLOCK_SIZE]> {
    let cipher = new_cipher(key)?;
    let mut block = single_block(plaintext, "Plaintext too large for single block encryption")?;
    cipher.encrypt_block(GenericArray::from_mut_slice(&mut block));
    Ok(block)
}

/// Decrypt exactly one block with AES-128-ECB.
pub fn aes_ecb_decrypt(key: &[u8], ciphertext: &[u8]) -> Result<[u8; AES_BLOCK_SIZE]> {
    let cipher = new_cipher(key)?;
    let mut block: [u8; AES_BLOCK_SIZE] = ciphertext.try_into().map_err(|_| {
        FastPairError::InvalidArgument(format!(
            "Ciphertext must be exactly one block ({} bytes), got {}",
            AES_BLOCK_SIZE,
            ciphertext.len()
        ))
    })?;
    cipher.decrypt_block(GenericArray::from_mut_slice(&mut block));
    Ok(block)
}

/// Encrypt with a fresh random nonce.
///
/// # Returns
/// `nonce (8 bytes) ++ ciphertext`, where the ciphertext has the plaintext's length.
pub fn aes_ctr_encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = generate_nonce();
    let ciphertext = aes_ctr_encrypt_with_nonce(key, &nonce, plaintext)?;

    let mut data = Vec::with_capacity(CTR_NONCE_SIZE + ciphertext.len());
    data.extend_from_slice(&nonce);
    data.extend_from_slice(&ciphertext);
    Ok(data)
}

/// Decrypt `nonce ++ ciphertext` produced by [`aes_ctr_encrypt`].
pub fn aes_ctr_decrypt(key: &[u8], nonce_and_ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_aes_key(key, "Invalid AES key")?;
    if nonce_and_ciphertext.len() < CTR_NONCE_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "incorrect data length: {} bytes (minimum {})",
            nonce_and_ciphertext.len(),
            CTR_NONCE_SIZE
        )));
    }

    let (nonce, ciphertext) = nonce_and_ciphertext.split_at(CTR_NONCE_SIZE);
    aes_ctr_encrypt_with_nonce(key, nonce, ciphertext)
}

/// Apply the CTR keystream for `nonce` to `data`.
///
/// Encryption and decryption are the same operation.
///
/// # Security
/// Reusing a nonce with the same key exposes the XOR of both plaintexts.
/// Only pass a nonce read from a received packet, or one drawn by
/// [`generate_nonce`]; to encrypt, prefer [`aes_ctr_encrypt`], which always
/// draws a fresh nonce.
pub fn aes_ctr_encrypt_with_nonce(key: &[u8], nonce: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != CTR_NONCE_SIZE {
        return Err(FastPairError::InvalidArgument(format!(
            "Nonce must be {} bytes, got {}",
            CTR_NONCE_SIZE,
            nonce.len()
        )));
    }
    // The block index is a single byte of the counter block.
    if data.len() > AES_BLOCK_SIZE * 256 {
        return Err(FastPairError::InvalidArgument(format!(
            "Data too large for CTR mode: {} bytes",
            data.len()
        )));
    }
    let cipher = new_cipher(key)?;

    let mut output = Vec::with_capacity(data.len());
    for (index, chunk) in data.chunks(AES_BLOCK_SIZE).enumerate() {
        let mut counter = [0u8; AES_BLOCK_SIZE];
        counter[0] = index as u8;
        counter[AES_BLOCK_SIZE - CTR_NONCE_SIZE..].copy_from_slice(nonce);
        cipher.encrypt_block(GenericArray::from_mut_slice(&mut counter));

        output.extend(chunk.iter().zip(counter.iter()).map(|(d, k)| d ^ k));
    }
    Ok(output)
}
