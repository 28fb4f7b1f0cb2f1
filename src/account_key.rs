//! Account key generation.

use std::fmt;

use rand::RngCore;

use crate::types::{FastPairError, Result, ACCOUNT_KEY_SIZE, ACCOUNT_KEY_TYPE};

/// A 16-byte account key binding an accessory to a user account.
///
/// Byte 0 is always [`ACCOUNT_KEY_TYPE`]; the remaining 15 bytes are random.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountKey([u8; ACCOUNT_KEY_SIZE]);

impl AccountKey {
    /// Wrap stored account key bytes, checking size and type tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; ACCOUNT_KEY_SIZE] = bytes.try_into().map_err(|_| {
            FastPairError::InvalidArgument(format!(
                "Account key must be {} bytes, got {}",
                ACCOUNT_KEY_SIZE,
                bytes.len()
            ))
        })?;
        if key[0] != ACCOUNT_KEY_TYPE {
            return Err(FastPairError::InvalidArgument(format!(
                "Account key type must be {:#04x}, got {:#04x}",
                ACCOUNT_KEY_TYPE, key[0]
            )));
        }
        Ok(Self(key))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountKey(..)")
    }
}

/// Create a new random account key.
pub fn create_account_key() -> AccountKey {
    let mut key = [0u8; ACCOUNT_KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut key);
    key[0] = ACCOUNT_KEY_TYPE;
    AccountKey(key)
}
