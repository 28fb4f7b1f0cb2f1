//! Matching public addresses against previously paired accessories.
//!
//! Each record keeps an account key and `SHA256(account key ++ public address)`.
//! The address itself is never stored; a newly observed address is matched by
//! recomputing the hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::address::BluetoothAddress;
use crate::mac::compare_tags;
use crate::types::{FastPairError, Result, ACCOUNT_KEY_SIZE};

/// Size of the stored address hash.
pub const HISTORY_HASH_SIZE: usize = 32;

/// `SHA256(account_key ++ address)`.
pub fn address_hash(
    account_key: &[u8; ACCOUNT_KEY_SIZE],
    address: &BluetoothAddress,
) -> [u8; HISTORY_HASH_SIZE] {
    Sha256::new()
        .chain_update(account_key)
        .chain_update(address.as_bytes())
        .finalize()
        .into()
}

/// A previously paired accessory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "accountKey", with = "hex_bytes")]
    account_key: [u8; ACCOUNT_KEY_SIZE],
    #[serde(rename = "sha256AccountKeyPublicAddress", with = "hex_bytes")]
    hash: [u8; HISTORY_HASH_SIZE],
}

impl HistoryItem {
    /// Restore a record from a stored account key and its
    /// `SHA256(account_key ++ address)` hash, as kept by an external store.
    ///
    /// The second argument is the hash, not the address; use
    /// [`HistoryItem::create`] to record a pairing from an address.
    pub fn new(account_key: &[u8], hash: &[u8]) -> Result<Self> {
        let account_key = account_key.try_into().map_err(|_| {
            FastPairError::InvalidArgument(format!(
                "Account key must be {} bytes, got {}",
                ACCOUNT_KEY_SIZE,
                account_key.len()
            ))
        })?;
        let hash = hash.try_into().map_err(|_| {
            FastPairError::InvalidArgument(format!(
                "History hash must be {} bytes, got {}",
                HISTORY_HASH_SIZE,
                hash.len()
            ))
        })?;
        Ok(Self { account_key, hash })
    }

    /// Record a pairing with the accessory at `address`, computing the hash
    /// from it. The address itself is not stored.
    pub fn create(account_key: &[u8; ACCOUNT_KEY_SIZE], address: &BluetoothAddress) -> Self {
        Self {
            account_key: *account_key,
            hash: address_hash(account_key, address),
        }
    }

    /// The account key shared with the accessory.
    pub fn account_key(&self) -> &[u8; ACCOUNT_KEY_SIZE] {
        &self.account_key
    }

    /// `SHA256(account_key ++ address)` for the paired address.
    pub fn hash(&self) -> &[u8; HISTORY_HASH_SIZE] {
        &self.hash
    }

    /// Whether `address` is the address this record was created for.
    pub fn is_matched(&self, address: &BluetoothAddress) -> bool {
        compare_tags(&address_hash(&self.account_key, address), &self.hash)
    }
}

impl fmt::Debug for HistoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryItem")
            .field("hash", &hex::encode(self.hash))
            .finish_non_exhaustive()
    }
}

/// Ordered collection of paired accessories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingHistory {
    items: Vec<HistoryItem>,
}

impl PairingHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, item: HistoryItem) {
        self.items.push(item);
    }

    /// First record matching `address`, if any.
    pub fn find_match(&self, address: &BluetoothAddress) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.is_matched(address))
    }

    /// Whether `address` was paired under any stored account key.
    pub fn is_previously_paired(&self, address: &BluetoothAddress) -> bool {
        self.find_match(address).is_some()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no pairing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Serialize for an external store.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| FastPairError::Serialization(e.to_string()))
    }

    /// Load from the JSON produced by [`PairingHistory::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FastPairError::Serialization(e.to_string()))
    }
}

impl FromIterator<HistoryItem> for PairingHistory {
    fn from_iter<I: IntoIterator<Item = HistoryItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

mod hex_bytes {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut bytes = [0u8; N];
        hex::decode_to_slice(&text, &mut bytes).map_err(D::Error::custom)?;
        Ok(bytes)
    }
}
