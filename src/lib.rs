//! Fast Pair - cryptographic core of accessory pairing
//!
//! Rust implementation of the Fast Pair key exchange and packet codecs:
//! P-256 ECDH, AES-128 ECB/CTR, HMAC-SHA256 and the naming, additional-data
//! and message stream packets built on them.

mod types;
mod keys;
mod crypto;
pub mod mac;
mod naming;
mod additional_data;
mod message_stream;
mod account_key;
mod address;
mod history;
mod timing;

pub use types::*;
pub use keys::*;
pub use crypto::*;
pub use naming::*;
pub use additional_data::*;
pub use message_stream::*;
pub use account_key::*;
pub use address::*;
pub use history::*;
pub use timing::*;
