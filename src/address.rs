//! Bluetooth public addresses.

use std::fmt;
use std::str::FromStr;

use crate::types::{FastPairError, BLUETOOTH_ADDRESS_SIZE};

/// A 6-byte Bluetooth public address, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BluetoothAddress([u8; BLUETOOTH_ADDRESS_SIZE]);

impl BluetoothAddress {
    /// Wrap raw address bytes, most significant byte first.
    pub fn new(bytes: [u8; BLUETOOTH_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; BLUETOOTH_ADDRESS_SIZE] {
        &self.0
    }
}

impl From<[u8; BLUETOOTH_ADDRESS_SIZE]> for BluetoothAddress {
    fn from(bytes: [u8; BLUETOOTH_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for BluetoothAddress {
    type Error = FastPairError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes.try_into().map(Self).map_err(|_| {
            FastPairError::InvalidArgument(format!(
                "Bluetooth address must be {} bytes, got {}",
                BLUETOOTH_ADDRESS_SIZE,
                bytes.len()
            ))
        })
    }
}

/// Parses `AA:BB:CC:DD:EE:FF`.
impl FromStr for BluetoothAddress {
    type Err = FastPairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FastPairError::InvalidArgument(format!("Invalid Bluetooth address: {}", s));

        let mut bytes = [0u8; BLUETOOTH_ADDRESS_SIZE];
        let mut parts = s.split(':');
        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for BluetoothAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}", a, b, c, d, e, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let address: BluetoothAddress = "11:22:33:44:55:66".parse().unwrap();
        assert_eq!(address.as_bytes(), &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(address.to_string(), "11:22:33:44:55:66");

        let lower: BluetoothAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(lower.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["", "11:22:33:44:55", "11:22:33:44:55:66:77", "1:22:33:44:55:66", "GG:22:33:44:55:66", "112233445566"] {
            let result = input.parse::<BluetoothAddress>();
            assert!(matches!(result, Err(FastPairError::InvalidArgument(_))), "{}", input);
        }
    }

    #[test]
    fn test_try_from_slice() {
        let address = BluetoothAddress::try_from(&[1u8, 2, 3, 4, 5, 6][..]).unwrap();
        assert_eq!(address, BluetoothAddress::new([1, 2, 3, 4, 5, 6]));

        let result = BluetoothAddress::try_from(&[1u8, 2, 3][..]);
        assert!(matches!(result, Err(FastPairError::InvalidArgument(_))));
    }
}
