use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Address of a node on the bus.
///
/// Equality and hashing follow the numeric value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(u8);

impl Address {
    /// Reserved address every node listens on.
    pub const BROADCAST: Address = Address(0xFF);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Wire representation: a single byte.
    pub const fn to_bytes(self) -> [u8; 1] {
        [self.0]
    }

    pub const fn is_broadcast(self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl From<u8> for Address {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<i64> for Address {
    type Error = FrameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| FrameError::AddressOutOfRange(value))
    }
}

impl TryFrom<i32> for Address {
    type Error = FrameError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        match bytes {
            [value] => Ok(Self(*value)),
            other => Err(FrameError::AddressLength(other.len())),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr(0x{:02x})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Address::try_from(0).unwrap().value(), 0);
        assert_eq!(Address::try_from(255).unwrap().value(), 255);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Address::try_from(-1),
            Err(FrameError::AddressOutOfRange(-1))
        ));
        assert!(matches!(
            Address::try_from(256),
            Err(FrameError::AddressOutOfRange(256))
        ));
        assert!(Address::try_from(i64::MAX).is_err());
    }

    #[test]
    fn single_byte_conversion() {
        assert_eq!(Address::try_from(&[0x1E][..]).unwrap(), Address::new(0x1E));
        assert!(matches!(
            Address::try_from(&[][..]),
            Err(FrameError::AddressLength(0))
        ));
        assert!(matches!(
            Address::try_from(&[1, 2][..]),
            Err(FrameError::AddressLength(2))
        ));
    }

    #[test]
    fn broadcast_to_bytes() {
        assert_eq!(Address::try_from(255).unwrap().to_bytes(), [0xFF]);
        assert!(Address::BROADCAST.is_broadcast());
        assert!(!Address::new(0).is_broadcast());
    }

    #[test]
    fn equality_and_hash_follow_value() {
        let mut set = HashSet::new();
        set.insert(Address::new(7));
        set.insert(Address::try_from(7).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn formatting() {
        assert_eq!(format!("{:?}", Address::new(0x1E)), "Addr(0x1e)");
        assert_eq!(Address::new(0x0A).to_string(), "0x0a");
    }
}
