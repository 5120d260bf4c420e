//! Capability-based authorization.
//!
//! Each (principal, capability) pair occupies one storage slot, keyed by a
//! composite hash, so membership checks stay O(1) without bitmask twiddling.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes};

/// Capabilities a principal can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Capability {
    /// May change gateway configuration and withdraw stranded balances.
    Admin = 1,
    /// May authorize payment requests (the off-chain signing key) and call
    /// the completion entrypoint.
    Operator = 2,
}

impl TryFrom<u8> for Capability {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Capability::Admin),
            2 => Ok(Capability::Operator),
            _ => Err(()),
        }
    }
}

/// Composite storage key = keccak256(principal || capability).
pub fn capability_key(principal: Address, capability: Capability) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(20 + 1);
    buf.extend_from_slice(principal.as_slice());
    buf.push(capability as u8);
    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_per_principal_and_capability() {
        let a = Address::new([0x01; 20]);
        let b = Address::new([0x02; 20]);

        assert_ne!(
            capability_key(a, Capability::Admin),
            capability_key(a, Capability::Operator)
        );
        assert_ne!(
            capability_key(a, Capability::Admin),
            capability_key(b, Capability::Admin)
        );
    }

    #[test]
    fn unknown_capability_bytes_are_rejected() {
        assert_eq!(Capability::try_from(1), Ok(Capability::Admin));
        assert_eq!(Capability::try_from(2), Ok(Capability::Operator));
        assert!(Capability::try_from(0).is_err());
        assert!(Capability::try_from(3).is_err());
    }
}
