//! Canonical payment request model and its signed digest.
//!
//! Every economically relevant field travels inside one EIP-712 digest, so no
//! field can be substituted after the operator has signed. The digest is
//! versioned through the domain name/version strings and bound to a chain id
//! and a verifying contract, which rules out cross-chain and cross-contract
//! signature replay.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

/// Pseudo-address denoting the chain's native coin.
///
/// Distinct from the zero address, which stays reserved for "unset".
pub const NATIVE_TOKEN: Address = Address::new([0xEE; 20]);

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const DOMAIN_NAME: &[u8] = b"Onramp Gateway";
const DOMAIN_VERSION: &[u8] = b"1";

const REQUEST_TYPE: &[u8] = b"PaymentRequest(bytes32 transactionId,bytes32 clientId,address token,uint256 amount,address forwardTo,address spender,uint256 deadline,address developerFeeRecipient,uint256 developerFeeBps,uint256 developerFeeFlat,uint256 protocolFeeBps,bytes32 callDataHash,bytes32 extraDataHash)";

/// A signed, caller-supplied payment instruction (v1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Caller-chosen unique id; consumed forever once processed.
    pub transaction_id: FixedBytes<32>,
    /// Scope key for the per-client developer fee ledger.
    pub client_id: FixedBytes<32>,
    /// Asset to move; [`NATIVE_TOKEN`] for the native coin.
    pub token: Address,
    /// Amount delivered to the destination, net of fees. Must be positive.
    pub amount: U256,
    /// Destination contract/account receiving the call and the net value.
    pub forward_to: Address,
    /// Address granted the token allowance; zero defaults to `forward_to`.
    pub spender: Address,
    /// Unix-seconds validity deadline.
    pub deadline: U256,
    /// Developer fee leg; a zero recipient defers to the client ledger entry.
    /// A nonzero flat amount takes precedence over the rate.
    pub developer_fee_recipient: Address,
    pub developer_fee_bps: U256,
    pub developer_fee_flat: U256,
    /// Protocol fee rate; the recipient is gateway configuration.
    pub protocol_fee_bps: U256,
    /// Opaque payload forwarded verbatim to `forward_to`. Empty means a
    /// direct transfer with no call.
    pub call_data: Vec<u8>,
    /// Opaque bytes carried only for off-chain attribution.
    pub extra_data: Vec<u8>,
}

impl PaymentRequest {
    /// The address that may pull the token allowance during the forward call.
    pub fn effective_spender(&self) -> Address {
        if self.spender == Address::ZERO {
            self.forward_to
        } else {
            self.spender
        }
    }

    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }

    pub fn is_direct_transfer(&self) -> bool {
        self.call_data.is_empty()
    }
}

/// EIP-712 domain separator for a gateway deployment.
pub fn domain_separator(chain_id: u64, verifying_contract: Address) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(keccak256(DOMAIN_NAME).as_slice());
    buf.extend_from_slice(keccak256(DOMAIN_VERSION).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(verifying_contract));
    keccak256(buf)
}

/// Compute the digest the operator must sign for `request`.
///
/// Dynamic fields (`call_data`, `extra_data`) are folded as their keccak
/// hashes so the typed message stays fixed-size and unambiguous.
pub fn payment_request_digest(
    chain_id: u64,
    verifying_contract: Address,
    request: &PaymentRequest,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 14);
    buf.extend_from_slice(keccak256(REQUEST_TYPE).as_slice());
    buf.extend_from_slice(request.transaction_id.as_slice());
    buf.extend_from_slice(request.client_id.as_slice());
    buf.extend_from_slice(&address_word(request.token));
    buf.extend_from_slice(&request.amount.to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(request.forward_to));
    buf.extend_from_slice(&address_word(request.spender));
    buf.extend_from_slice(&request.deadline.to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(request.developer_fee_recipient));
    buf.extend_from_slice(&request.developer_fee_bps.to_be_bytes::<32>());
    buf.extend_from_slice(&request.developer_fee_flat.to_be_bytes::<32>());
    buf.extend_from_slice(&request.protocol_fee_bps.to_be_bytes::<32>());
    buf.extend_from_slice(keccak256(&request.call_data).as_slice());
    buf.extend_from_slice(keccak256(&request.extra_data).as_slice());
    let struct_hash = keccak256(buf);

    let mut outer = Vec::with_capacity(2 + 32 + 32);
    outer.extend_from_slice(b"\x19\x01");
    outer.extend_from_slice(domain_separator(chain_id, verifying_contract).as_slice());
    outer.extend_from_slice(struct_hash.as_slice());
    keccak256(outer)
}

fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_ID: u64 = 42161;

    fn gateway() -> Address {
        Address::new([0x47; 20])
    }

    fn sample_request() -> PaymentRequest {
        PaymentRequest {
            transaction_id: FixedBytes::new([0x01; 32]),
            client_id: FixedBytes::new([0x02; 32]),
            token: Address::new([0x03; 20]),
            amount: U256::from(1_000_000u64),
            forward_to: Address::new([0x04; 20]),
            spender: Address::ZERO,
            deadline: U256::from(1_900_000_000u64),
            developer_fee_recipient: Address::new([0x05; 20]),
            developer_fee_bps: U256::from(10u64),
            developer_fee_flat: U256::ZERO,
            protocol_fee_bps: U256::from(30u64),
            call_data: vec![0xde, 0xad, 0xbe, 0xef],
            extra_data: vec![0x11, 0x22],
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let request = sample_request();
        let a = payment_request_digest(CHAIN_ID, gateway(), &request);
        let b = payment_request_digest(CHAIN_ID, gateway(), &request);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_binds_every_field() {
        let base = sample_request();
        let reference = payment_request_digest(CHAIN_ID, gateway(), &base);

        let mut mutations: Vec<PaymentRequest> = Vec::new();
        let mut m = base.clone();
        m.transaction_id = FixedBytes::new([0xAA; 32]);
        mutations.push(m);
        let mut m = base.clone();
        m.client_id = FixedBytes::new([0xAB; 32]);
        mutations.push(m);
        let mut m = base.clone();
        m.token = NATIVE_TOKEN;
        mutations.push(m);
        let mut m = base.clone();
        m.amount = U256::from(999_999u64);
        mutations.push(m);
        let mut m = base.clone();
        m.forward_to = Address::new([0xAC; 20]);
        mutations.push(m);
        let mut m = base.clone();
        m.spender = Address::new([0xAD; 20]);
        mutations.push(m);
        let mut m = base.clone();
        m.deadline = base.deadline + U256::from(1u64);
        mutations.push(m);
        let mut m = base.clone();
        m.developer_fee_recipient = Address::new([0xAE; 20]);
        mutations.push(m);
        let mut m = base.clone();
        m.developer_fee_bps = U256::from(11u64);
        mutations.push(m);
        let mut m = base.clone();
        m.developer_fee_flat = U256::from(1u64);
        mutations.push(m);
        let mut m = base.clone();
        m.protocol_fee_bps = U256::from(31u64);
        mutations.push(m);
        let mut m = base.clone();
        m.call_data = vec![0xde, 0xad];
        mutations.push(m);
        let mut m = base.clone();
        m.extra_data = vec![];
        mutations.push(m);

        for mutated in mutations {
            let digest = payment_request_digest(CHAIN_ID, gateway(), &mutated);
            assert_ne!(digest, reference, "field change left the digest intact");
        }
    }

    #[test]
    fn digest_is_domain_separated() {
        let request = sample_request();
        let reference = payment_request_digest(CHAIN_ID, gateway(), &request);

        let other_chain = payment_request_digest(CHAIN_ID + 1, gateway(), &request);
        assert_ne!(other_chain, reference);

        let other_contract = payment_request_digest(CHAIN_ID, Address::new([0x48; 20]), &request);
        assert_ne!(other_contract, reference);
    }

    #[test]
    fn empty_and_missing_call_data_differ_from_payloads() {
        let mut request = sample_request();
        let with_payload = payment_request_digest(CHAIN_ID, gateway(), &request);
        request.call_data = vec![];
        let without_payload = payment_request_digest(CHAIN_ID, gateway(), &request);
        assert_ne!(with_payload, without_payload);
    }

    #[test]
    fn spender_defaults_to_forward_address() {
        let mut request = sample_request();
        assert_eq!(request.effective_spender(), request.forward_to);
        request.spender = Address::new([0x06; 20]);
        assert_eq!(request.effective_spender(), Address::new([0x06; 20]));
    }

    #[test]
    fn native_sentinel_is_not_the_zero_address() {
        assert_ne!(NATIVE_TOKEN, Address::ZERO);
        let mut request = sample_request();
        assert!(!request.is_native());
        request.token = NATIVE_TOKEN;
        assert!(request.is_native());
    }
}
