//! Operator-side ECDSA signing over the shared request digest.
//!
//! The digest comes from `onramp_gateway_types::payment_request_digest`, the
//! same function the gateway evaluates on-chain, so a signature produced here
//! verifies there by construction. Signing is done over the prehash with a
//! recovery id, yielding the `r||s||v` layout (v in {27, 28}) that
//! `ecrecover` expects.

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{Error, RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use onramp_gateway_types::{payment_request_digest, PaymentRequest};

/// 65-byte `r||s||v` signature with v in {27, 28}.
pub type RequestSignature = [u8; 65];

/// Sign `request` for one gateway deployment.
pub fn sign_request(
    request: &PaymentRequest,
    chain_id: u64,
    gateway: Address,
    key: &SigningKey,
) -> Result<RequestSignature, Error> {
    sign_digest(payment_request_digest(chain_id, gateway, request), key)
}

/// Sign a 32-byte digest, producing a recoverable signature.
pub fn sign_digest(digest: FixedBytes<32>, key: &SigningKey) -> Result<RequestSignature, Error> {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_slice())?;
    let (r, s) = signature.split_bytes();

    let mut out = [0u8; 65];
    out[0..32].copy_from_slice(r.as_slice());
    out[32..64].copy_from_slice(s.as_slice());
    out[64] = 27 + recovery_id.to_byte();
    Ok(out)
}

/// Recover the signer address from a digest and a signature produced by
/// [`sign_digest`]. Used for parity checks against the on-chain verifier.
pub fn recover_request_signer(
    digest: FixedBytes<32>,
    signature: &RequestSignature,
) -> Result<Address, Error> {
    let recovery_id = RecoveryId::from_byte(signature[64].wrapping_sub(27)).ok_or_else(Error::new)?;
    let parsed = Signature::from_slice(&signature[0..64])?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &parsed, recovery_id)?;
    Ok(operator_address(&key))
}

/// Ethereum address of a verifying key: low 20 bytes of
/// keccak256(uncompressed public key).
pub fn operator_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&point.as_bytes()[1..]);
    let hash = hasher.finalize();
    Address::from_slice(&hash[12..32])
}
