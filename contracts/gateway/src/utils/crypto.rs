//! Signature recovery for operator-signed requests.
//!
//! Recovery goes through the EVM `ecrecover` precompile at address `0x01`.
//! Malformed signatures fail closed: they become [`RecoverError`], never a
//! zero-address "success".

use alloy_primitives::{Address, FixedBytes};
use stylus_sdk::call::RawCall;

const ECRECOVER: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

const ECRECOVER_GAS: u64 = 50_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoverError {
    /// Wrong length, unusable `v`, or the precompile recovered nothing.
    BadSignature,
    /// The precompile call itself failed or returned malformed data.
    Precompile,
}

/// Recover the signer of `digest` from a 65-byte `r||s||v` signature.
///
/// `v` of 0/1 is normalised to 27/28; any other value is rejected.
pub fn recover_signer(digest: FixedBytes<32>, signature: &[u8]) -> Result<Address, RecoverError> {
    if signature.len() != 65 {
        return Err(RecoverError::BadSignature);
    }
    let v = match signature[64] {
        27 | 28 => signature[64],
        0 | 1 => signature[64] + 27,
        _ => return Err(RecoverError::BadSignature),
    };

    // (digest, v-as-word, r, s), each left-padded to 32 bytes.
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = v;
    input[64..96].copy_from_slice(&signature[0..32]);
    input[96..128].copy_from_slice(&signature[32..64]);

    let out = unsafe { RawCall::new_static().gas(ECRECOVER_GAS).call(ECRECOVER, &input) }
        .map_err(|_| RecoverError::Precompile)?;
    if out.len() < 32 {
        return Err(RecoverError::Precompile);
    }

    // The precompile returns a 32-byte word with the address in the low 20
    // bytes; an all-zero word means recovery failed.
    let recovered = Address::from_slice(&out[12..32]);
    if recovered == Address::ZERO {
        return Err(RecoverError::BadSignature);
    }
    Ok(recovered)
}
