//! Low-level external calls.
//!
//! One bytes-in/bytes-out primitive; failures carry the callee's raw revert
//! payload as a tagged value instead of being reinterpreted byte-by-byte at
//! each call site.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};
use stylus_sdk::call::RawCall;

/// Failure of an external call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallError {
    /// The callee reverted; the payload is its raw revert data (possibly empty).
    Reverted(Vec<u8>),
}

/// CALL `target` with `value` attached and `data` as calldata, forwarding all
/// remaining gas.
pub fn call_with_value(target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, CallError> {
    unsafe { RawCall::new_with_value(value).call(target, data) }.map_err(CallError::Reverted)
}

/// Plain native-value transfer (empty payload).
pub fn transfer_native(target: Address, value: U256) -> Result<(), CallError> {
    call_with_value(target, value, &[]).map(|_| ())
}
