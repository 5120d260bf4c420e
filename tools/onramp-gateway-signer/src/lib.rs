//! Off-chain request signing for the Onramp Gateway.
//!
//! The order service builds a [`onramp_gateway_types::PaymentRequest`],
//! signs its digest with the operator key, and hands the caller the 65-byte
//! signature expected by `initiateTransaction`.

pub mod signer;

#[cfg(test)]
mod tests;

pub use signer::{operator_address, recover_request_signer, sign_digest, sign_request};
