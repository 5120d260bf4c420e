//! Shared types for the Onramp Gateway (on-chain/off-chain).
//!
//! The gateway contract and the off-chain request signer both depend on this
//! crate, so the canonical request encoding and the fee arithmetic have a
//! single definition.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod fees;
pub mod request;

pub use fees::{fee_amount, FeeBreakdown, FeeSpec, BPS_DENOMINATOR, MAX_FEE_BPS};
pub use request::{
    domain_separator, payment_request_digest, PaymentRequest, NATIVE_TOKEN,
};
