//! Onramp Gateway — signature-gated payment forwarding for Arbitrum Stylus.
//!
//! The gateway receives user funds (native coin or ERC-20), verifies that an
//! off-chain operator pre-approved the exact transaction parameters, takes
//! the configured fee legs and forwards the remainder to a destination
//! contract, refunding any surplus the destination returns mid-call.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod calls;
pub mod erc20;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod interfaces;
pub mod roles;
pub mod utils;


pub use gateway::OnrampGateway;
