//! Minimal ERC-20 call surface.
//!
//! Calldata is encoded from the [`crate::interfaces::IERC20`] declarations and
//! dispatched through `RawCall`. Some widely deployed tokens return nothing
//! from `transfer`/`transferFrom`; an empty return therefore counts as
//! success, while a returned word must be nonzero.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use stylus_sdk::call::RawCall;

use crate::{
    errors::{GatewayError, TokenTransferFailed},
    interfaces::IERC20,
};

/// Handle on one token contract.
#[derive(Clone, Copy)]
pub struct Erc20 {
    address: Address,
}

impl Erc20 {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn transfer(&self, to: Address, amount: U256) -> Result<(), GatewayError> {
        self.exec(&IERC20::transferCall { to, amount }.abi_encode())
    }

    pub fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), GatewayError> {
        self.exec(&IERC20::transferFromCall { from, to, amount }.abi_encode())
    }

    pub fn approve(&self, spender: Address, amount: U256) -> Result<(), GatewayError> {
        self.exec(&IERC20::approveCall { spender, amount }.abi_encode())
    }

    pub fn balance_of(&self, account: Address) -> Result<U256, GatewayError> {
        let data = IERC20::balanceOfCall { account }.abi_encode();
        let out = unsafe { RawCall::new_static().call(self.address, &data) }
            .map_err(|_| self.failure())?;
        if out.len() < 32 {
            return Err(self.failure());
        }
        Ok(U256::from_be_slice(&out[0..32]))
    }

    /// Run a state-changing token call; boolean-false returns and reverts are
    /// both fatal.
    fn exec(&self, calldata: &[u8]) -> Result<(), GatewayError> {
        let ret = unsafe { RawCall::new().call(self.address, calldata) }
            .map_err(|_| self.failure())?;
        if transfer_succeeded(&ret) {
            Ok(())
        } else {
            Err(self.failure())
        }
    }

    fn failure(&self) -> GatewayError {
        GatewayError::TokenTransferFailed(TokenTransferFailed {
            token: self.address,
        })
    }
}

fn transfer_succeeded(ret: &[u8]) -> bool {
    if ret.is_empty() {
        return true;
    }
    ret.len() >= 32 && U256::from_be_slice(&ret[0..32]) != U256::ZERO
}
