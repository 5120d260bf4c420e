//! Error surface of the gateway.
//!
//! Every failure aborts the call with full state rollback. Most conditions
//! encode a `sol!` custom error; a destination-call revert instead re-raises
//! the destination's payload verbatim so off-chain diagnostics can tell
//! "the gateway rejected this" apart from "the destination rejected this".

use alloc::vec::Vec;

use alloy_sol_types::{sol, SolError};

use crate::calls::CallError;

sol! {
    error AlreadyInitialized();
    error Unauthorized(address account);
    error GatewayPaused();
    error ReentrantCall();

    error ZeroAmount();
    error ZeroAddress();
    error RequestExpired(uint256 deadline, uint256 blockTime);
    error TransactionAlreadyProcessed(bytes32 transactionId);
    error VerificationFailed();
    error FeeRateTooHigh(uint256 bps, uint256 maxBps);
    error MismatchedValue(uint256 expected, uint256 provided);
    error MsgValueNotZero();
    error RestrictedAddress(address account);
    error UnknownCapability(uint8 capability);

    error TokenTransferFailed(address token);
    error NativeTransferFailed(address recipient);
    error FailedToForward();
}

/// All ways a gateway entrypoint can fail.
///
/// Lowered to revert data by hand (rather than `#[derive(SolidityError)]`)
/// because the `Forward` variant must surface the destination's raw revert
/// payload unchanged when one is present.
pub enum GatewayError {
    AlreadyInitialized(AlreadyInitialized),
    Unauthorized(Unauthorized),
    GatewayPaused(GatewayPaused),
    ReentrantCall(ReentrantCall),
    ZeroAmount(ZeroAmount),
    ZeroAddress(ZeroAddress),
    RequestExpired(RequestExpired),
    TransactionAlreadyProcessed(TransactionAlreadyProcessed),
    VerificationFailed(VerificationFailed),
    FeeRateTooHigh(FeeRateTooHigh),
    MismatchedValue(MismatchedValue),
    MsgValueNotZero(MsgValueNotZero),
    RestrictedAddress(RestrictedAddress),
    UnknownCapability(UnknownCapability),
    TokenTransferFailed(TokenTransferFailed),
    NativeTransferFailed(NativeTransferFailed),
    /// The destination call failed; carries the callee's revert payload.
    Forward(CallError),
}

impl core::fmt::Debug for GatewayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            GatewayError::AlreadyInitialized(_) => "AlreadyInitialized",
            GatewayError::Unauthorized(_) => "Unauthorized",
            GatewayError::GatewayPaused(_) => "GatewayPaused",
            GatewayError::ReentrantCall(_) => "ReentrantCall",
            GatewayError::ZeroAmount(_) => "ZeroAmount",
            GatewayError::ZeroAddress(_) => "ZeroAddress",
            GatewayError::RequestExpired(_) => "RequestExpired",
            GatewayError::TransactionAlreadyProcessed(_) => "TransactionAlreadyProcessed",
            GatewayError::VerificationFailed(_) => "VerificationFailed",
            GatewayError::FeeRateTooHigh(_) => "FeeRateTooHigh",
            GatewayError::MismatchedValue(_) => "MismatchedValue",
            GatewayError::MsgValueNotZero(_) => "MsgValueNotZero",
            GatewayError::RestrictedAddress(_) => "RestrictedAddress",
            GatewayError::UnknownCapability(_) => "UnknownCapability",
            GatewayError::TokenTransferFailed(_) => "TokenTransferFailed",
            GatewayError::NativeTransferFailed(_) => "NativeTransferFailed",
            GatewayError::Forward(_) => "Forward",
        };
        f.write_str(name)
    }
}

impl From<GatewayError> for Vec<u8> {
    fn from(err: GatewayError) -> Vec<u8> {
        match err {
            GatewayError::AlreadyInitialized(e) => e.abi_encode(),
            GatewayError::Unauthorized(e) => e.abi_encode(),
            GatewayError::GatewayPaused(e) => e.abi_encode(),
            GatewayError::ReentrantCall(e) => e.abi_encode(),
            GatewayError::ZeroAmount(e) => e.abi_encode(),
            GatewayError::ZeroAddress(e) => e.abi_encode(),
            GatewayError::RequestExpired(e) => e.abi_encode(),
            GatewayError::TransactionAlreadyProcessed(e) => e.abi_encode(),
            GatewayError::VerificationFailed(e) => e.abi_encode(),
            GatewayError::FeeRateTooHigh(e) => e.abi_encode(),
            GatewayError::MismatchedValue(e) => e.abi_encode(),
            GatewayError::MsgValueNotZero(e) => e.abi_encode(),
            GatewayError::RestrictedAddress(e) => e.abi_encode(),
            GatewayError::UnknownCapability(e) => e.abi_encode(),
            GatewayError::TokenTransferFailed(e) => e.abi_encode(),
            GatewayError::NativeTransferFailed(e) => e.abi_encode(),
            GatewayError::Forward(CallError::Reverted(payload)) => {
                if payload.is_empty() {
                    FailedToForward {}.abi_encode()
                } else {
                    payload
                }
            }
        }
    }
}

macro_rules! from_sol_error {
    ($($name:ident),* $(,)?) => {$(
        impl From<$name> for GatewayError {
            fn from(value: $name) -> Self {
                GatewayError::$name(value)
            }
        }
    )*};
}

from_sol_error!(
    AlreadyInitialized,
    Unauthorized,
    GatewayPaused,
    ReentrantCall,
    ZeroAmount,
    ZeroAddress,
    RequestExpired,
    TransactionAlreadyProcessed,
    VerificationFailed,
    FeeRateTooHigh,
    MismatchedValue,
    MsgValueNotZero,
    RestrictedAddress,
    UnknownCapability,
    TokenTransferFailed,
    NativeTransferFailed,
);
