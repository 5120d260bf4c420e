//! Emitted events — the durable wire format consumed by off-chain indexers.
//!
//! Field order and indexing are part of the integration contract; do not
//! reorder them.

use alloy_primitives::{keccak256, FixedBytes};
use alloy_sol_types::sol;

sol! {
    /// One forwarding call settled. Links on-chain execution back to the
    /// off-chain order record via `transactionId` and `extraData`.
    event TransactionInitiated(
        address indexed sender,
        bytes32 indexed transactionId,
        address token,
        uint256 amount,
        uint256 protocolFeeAmount,
        address developerFeeRecipient,
        uint256 developerFeeBps,
        uint256 developerFeeAmount,
        bytes extraData
    );

    /// One fee leg paid out during a forwarding call.
    event FeePayout(
        bytes32 indexed scope,
        address indexed payer,
        address indexed recipient,
        address token,
        uint256 amount,
        uint256 feeBps
    );

    /// Destination-chain completion settled.
    event TransactionCompleted(
        bytes32 indexed clientId,
        bytes32 indexed transactionId,
        address token,
        uint256 amount,
        address receiver
    );
}

/// `FeePayout.scope` for the protocol leg; developer legs use the client id.
pub fn protocol_fee_scope() -> FixedBytes<32> {
    keccak256(b"onramp.fee.protocol")
}
