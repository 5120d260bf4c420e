//! Solidity ABI interface scaffolding for the gateway.
//!
//! Note: the gateway does not *need* `IOnrampGateway` to function, but having
//! it around makes ABI expectations explicit for integrators. `IERC20` is the
//! token surface actually used for calldata encoding in [`crate::erc20`].

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// Minimal ERC-20 surface the gateway depends on. A `false` return and a
    /// revert are treated identically: both abort the whole call.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }

    /// Signed payment instruction (ABI mirror of the shared request type).
    struct PaymentRequestData {
        bytes32 transactionId;
        bytes32 clientId;
        address token;
        uint256 amount;
        address forwardTo;
        address spender;
        uint256 deadline;
        address developerFeeRecipient;
        uint256 developerFeeBps;
        uint256 developerFeeFlat;
        uint256 protocolFeeBps;
        bytes callData;
        bytes extraData;
    }

    /// The surface other systems integrate against.
    interface IOnrampGateway {
        function initialize(address admin, address operator, address protocolFeeRecipient, uint256 protocolFeeBps) external;

        function initiateTransaction(PaymentRequestData request, bytes signature) external payable;
        function completeTokenPurchase(bytes32 clientId, bytes32 transactionId, address token, uint256 amount, address receiver) external payable;

        function isProcessed(bytes32 transactionId) external view returns (bool);
        function isRestricted(address account) external view returns (bool);
        function isPaused() external view returns (bool);
        function hasCapability(address account, uint8 capability) external view returns (bool);
        function getProtocolFeeInfo() external view returns (address, uint256);
        function getFeeInfo(bytes32 clientId) external view returns (address, uint256);
        function paymentDigest(PaymentRequestData request) external view returns (bytes32);

        function pause(bool enabled) external;
        function restrictAddress(address account, bool restricted) external;
        function setProtocolFeeInfo(address recipient, uint256 bps) external;
        function setFeeInfo(bytes32 clientId, address recipient, uint256 bps) external;
        function setCapability(address account, uint8 capability, bool enabled) external;
        function withdraw(address token, uint256 amount) external;
        function withdrawTo(address token, uint256 amount, address receiver) external;
    }
}
