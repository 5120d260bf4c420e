//! The payment-forwarding gateway contract.
//!
//! `initiateTransaction` is the primary entrypoint: it verifies the operator
//! signature over the full request, consumes the transaction id, pays the fee
//! legs, then either transfers the funds directly or pulls them into custody
//! and invokes the destination with the caller's payload. Any surplus the
//! destination hands back mid-call is returned to the original sender.
//!
//! `completeTokenPurchase` is the destination-chain sibling: an allowlisted
//! relayer pushes an exact payout to a receiver, with the same replay guard
//! but no fee legs and no signature.

use alloc::vec;
use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
};

use onramp_gateway_types::{
    payment_request_digest, FeeBreakdown, FeeSpec, PaymentRequest, MAX_FEE_BPS, NATIVE_TOKEN,
};

use crate::{
    calls::{call_with_value, transfer_native},
    erc20::Erc20,
    errors::{
        AlreadyInitialized, FeeRateTooHigh, GatewayError, GatewayPaused, MismatchedValue,
        MsgValueNotZero, NativeTransferFailed, ReentrantCall, RequestExpired, RestrictedAddress,
        TransactionAlreadyProcessed, Unauthorized, UnknownCapability, VerificationFailed,
        ZeroAddress, ZeroAmount,
    },
    events::{protocol_fee_scope, FeePayout, TransactionCompleted, TransactionInitiated},
    roles::{capability_key, Capability},
    utils::crypto::recover_signer,
};

/// ABI mirror of [`PaymentRequest`].
///
/// NOTE: taken as a tuple (instead of a `sol!` struct) because Stylus'
/// `#[public]` ABI glue supports tuples via `AbiType`, and a Solidity
/// `struct` is ABI-equivalent to a tuple. Field order matches
/// `interfaces::PaymentRequestData`.
pub type PaymentRequestAbi = (
    FixedBytes<32>, // transactionId
    FixedBytes<32>, // clientId
    Address,        // token
    U256,           // amount
    Address,        // forwardTo
    Address,        // spender
    U256,           // deadline
    Address,        // developerFeeRecipient
    U256,           // developerFeeBps
    U256,           // developerFeeFlat
    U256,           // protocolFeeBps
    Bytes,          // callData
    Bytes,          // extraData
);

pub fn request_from_abi(raw: PaymentRequestAbi) -> PaymentRequest {
    let (
        transaction_id,
        client_id,
        token,
        amount,
        forward_to,
        spender,
        deadline,
        developer_fee_recipient,
        developer_fee_bps,
        developer_fee_flat,
        protocol_fee_bps,
        call_data,
        extra_data,
    ) = raw;
    PaymentRequest {
        transaction_id,
        client_id,
        token,
        amount,
        forward_to,
        spender,
        deadline,
        developer_fee_recipient,
        developer_fee_bps,
        developer_fee_flat,
        protocol_fee_bps,
        call_data: call_data.0,
        extra_data: extra_data.0,
    }
}

sol_storage! {
    /// Gateway storage. A single instance owns all mutable protocol state.
    #[entrypoint]
    pub struct OnrampGateway {
        /// One-shot bootstrap flag.
        bool initialized;
        /// Emergency stop for the forwarding entrypoints.
        bool paused;
        /// Reentrancy flag; held for the duration of every state-mutating
        /// entrypoint. A revert rolls it back together with everything else.
        bool entered;

        /// (principal, capability) membership, keyed by `roles::capability_key`.
        mapping(bytes32 => bool) capabilities;
        /// Consumed transaction ids. Write-once, never pruned.
        mapping(bytes32 => bool) processed;
        /// Blocklisted tokens and forward targets.
        mapping(address => bool) restricted;

        /// Global protocol fee leg.
        address protocol_fee_recipient;
        uint256 protocol_fee_bps;

        /// Per-client developer fee legs, keyed by client id.
        mapping(bytes32 => address) client_fee_recipient;
        mapping(bytes32 => uint256) client_fee_bps;
    }
}

#[public]
impl OnrampGateway {
    /// One-shot bootstrap: grants `Admin`/`Operator` and sets the protocol
    /// fee leg. Deployment and upgrade plumbing live outside this contract.
    pub fn initialize(
        &mut self,
        admin: Address,
        operator: Address,
        protocol_fee_recipient: Address,
        protocol_fee_bps: U256,
    ) -> Result<(), GatewayError> {
        if self.initialized.get() {
            return Err(AlreadyInitialized {}.into());
        }
        if admin == Address::ZERO {
            return Err(ZeroAddress {}.into());
        }
        validate_fee_info(protocol_fee_recipient, protocol_fee_bps)?;

        self.initialized.set(true);
        self.capabilities
            .insert(capability_key(admin, Capability::Admin), true);
        if operator != Address::ZERO {
            self.capabilities
                .insert(capability_key(operator, Capability::Operator), true);
        }
        self.protocol_fee_recipient.set(protocol_fee_recipient);
        self.protocol_fee_bps.set(protocol_fee_bps);
        Ok(())
    }

    /// Primary entrypoint: verify the operator-signed request, take fees,
    /// forward the remainder, refund any surplus.
    #[payable]
    pub fn initiate_transaction(
        &mut self,
        request: PaymentRequestAbi,
        signature: Bytes,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        let request = request_from_abi(request);
        let result = self.process_initiate(&request, &signature.0);
        self.entered.set(false);
        result
    }

    /// Destination-chain completion: an allowlisted relayer pushes an exact
    /// payout to `receiver`. No fee legs, no signature.
    #[payable]
    pub fn complete_token_purchase(
        &mut self,
        client_id: FixedBytes<32>,
        transaction_id: FixedBytes<32>,
        token: Address,
        amount: U256,
        receiver: Address,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        let result = self.process_complete(client_id, transaction_id, token, amount, receiver);
        self.entered.set(false);
        result
    }

    // Views.

    pub fn is_processed(&self, transaction_id: FixedBytes<32>) -> bool {
        self.processed.get(transaction_id)
    }

    pub fn is_restricted(&self, account: Address) -> bool {
        self.restricted.get(account)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn has_capability(&self, account: Address, capability: u8) -> bool {
        match Capability::try_from(capability) {
            Ok(capability) => self.has_cap(account, capability),
            Err(()) => false,
        }
    }

    pub fn get_protocol_fee_info(&self) -> (Address, U256) {
        (
            self.protocol_fee_recipient.get(),
            self.protocol_fee_bps.get(),
        )
    }

    pub fn get_fee_info(&self, client_id: FixedBytes<32>) -> (Address, U256) {
        (
            self.client_fee_recipient.get(client_id),
            self.client_fee_bps.get(client_id),
        )
    }

    /// The digest an operator must sign for `request` on this deployment.
    /// Exposed so off-chain signers can cross-check their encoding.
    pub fn payment_digest(&self, request: PaymentRequestAbi) -> FixedBytes<32> {
        payment_request_digest(
            self.vm().chain_id(),
            self.vm().contract_address(),
            &request_from_abi(request),
        )
    }

    // Admin surface.

    pub fn pause(&mut self, enabled: bool) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        self.paused.set(enabled);
        Ok(())
    }

    pub fn restrict_address(
        &mut self,
        account: Address,
        restricted: bool,
    ) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        self.restricted.insert(account, restricted);
        Ok(())
    }

    pub fn set_protocol_fee_info(
        &mut self,
        recipient: Address,
        bps: U256,
    ) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        validate_fee_info(recipient, bps)?;
        self.protocol_fee_recipient.set(recipient);
        self.protocol_fee_bps.set(bps);
        Ok(())
    }

    pub fn set_fee_info(
        &mut self,
        client_id: FixedBytes<32>,
        recipient: Address,
        bps: U256,
    ) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        validate_fee_info(recipient, bps)?;
        self.client_fee_recipient.insert(client_id, recipient);
        self.client_fee_bps.insert(client_id, bps);
        Ok(())
    }

    pub fn set_capability(
        &mut self,
        account: Address,
        capability: u8,
        enabled: bool,
    ) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        let capability = Capability::try_from(capability)
            .map_err(|()| UnknownCapability { capability })?;
        self.capabilities
            .insert(capability_key(account, capability), enabled);
        Ok(())
    }

    /// Emergency extraction of a stranded balance to the admin itself.
    pub fn withdraw(&mut self, token: Address, amount: U256) -> Result<(), GatewayError> {
        let receiver = self.vm().msg_sender();
        self.withdraw_to(token, amount, receiver)
    }

    /// Emergency extraction of a stranded balance (e.g. a bridge refund that
    /// arrived after the original call completed).
    pub fn withdraw_to(
        &mut self,
        token: Address,
        amount: U256,
        receiver: Address,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        let result = self.process_withdraw(token, amount, receiver);
        self.entered.set(false);
        result
    }
}

impl OnrampGateway {
    fn process_initiate(
        &mut self,
        request: &PaymentRequest,
        signature: &[u8],
    ) -> Result<(), GatewayError> {
        if self.paused.get() {
            return Err(GatewayPaused {}.into());
        }
        if request.amount.is_zero() {
            return Err(ZeroAmount {}.into());
        }
        let block_time = U256::from(self.vm().block_timestamp());
        if request.deadline < block_time {
            return Err(RequestExpired {
                deadline: request.deadline,
                blockTime: block_time,
            }
            .into());
        }
        if self.processed.get(request.transaction_id) {
            return Err(TransactionAlreadyProcessed {
                transactionId: request.transaction_id,
            }
            .into());
        }

        if self.restricted.get(request.token) {
            return Err(RestrictedAddress {
                account: request.token,
            }
            .into());
        }
        if self.restricted.get(request.forward_to) {
            return Err(RestrictedAddress {
                account: request.forward_to,
            }
            .into());
        }

        let max_bps = U256::from(MAX_FEE_BPS);
        for bps in [request.protocol_fee_bps, request.developer_fee_bps] {
            if bps > max_bps {
                return Err(FeeRateTooHigh {
                    bps,
                    maxBps: max_bps,
                }
                .into());
            }
        }

        let digest = payment_request_digest(
            self.vm().chain_id(),
            self.vm().contract_address(),
            request,
        );
        let signer =
            recover_signer(digest, signature).map_err(|_| VerificationFailed {})?;
        if !self.has_cap(signer, Capability::Operator) {
            return Err(VerificationFailed {}.into());
        }

        let caller = self.vm().msg_sender();
        let value = self.vm().msg_value();

        // Resolve fee legs. Per-call developer terms win (a nonzero flat
        // amount over the rate); a zero recipient defers to the client
        // ledger entry. A leg without a recipient charges nothing.
        let (developer_recipient, developer_spec) =
            if request.developer_fee_recipient == Address::ZERO {
                (
                    self.client_fee_recipient.get(request.client_id),
                    FeeSpec::Rate(self.client_fee_bps.get(request.client_id)),
                )
            } else if !request.developer_fee_flat.is_zero() {
                (
                    request.developer_fee_recipient,
                    FeeSpec::Flat(request.developer_fee_flat),
                )
            } else {
                (
                    request.developer_fee_recipient,
                    FeeSpec::Rate(request.developer_fee_bps),
                )
            };
        let developer_spec = if developer_recipient == Address::ZERO {
            FeeSpec::Rate(U256::ZERO)
        } else {
            developer_spec
        };
        let protocol_recipient = self.protocol_fee_recipient.get();
        let protocol_spec = if protocol_recipient == Address::ZERO {
            FeeSpec::Rate(U256::ZERO)
        } else {
            FeeSpec::Rate(request.protocol_fee_bps)
        };

        let fees = FeeBreakdown::compute(request.amount, protocol_spec, developer_spec)
            .ok_or(MismatchedValue {
                expected: request.amount,
                provided: U256::MAX,
            })?;
        if fees.total > request.amount {
            return Err(MismatchedValue {
                expected: request.amount,
                provided: fees.total,
            }
            .into());
        }

        let is_native = request.is_native();
        // Net value attached to the forward. Native requests pay amount and
        // fees out of msg.value; token requests reserve the attached value
        // for the destination call itself.
        let send_value = if is_native {
            let required = request
                .amount
                .checked_add(fees.total)
                .ok_or(MismatchedValue {
                    expected: request.amount,
                    provided: fees.total,
                })?;
            if value < required {
                return Err(MismatchedValue {
                    expected: required,
                    provided: value,
                }
                .into());
            }
            value - fees.total
        } else {
            // A direct token transfer has no call to spend native value on.
            if request.is_direct_transfer() && !value.is_zero() {
                return Err(MsgValueNotZero {}.into());
            }
            value
        };

        // Consume the id before the first external call; a reentrant replay
        // with the same id then observes "already processed".
        self.processed.insert(request.transaction_id, true);

        self.pay_fee_leg(
            protocol_fee_scope(),
            caller,
            protocol_recipient,
            request.token,
            fees.protocol,
            protocol_spec.rate_bps(),
        )?;
        self.pay_fee_leg(
            request.client_id,
            caller,
            developer_recipient,
            request.token,
            fees.developer,
            developer_spec.rate_bps(),
        )?;

        if request.is_direct_transfer() {
            // Plain recipient, no payload, no custody.
            if is_native {
                transfer_native(request.forward_to, send_value).map_err(|_| {
                    NativeTransferFailed {
                        recipient: request.forward_to,
                    }
                })?;
            } else {
                Erc20::new(request.token).transfer_from(
                    caller,
                    request.forward_to,
                    request.amount,
                )?;
            }
        } else {
            self.forward_with_call(request, caller, send_value)?;
        }

        log(
            self.vm(),
            TransactionInitiated {
                sender: caller,
                transactionId: request.transaction_id,
                token: request.token,
                amount: request.amount,
                protocolFeeAmount: fees.protocol,
                developerFeeRecipient: developer_recipient,
                developerFeeBps: developer_spec.rate_bps(),
                developerFeeAmount: fees.developer,
                extraData: request.extra_data.clone().into(),
            },
        );
        Ok(())
    }

    /// Pull into custody (tokens), invoke the destination, then reconcile:
    /// leftover allowance is zeroed and any balance surplus goes back to the
    /// caller.
    fn forward_with_call(
        &mut self,
        request: &PaymentRequest,
        caller: Address,
        send_value: U256,
    ) -> Result<(), GatewayError> {
        let self_address = self.vm().contract_address();
        // Snapshots exclude the attached value so balances stranded before
        // this call stay withdrawable instead of leaking to the caller.
        let native_before = self
            .vm()
            .balance(self_address)
            .saturating_sub(self.vm().msg_value());

        let token = if request.is_native() {
            None
        } else {
            let erc20 = Erc20::new(request.token);
            let balance_before = erc20.balance_of(self_address)?;
            erc20.transfer_from(caller, self_address, request.amount)?;
            erc20.approve(request.effective_spender(), request.amount)?;
            Some((erc20, balance_before))
        };

        // Arbitrary external code runs here; this is the last state-changing
        // step before reconciliation. Revert payloads bubble up verbatim.
        call_with_value(request.forward_to, send_value, &request.call_data)
            .map_err(GatewayError::Forward)?;

        if let Some((erc20, balance_before)) = token {
            // Allowance hygiene, then return whatever the destination left
            // unspent or refunded.
            erc20.approve(request.effective_spender(), U256::ZERO)?;
            let balance_after = erc20.balance_of(self_address)?;
            let surplus = balance_after.saturating_sub(balance_before);
            if !surplus.is_zero() {
                erc20.transfer(caller, surplus)?;
            }
        }

        let native_surplus = self
            .vm()
            .balance(self_address)
            .saturating_sub(native_before);
        if !native_surplus.is_zero() {
            transfer_native(caller, native_surplus)
                .map_err(|_| NativeTransferFailed { recipient: caller })?;
        }
        Ok(())
    }

    fn process_complete(
        &mut self,
        client_id: FixedBytes<32>,
        transaction_id: FixedBytes<32>,
        token: Address,
        amount: U256,
        receiver: Address,
    ) -> Result<(), GatewayError> {
        if self.paused.get() {
            return Err(GatewayPaused {}.into());
        }
        let caller = self.vm().msg_sender();
        if !self.has_cap(caller, Capability::Operator) {
            return Err(Unauthorized { account: caller }.into());
        }
        if amount.is_zero() {
            return Err(ZeroAmount {}.into());
        }
        if self.processed.get(transaction_id) {
            return Err(TransactionAlreadyProcessed {
                transactionId: transaction_id,
            }
            .into());
        }

        let value = self.vm().msg_value();
        if token == NATIVE_TOKEN {
            // The payout must be funded exactly; nothing may strand here.
            if value != amount {
                return Err(MismatchedValue {
                    expected: amount,
                    provided: value,
                }
                .into());
            }
        } else if !value.is_zero() {
            return Err(MsgValueNotZero {}.into());
        }

        // Consumed before the transfer so a reentrant replay fails.
        self.processed.insert(transaction_id, true);

        if token == NATIVE_TOKEN {
            transfer_native(receiver, amount)
                .map_err(|_| NativeTransferFailed { recipient: receiver })?;
        } else {
            Erc20::new(token).transfer_from(caller, receiver, amount)?;
        }

        log(
            self.vm(),
            TransactionCompleted {
                clientId: client_id,
                transactionId: transaction_id,
                token,
                amount,
                receiver,
            },
        );
        Ok(())
    }

    fn process_withdraw(
        &mut self,
        token: Address,
        amount: U256,
        receiver: Address,
    ) -> Result<(), GatewayError> {
        self.require_cap(self.vm().msg_sender(), Capability::Admin)?;
        if receiver == Address::ZERO {
            return Err(ZeroAddress {}.into());
        }
        if token == NATIVE_TOKEN {
            transfer_native(receiver, amount)
                .map_err(|_| NativeTransferFailed { recipient: receiver })?;
        } else {
            Erc20::new(token).transfer(receiver, amount)?;
        }
        Ok(())
    }

    /// Transfer one fee leg and emit its payout record. Zero-amount legs are
    /// skipped silently.
    fn pay_fee_leg(
        &mut self,
        scope: FixedBytes<32>,
        payer: Address,
        recipient: Address,
        token: Address,
        amount: U256,
        bps: U256,
    ) -> Result<(), GatewayError> {
        if amount.is_zero() {
            return Ok(());
        }
        if token == NATIVE_TOKEN {
            transfer_native(recipient, amount)
                .map_err(|_| NativeTransferFailed { recipient })?;
        } else {
            Erc20::new(token).transfer_from(payer, recipient, amount)?;
        }
        log(
            self.vm(),
            FeePayout {
                scope,
                payer,
                recipient,
                token,
                amount,
                feeBps: bps,
            },
        );
        Ok(())
    }

    fn enter(&mut self) -> Result<(), GatewayError> {
        if self.entered.get() {
            return Err(ReentrantCall {}.into());
        }
        self.entered.set(true);
        Ok(())
    }

    fn has_cap(&self, account: Address, capability: Capability) -> bool {
        self.capabilities.get(capability_key(account, capability))
    }

    fn require_cap(&self, account: Address, capability: Capability) -> Result<(), GatewayError> {
        if self.has_cap(account, capability) {
            Ok(())
        } else {
            Err(Unauthorized { account }.into())
        }
    }
}

fn validate_fee_info(recipient: Address, bps: U256) -> Result<(), GatewayError> {
    if recipient == Address::ZERO {
        return Err(ZeroAddress {}.into());
    }
    let max_bps = U256::from(MAX_FEE_BPS);
    if bps > max_bps {
        return Err(FeeRateTooHigh {
            bps,
            maxBps: max_bps,
        }
        .into());
    }
    Ok(())
}
