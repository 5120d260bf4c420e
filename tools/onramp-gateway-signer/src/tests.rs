#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, FixedBytes, U256};
    use k256::ecdsa::SigningKey;

    use onramp_gateway_types::{payment_request_digest, PaymentRequest};

    use crate::signer::{operator_address, recover_request_signer, sign_request};

    const CHAIN_ID: u64 = 42161;

    fn gateway() -> Address {
        Address::new([0x47; 20])
    }

    fn operator_key() -> SigningKey {
        SigningKey::from_slice(&[0x42; 32]).expect("valid scalar")
    }

    fn sample_request() -> PaymentRequest {
        PaymentRequest {
            transaction_id: FixedBytes::new([0x01; 32]),
            client_id: FixedBytes::new([0x02; 32]),
            token: Address::new([0x03; 20]),
            amount: U256::from(1_000_000u64),
            forward_to: Address::new([0x04; 20]),
            spender: Address::ZERO,
            deadline: U256::from(1_900_000_000u64),
            developer_fee_recipient: Address::new([0x05; 20]),
            developer_fee_bps: U256::from(10u64),
            developer_fee_flat: U256::ZERO,
            protocol_fee_bps: U256::from(30u64),
            call_data: vec![0xDE, 0xAD],
            extra_data: vec![],
        }
    }

    #[test]
    fn signature_recovers_to_the_operator() {
        let key = operator_key();
        let request = sample_request();
        let signature = sign_request(&request, CHAIN_ID, gateway(), &key).unwrap();

        assert!(signature[64] == 27 || signature[64] == 28);

        let digest = payment_request_digest(CHAIN_ID, gateway(), &request);
        let recovered = recover_request_signer(digest, &signature).unwrap();
        assert_eq!(recovered, operator_address(key.verifying_key()));
    }

    #[test]
    fn tampered_fields_break_recovery() {
        let key = operator_key();
        let request = sample_request();
        let signature = sign_request(&request, CHAIN_ID, gateway(), &key).unwrap();
        let operator = operator_address(key.verifying_key());

        let mut tampered = request.clone();
        tampered.amount = U256::from(2_000_000u64);
        let digest = payment_request_digest(CHAIN_ID, gateway(), &tampered);
        // Recovery either fails outright or yields some other address.
        match recover_request_signer(digest, &signature) {
            Ok(recovered) => assert_ne!(recovered, operator),
            Err(_) => {}
        }
    }

    #[test]
    fn signatures_are_deployment_specific() {
        let key = operator_key();
        let request = sample_request();
        let signature = sign_request(&request, CHAIN_ID, gateway(), &key).unwrap();
        let operator = operator_address(key.verifying_key());

        let foreign_digest =
            payment_request_digest(CHAIN_ID + 1, gateway(), &request);
        match recover_request_signer(foreign_digest, &signature) {
            Ok(recovered) => assert_ne!(recovered, operator),
            Err(_) => {}
        }
    }

    #[test]
    fn distinct_keys_yield_distinct_operators() {
        let a = SigningKey::from_slice(&[0x42; 32]).unwrap();
        let b = SigningKey::from_slice(&[0x43; 32]).unwrap();
        assert_ne!(
            operator_address(a.verifying_key()),
            operator_address(b.verifying_key())
        );
    }

    #[test]
    fn corrupted_v_byte_is_rejected() {
        let key = operator_key();
        let request = sample_request();
        let mut signature = sign_request(&request, CHAIN_ID, gateway(), &key).unwrap();
        signature[64] = 99;

        let digest = payment_request_digest(CHAIN_ID, gateway(), &request);
        assert!(recover_request_signer(digest, &signature).is_err());
    }
}
