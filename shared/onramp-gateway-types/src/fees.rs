//! Basis-point fee arithmetic.
//!
//! All rates use floor division. Off-chain accounting assumes truncation, so
//! the sum of independently floored legs may undercut the nominal combined
//! rate; that is the intended behaviour.

use alloy_primitives::U256;

/// 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Hard cap on any single fee leg (3%).
pub const MAX_FEE_BPS: u64 = 300;

/// `floor(amount * bps / 10_000)`, or `None` on overflow.
pub fn fee_amount(amount: U256, bps: U256) -> Option<U256> {
    amount
        .checked_mul(bps)
        .map(|scaled| scaled / U256::from(BPS_DENOMINATOR))
}

/// How one fee leg is priced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeSpec {
    /// Basis points of the payment amount, floor division.
    Rate(U256),
    /// Absolute amount, independent of the payment amount.
    Flat(U256),
}

impl FeeSpec {
    /// Absolute amount of this leg for a payment of `amount`.
    pub fn amount_for(&self, amount: U256) -> Option<U256> {
        match self {
            FeeSpec::Rate(bps) => fee_amount(amount, *bps),
            FeeSpec::Flat(flat) => Some(*flat),
        }
    }

    /// The rate in bps, or zero for flat legs (used for event reporting).
    pub fn rate_bps(&self) -> U256 {
        match self {
            FeeSpec::Rate(bps) => *bps,
            FeeSpec::Flat(_) => U256::ZERO,
        }
    }
}

/// Absolute fee amounts resolved for one payment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub protocol: U256,
    pub developer: U256,
    pub total: U256,
}

impl FeeBreakdown {
    /// Resolve both legs for `amount`, or `None` on overflow.
    pub fn compute(amount: U256, protocol: FeeSpec, developer: FeeSpec) -> Option<Self> {
        let protocol = protocol.amount_for(amount)?;
        let developer = developer.amount_for(amount)?;
        let total = protocol.checked_add(developer)?;
        Some(Self {
            protocol,
            developer,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_instead_of_rounding() {
        // 9,999 * 1 / 10,000 = 0.9999 -> 0
        assert_eq!(
            fee_amount(U256::from(9_999u64), U256::from(1u64)),
            Some(U256::ZERO)
        );
        // 10,001 * 1 / 10,000 = 1.0001 -> 1
        assert_eq!(
            fee_amount(U256::from(10_001u64), U256::from(1u64)),
            Some(U256::from(1u64))
        );
    }

    #[test]
    fn legs_floor_independently() {
        // Two 1 bps legs on a tiny amount each floor to zero even though the
        // combined nominal rate would not.
        let breakdown = FeeBreakdown::compute(
            U256::from(5_000u64),
            FeeSpec::Rate(U256::from(1u64)),
            FeeSpec::Rate(U256::from(1u64)),
        )
        .unwrap();
        assert_eq!(breakdown.protocol, U256::ZERO);
        assert_eq!(breakdown.developer, U256::ZERO);
        assert_eq!(breakdown.total, U256::ZERO);
    }

    #[test]
    fn conserves_fee_sum() {
        // 100 units at 18 decimals, 30 bps protocol + 10 bps developer.
        let unit = U256::from(10u64).pow(U256::from(18u64));
        let amount = U256::from(100u64) * unit;
        let breakdown = FeeBreakdown::compute(
            amount,
            FeeSpec::Rate(U256::from(30u64)),
            FeeSpec::Rate(U256::from(10u64)),
        )
        .unwrap();

        // 0.3 units protocol, 0.1 units developer.
        assert_eq!(breakdown.protocol * U256::from(10u64), U256::from(3u64) * unit);
        assert_eq!(breakdown.developer * U256::from(10u64), unit);
        assert_eq!(breakdown.total, breakdown.protocol + breakdown.developer);
    }

    #[test]
    fn flat_legs_ignore_the_amount() {
        let flat = FeeSpec::Flat(U256::from(2_500u64));
        assert_eq!(
            flat.amount_for(U256::from(1u64)),
            Some(U256::from(2_500u64))
        );
        assert_eq!(
            flat.amount_for(U256::from(1_000_000u64)),
            Some(U256::from(2_500u64))
        );
        assert_eq!(flat.rate_bps(), U256::ZERO);
    }

    #[test]
    fn detects_overflow() {
        assert_eq!(fee_amount(U256::MAX, U256::from(2u64)), None);
        assert!(FeeBreakdown::compute(
            U256::MAX,
            FeeSpec::Rate(U256::from(300u64)),
            FeeSpec::Rate(U256::ZERO),
        )
        .is_none());
    }

    #[test]
    fn zero_rate_is_zero_fee() {
        let breakdown = FeeBreakdown::compute(
            U256::from(1_000_000u64),
            FeeSpec::Rate(U256::ZERO),
            FeeSpec::Rate(U256::ZERO),
        )
        .unwrap();
        assert_eq!(breakdown.total, U256::ZERO);
    }
}
