//! Fee Grossing-Up
//!
//! When a guest chooses to cover processing fees, the charge is grossed up so
//! that after the processor keeps `total * rate + fixed` the couple still
//! receives the full gift:
//!
//! ```text
//! amount = total - (total * rate + fixed)
//! total  = (amount + fixed) / (1 - rate)
//! ```
//!
//! The total is rounded **up** to the next cent. The couple therefore never
//! nets less than the gift, and never more than a cent above it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Percentage fee for domestic cards (1.75%)
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.0175);

/// Fixed per-charge fee in major units ($0.30)
pub const DEFAULT_FIXED_FEE: Decimal = dec!(0.30);

const CENT_PLACES: u32 = 2;
const MINOR_PER_MAJOR: Decimal = dec!(100);

/// Processor fee schedule: percentage plus a fixed amount per charge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fraction of the charge kept by the processor
    pub rate: Decimal,

    /// Fixed fee per charge, in major units
    pub fixed: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            rate: DEFAULT_FEE_RATE,
            fixed: DEFAULT_FIXED_FEE,
        }
    }
}

impl FeeSchedule {
    pub const fn new(rate: Decimal, fixed: Decimal) -> Self {
        Self { rate, fixed }
    }

    /// Quote the charge for a gift of `amount` major units.
    pub fn quote(&self, amount: Decimal, cover_fees: bool) -> GiftQuote {
        if !cover_fees || amount <= Decimal::ZERO {
            return GiftQuote {
                gift: amount,
                fee: Decimal::ZERO,
                total: amount,
            };
        }

        // Saturates rather than overflowing on amounts beyond any card limit
        let total = amount
            .checked_add(self.fixed)
            .and_then(|gross| gross.checked_div(Decimal::ONE - self.rate))
            .map_or(Decimal::MAX, |exact| {
                exact.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::ToPositiveInfinity)
            });

        GiftQuote {
            gift: amount,
            fee: total.checked_sub(amount).unwrap_or(Decimal::ZERO),
            total,
        }
    }

    /// What the recipient keeps from a charge of `total`
    pub fn net_of(&self, total: Decimal) -> Decimal {
        total - (total * self.rate + self.fixed)
    }
}

/// Breakdown of a gift charge, in major units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftQuote {
    /// Amount the guest wants the couple to receive
    pub gift: Decimal,

    /// Extra charged to cover processing (zero when fees are not covered)
    pub fee: Decimal,

    /// Amount charged to the card
    pub total: Decimal,
}

impl GiftQuote {
    /// Charge in minor units (cents), rounded once from the final total.
    ///
    /// Saturates at `i64::MAX`; validated gifts are far below that.
    pub fn total_minor_units(&self) -> i64 {
        self.total
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|minor| {
                minor
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
            })
            .unwrap_or(i64::MAX)
    }

    pub fn covers_fees(&self) -> bool {
        !self.fee.is_zero()
    }
}
