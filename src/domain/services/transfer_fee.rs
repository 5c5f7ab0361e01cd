//! # Transfer Fee
//!
//! Fee charged to the sender of a share transfer.
//!
//! ```text
//! fee = percent / 100 × (quantity × price_per_share) + flat
//! ```
//!
//! rounded half-up to two decimal places.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::services::transfer_fee::FeeSchedule;
//! use mineshare_ledger::domain::value_objects::{Money, Percentage};
//! use rust_decimal::Decimal;
//!
//! let schedule = FeeSchedule::new(
//!     Percentage::new(Decimal::new(2, 0)).unwrap(),
//!     Money::new(Decimal::new(1_000, 0)).unwrap(),
//! );
//! let price = Money::new(Decimal::new(20_000, 0)).unwrap();
//! let fee = schedule.fee_for(30, price).unwrap();
//! assert_eq!(fee.get(), Decimal::new(13_000, 0));
//! ```

use crate::domain::errors::DomainResult;
use crate::domain::value_objects::arithmetic::{CheckedArithmetic, Rounding, round_money};
use crate::domain::value_objects::{Money, Percentage};
use serde::{Deserialize, Serialize};

/// Percentage-plus-flat transfer fee configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    percent: Percentage,
    flat: Money,
}

impl FeeSchedule {
    /// Creates a fee schedule.
    #[must_use]
    pub fn new(percent: Percentage, flat: Money) -> Self {
        Self { percent, flat }
    }

    /// A schedule that charges nothing.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// Returns the percentage component.
    #[inline]
    #[must_use]
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// Returns the flat component.
    #[inline]
    #[must_use]
    pub fn flat(&self) -> Money {
        self.flat
    }

    /// Computes the fee for moving `quantity` shares priced at `price_per_share`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn fee_for(&self, quantity: u64, price_per_share: Money) -> DomainResult<Money> {
        let notional = price_per_share.times(quantity)?;
        let variable = self.percent.of(notional.get())?;
        let fee = round_money(variable.safe_add(self.flat.get())?, Rounding::HalfUp);
        Ok(Money::new(fee)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn schedule(percent_bp: i64, flat: i64) -> FeeSchedule {
        FeeSchedule::new(
            Percentage::new(Decimal::new(percent_bp, 2)).unwrap(),
            Money::new(Decimal::new(flat, 0)).unwrap(),
        )
    }

    #[test]
    fn free_schedule_charges_nothing() {
        let fee = FeeSchedule::free()
            .fee_for(1_000, Money::new(Decimal::new(5, 0)).unwrap())
            .unwrap();
        assert!(fee.is_zero());
    }

    #[test]
    fn flat_only() {
        let fee = schedule(0, 500)
            .fee_for(10, Money::new(Decimal::new(99, 0)).unwrap())
            .unwrap();
        assert_eq!(fee.get(), Decimal::new(500, 0));
    }

    #[test]
    fn fractional_fee_rounds_half_up() {
        // 1.5% of 3 × 33.33 = 1.49985 → 1.50
        let fee = schedule(150, 0)
            .fee_for(3, Money::new(Decimal::new(3333, 2)).unwrap())
            .unwrap();
        assert_eq!(fee.get(), Decimal::new(150, 2));
    }

    proptest! {
        #[test]
        fn fee_never_decreases_with_quantity(q in 0u64..1_000_000, extra in 1u64..1_000, price in 1i64..1_000_000) {
            let s = schedule(250, 1_000);
            let p = Money::new(Decimal::new(price, 2)).unwrap();
            let small = s.fee_for(q, p).unwrap();
            let large = s.fee_for(q + extra, p).unwrap();
            prop_assert!(large >= small);
        }

        #[test]
        fn fee_at_least_flat(q in 0u64..1_000_000, price in 1i64..1_000_000) {
            let s = schedule(100, 750);
            let fee = s.fee_for(q, Money::new(Decimal::new(price, 2)).unwrap()).unwrap();
            prop_assert!(fee.get() >= Decimal::new(750, 0));
        }
    }
}
