//! # Holding Ledger
//!
//! Operations over a user's lots of one share class.
//!
//! Debits consume unlocked lots oldest first. The whole debit is checked
//! against the unlocked total before any lot is touched, so a failed debit
//! leaves every lot unchanged.

use crate::domain::entities::holding::Holding;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::HoldingId;
use crate::domain::value_objects::arithmetic::CheckedArithmetic;

/// Total shares across unlocked lots.
///
/// # Errors
///
/// Returns `DomainError::Arithmetic` on overflow.
pub fn transferable_total(lots: &[Holding]) -> DomainResult<u64> {
    lots.iter()
        .try_fold(0u64, |acc, lot| acc.safe_add(lot.available()))
        .map_err(DomainError::from)
}

/// Total shares across all lots, locked or not.
///
/// # Errors
///
/// Returns `DomainError::Arithmetic` on overflow.
pub fn total_quantity(lots: &[Holding]) -> DomainResult<u64> {
    lots.iter()
        .try_fold(0u64, |acc, lot| acc.safe_add(lot.quantity()))
        .map_err(DomainError::from)
}

/// Debits `quantity` shares from the unlocked lots, oldest first.
///
/// Returns the ids of the lots that changed.
///
/// # Errors
///
/// Returns `DomainError::InsufficientHoldings` if the unlocked total is
/// below `quantity`; no lot is modified in that case.
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::entities::Holding;
/// use mineshare_ledger::domain::services::holding_ledger::{debit_oldest_first, transferable_total};
/// use mineshare_ledger::domain::value_objects::{Money, ShareId, UserId};
///
/// let owner = UserId::new_v4();
/// let share = ShareId::new_v4();
/// let mut lots = vec![
///     Holding::new(owner, share, 40, Money::zero()).unwrap(),
///     Holding::new(owner, share, 60, Money::zero()).unwrap(),
/// ];
///
/// let touched = debit_oldest_first(&mut lots, 30).unwrap();
/// assert_eq!(touched.len(), 1);
/// assert_eq!(transferable_total(&lots).unwrap(), 70);
/// ```
pub fn debit_oldest_first(lots: &mut [Holding], quantity: u64) -> DomainResult<Vec<HoldingId>> {
    let available = transferable_total(lots)?;
    if quantity > available {
        return Err(DomainError::InsufficientHoldings {
            available,
            requested: quantity,
        });
    }

    lots.sort_by_key(|lot| lot.acquired_at());

    let mut outstanding = quantity;
    let mut touched = Vec::new();
    for lot in lots.iter_mut() {
        if outstanding == 0 {
            break;
        }
        let take = lot.available().min(outstanding);
        if take == 0 {
            continue;
        }
        lot.debit(take)?;
        outstanding = outstanding.safe_sub(take)?;
        touched.push(lot.id());
    }
    Ok(touched)
}
