//! # Share Entity
//!
//! A share class of the mining project with its current unit price.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Currency, Money, ShareId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A share class and its current price per share.
///
/// # Invariants
///
/// - `price_per_share` is strictly positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    id: ShareId,
    name: String,
    price_per_share: Money,
    currency: Currency,
    updated_at: Timestamp,
}

impl Share {
    /// Creates a share class.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the name is blank or the
    /// price is zero.
    pub fn new(name: &str, price_per_share: Money, currency: Currency) -> DomainResult<Self> {
        Self::with_id(ShareId::new_v4(), name, price_per_share, currency)
    }

    /// Creates a share class with a known id.
    ///
    /// # Errors
    ///
    /// Same as [`Share::new`].
    pub fn with_id(
        id: ShareId,
        name: &str,
        price_per_share: Money,
        currency: Currency,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "share name must not be empty".to_string(),
            ));
        }
        Self::validate_price(price_per_share)?;
        Ok(Self {
            id,
            name: name.trim().to_string(),
            price_per_share,
            currency,
            updated_at: Timestamp::now(),
        })
    }

    fn validate_price(price: Money) -> DomainResult<()> {
        if !price.is_positive() {
            return Err(DomainError::ValidationError(
                "price per share must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the share id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ShareId {
        self.id
    }

    /// Returns the share name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current price per share.
    #[inline]
    #[must_use]
    pub fn price_per_share(&self) -> Money {
        self.price_per_share
    }

    /// Returns the pricing currency.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Returns when the price was last set.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Sets a new price per share.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the price is zero.
    pub fn set_price(&mut self, price_per_share: Money) -> DomainResult<()> {
        Self::validate_price(price_per_share)?;
        self.price_per_share = price_per_share;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Value of `quantity` shares at the current price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn value_of(&self, quantity: u64) -> DomainResult<Money> {
        Ok(self.price_per_share.times(quantity)?)
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Share({}, {} @ {} {})",
            self.id, self.name, self.price_per_share, self.currency
        )
    }
}
