//! # Domain Enums
//!
//! Status and classification enums for the share ledger.
//!
//! - [`TransferStatus`] - Lifecycle of a share transfer request
//! - [`SellOrderStatus`] - Lifecycle of a sell order in the FIFO queue
//! - [`SubWalletType`] - Internal fund buckets fed by share-sale proceeds
//!
//! String forms match the persisted column values (`pending`,
//! `share_buyback`, ...), both for `Display`/`FromStr` and for serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The string is not a known value for the enum.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Status of a share transfer request.
///
/// ```text
/// Pending → Completed
///    └────→ Failed
/// ```
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::value_objects::enums::TransferStatus;
///
/// assert!(TransferStatus::Pending.can_transition_to(TransferStatus::Completed));
/// assert!(!TransferStatus::Failed.can_transition_to(TransferStatus::Completed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Created by the sender, awaiting server-side processing.
    #[default]
    Pending,
    /// Holdings and fee have been booked (terminal).
    Completed,
    /// Processing rejected the transfer (terminal).
    Failed,
}

impl TransferStatus {
    /// Returns true for `Completed` and `Failed`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if this status can move to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Failed)
        )
    }

    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseEnumError::InvalidValue("TransferStatus", s.to_string())),
        }
    }
}

/// Status of a sell order.
///
/// ```text
/// Pending → Processing → Completed
///    │          └──────→ Processing (further partial fills)
///    ├─────────────────→ Completed (filled in one go)
///    └─────────────────→ Cancelled
/// ```
///
/// Only pending orders can be cancelled or have their quantity modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellOrderStatus {
    /// Waiting in the queue, still editable.
    #[default]
    Pending,
    /// Partially filled.
    Processing,
    /// Fully filled (terminal).
    Completed,
    /// Withdrawn by the seller (terminal).
    Cancelled,
}

impl SellOrderStatus {
    /// Returns true for `Completed` and `Cancelled`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true while the order still occupies a queue slot.
    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Returns true if this status can move to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Processing)
                | (Self::Processing, Self::Completed)
        )
    }

    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SellOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SellOrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::InvalidValue("SellOrderStatus", s.to_string())),
        }
    }
}

/// Internal fund bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubWalletType {
    /// Operating funds of the platform administration.
    AdminFund,
    /// Capital earmarked for the mining project.
    ProjectFunding,
    /// Reserve used to buy shares back from the sell queue.
    ShareBuyback,
}

impl SubWalletType {
    /// All sub-wallet types, in allocation order.
    pub const ALL: [Self; 3] = [Self::ProjectFunding, Self::AdminFund, Self::ShareBuyback];

    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminFund => "admin_fund",
            Self::ProjectFunding => "project_funding",
            Self::ShareBuyback => "share_buyback",
        }
    }
}

impl fmt::Display for SubWalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubWalletType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin_fund" => Ok(Self::AdminFund),
            "project_funding" => Ok(Self::ProjectFunding),
            "share_buyback" => Ok(Self::ShareBuyback),
            _ => Err(ParseEnumError::InvalidValue("SubWalletType", s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod transfer_status {
        use super::*;

        #[test]
        fn pending_is_not_terminal() {
            assert!(!TransferStatus::Pending.is_terminal());
            assert!(TransferStatus::Completed.is_terminal());
            assert!(TransferStatus::Failed.is_terminal());
        }

        #[test]
        fn terminal_states_do_not_transition() {
            for from in [TransferStatus::Completed, TransferStatus::Failed] {
                for to in [
                    TransferStatus::Pending,
                    TransferStatus::Completed,
                    TransferStatus::Failed,
                ] {
                    assert!(!from.can_transition_to(to));
                }
            }
        }

        #[test]
        fn parse_and_display_agree() {
            for status in [
                TransferStatus::Pending,
                TransferStatus::Completed,
                TransferStatus::Failed,
            ] {
                assert_eq!(status.to_string().parse::<TransferStatus>().unwrap(), status);
            }
            assert!("done".parse::<TransferStatus>().is_err());
        }
    }

    mod sell_order_status {
        use super::*;

        #[test]
        fn only_pending_can_be_cancelled() {
            assert!(SellOrderStatus::Pending.can_transition_to(SellOrderStatus::Cancelled));
            assert!(!SellOrderStatus::Processing.can_transition_to(SellOrderStatus::Cancelled));
            assert!(!SellOrderStatus::Completed.can_transition_to(SellOrderStatus::Cancelled));
        }

        #[test]
        fn open_states() {
            assert!(SellOrderStatus::Pending.is_open());
            assert!(SellOrderStatus::Processing.is_open());
            assert!(!SellOrderStatus::Completed.is_open());
            assert!(!SellOrderStatus::Cancelled.is_open());
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&SellOrderStatus::Processing).unwrap();
            assert_eq!(json, "\"processing\"");
        }
    }

    mod sub_wallet_type {
        use super::*;

        #[test]
        fn parse_and_display_agree() {
            for ty in SubWalletType::ALL {
                assert_eq!(ty.to_string().parse::<SubWalletType>().unwrap(), ty);
            }
        }

        #[test]
        fn serde_matches_column_values() {
            let json = serde_json::to_string(&SubWalletType::ShareBuyback).unwrap();
            assert_eq!(json, "\"share_buyback\"");
        }
    }
}
