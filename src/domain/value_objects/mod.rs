//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`UserId`], [`ShareId`], [`HoldingId`]: UUID-based identifiers
//! - [`TransferId`], [`SellOrderId`], [`AllocationRuleId`], [`EventId`]
//!
//! ## Numeric Types
//!
//! - [`Money`]: Non-negative decimal amount with checked arithmetic
//! - [`Percentage`]: Percent value in `[0, 100]`
//! - Share quantities are plain `u64` whole shares
//!
//! ## Policies
//!
//! - [`SellingRules`]: Per-order quantity limits for the sell queue
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`Rounding`]: Explicit rounding direction for money
//!
//! ## Domain Enums
//!
//! - [`TransferStatus`], [`SellOrderStatus`], [`SubWalletType`]

pub mod arithmetic;
pub mod contact;
pub mod enums;
pub mod ids;
pub mod money;
pub mod percentage;
pub mod selling_rules;
pub mod timestamp;

pub use arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic, MONEY_SCALE, Rounding, round_money,
};
pub use contact::RecipientContact;
pub use enums::{ParseEnumError, SellOrderStatus, SubWalletType, TransferStatus};
pub use ids::{
    AllocationRuleId, EventId, HoldingId, SellOrderId, ShareId, TransferId, UserId,
};
pub use money::{Currency, Money};
pub use percentage::Percentage;
pub use selling_rules::SellingRules;
pub use timestamp::Timestamp;
