//! # Identifiers
//!
//! UUID-backed identifiers for ledger aggregates.
//!
//! Each identifier is a distinct newtype so a [`UserId`] can never be passed
//! where a [`ShareId`] is expected.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::value_objects::ids::{TransferId, UserId};
//!
//! let user = UserId::new_v4();
//! let parsed: UserId = user.to_string().parse().unwrap();
//! assert_eq!(user, parsed);
//!
//! let transfer = TransferId::new_v4();
//! assert_ne!(transfer.get(), user.get());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wraps an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generates a random (v4) identifier.
            #[inline]
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn get(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a platform user (investor or administrator).
    UserId
);
uuid_id!(
    /// Identifier of a share class.
    ShareId
);
uuid_id!(
    /// Identifier of a holding lot.
    HoldingId
);
uuid_id!(
    /// Identifier of a share transfer request.
    TransferId
);
uuid_id!(
    /// Identifier of a sell order.
    SellOrderId
);
uuid_id!(
    /// Identifier of an allocation rule version.
    AllocationRuleId
);
uuid_id!(
    /// Identifier of a domain event.
    EventId
);
