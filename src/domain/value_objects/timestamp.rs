//! # Timestamp
//!
//! UTC instant for lot acquisition, order submission and event metadata.
//!
//! Lots are debited oldest first, so ordering must follow time order; the
//! derived `Ord` on the wrapped `DateTime<Utc>` gives exactly that.
//!
//! ```
//! use mineshare_ledger::domain::value_objects::timestamp::Timestamp;
//!
//! let acquired = Timestamp::from_secs(1_704_067_200).unwrap();
//! assert!(Timestamp::now().is_after(&acquired));
//! assert_eq!(acquired.to_string(), "2024-01-01T00:00:00+00:00");
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// From Unix milliseconds, as stored in the event table.
    /// `None` when out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// From Unix seconds. `None` when out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Unix milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Unix seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Strictly later than `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}
