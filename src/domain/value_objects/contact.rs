//! # Contact Value Objects
//!
//! Email and phone normalization used for exact recipient lookup.
//!
//! A transfer names its recipient by email or phone. Both forms are
//! normalized the same way on the stored profile and on the lookup input, so
//! "exact match" means equality of the normalized strings.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::value_objects::contact::RecipientContact;
//!
//! let by_email = RecipientContact::parse(" Alice@Example.com ").unwrap();
//! assert_eq!(by_email, RecipientContact::Email("alice@example.com".to_string()));
//!
//! let by_phone = RecipientContact::parse("+256 700-123 456").unwrap();
//! assert_eq!(by_phone, RecipientContact::Phone("+256700123456".to_string()));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of digits accepted in a phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// Normalizes an email address: trimmed and lowercased.
///
/// # Errors
///
/// Returns `DomainError::InvalidContact` if the address has no local part or
/// no domain.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(DomainError::InvalidContact(format!(
            "malformed email address: {raw}"
        ))),
    }
}

/// Normalizes a phone number: keeps digits and a single leading `+`.
///
/// Spaces, dashes, dots and parentheses are dropped.
///
/// # Errors
///
/// Returns `DomainError::InvalidContact` on any other character or when
/// fewer than seven digits remain.
pub fn normalize_phone(raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '+' if i == 0 => out.push(c),
            '0'..='9' => out.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(DomainError::InvalidContact(format!(
                    "malformed phone number: {raw}"
                )));
            }
        }
    }
    let digits = out.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(DomainError::InvalidContact(format!(
            "phone number too short: {raw}"
        )));
    }
    Ok(out)
}

/// How a sender identifies the recipient of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecipientContact {
    /// Normalized email address.
    Email(String),
    /// Normalized phone number.
    Phone(String),
}

impl RecipientContact {
    /// Parses free-form input: anything containing `@` is an email,
    /// everything else is a phone number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidContact` if the input is empty or cannot
    /// be normalized.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::InvalidContact(
                "recipient contact is empty".to_string(),
            ));
        }
        if raw.contains('@') {
            normalize_email(raw).map(Self::Email)
        } else {
            normalize_phone(raw).map(Self::Phone)
        }
    }
}

impl fmt::Display for RecipientContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(e) => write!(f, "email:{e}"),
            Self::Phone(p) => write!(f, "phone:{p}"),
        }
    }
}
