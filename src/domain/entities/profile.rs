//! # Profile Entity
//!
//! A registered platform user, reachable by email and/or phone.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::contact::{normalize_email, normalize_phone};
use crate::domain::value_objects::{RecipientContact, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A platform user.
///
/// Contact fields are stored normalized so that recipient lookup is an exact
/// string comparison.
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::entities::profile::Profile;
/// use mineshare_ledger::domain::value_objects::RecipientContact;
///
/// let alice = Profile::new("Alice", Some("Alice@Example.com"), None).unwrap();
/// let contact = RecipientContact::parse("alice@example.com").unwrap();
/// assert!(alice.matches(&contact));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: UserId,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: Timestamp,
}

impl Profile {
    /// Creates a profile with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the name is blank or neither
    /// email nor phone is given, and `DomainError::InvalidContact` if a
    /// contact is malformed.
    pub fn new(full_name: &str, email: Option<&str>, phone: Option<&str>) -> DomainResult<Self> {
        Self::with_id(UserId::new_v4(), full_name, email, phone)
    }

    /// Creates a profile with a known id.
    ///
    /// # Errors
    ///
    /// Same as [`Profile::new`].
    pub fn with_id(
        id: UserId,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DomainResult<Self> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(DomainError::ValidationError(
                "full name must not be empty".to_string(),
            ));
        }
        if email.is_none() && phone.is_none() {
            return Err(DomainError::ValidationError(
                "a profile needs an email or a phone number".to_string(),
            ));
        }
        Ok(Self {
            id,
            full_name: full_name.to_string(),
            email: email.map(normalize_email).transpose()?,
            phone: phone.map(normalize_phone).transpose()?,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the user id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the normalized email, if any.
    #[inline]
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the normalized phone, if any.
    #[inline]
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns when the profile was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true if `contact` matches this profile exactly.
    #[must_use]
    pub fn matches(&self, contact: &RecipientContact) -> bool {
        match contact {
            RecipientContact::Email(e) => self.email.as_deref() == Some(e.as_str()),
            RecipientContact::Phone(p) => self.phone.as_deref() == Some(p.as_str()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Profile({}, {})", self.id, self.full_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_contact() {
        assert!(matches!(
            Profile::new("Alice", None, None),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_blank_name() {
        assert!(Profile::new("  ", Some("a@b.co"), None).is_err());
    }

    #[test]
    fn phone_match_is_normalized() {
        let p = Profile::new("Bob", None, Some("+256 700 123 456")).unwrap();
        assert!(p.matches(&RecipientContact::parse("+256-700-123-456").unwrap()));
        assert!(!p.matches(&RecipientContact::parse("0700123456").unwrap()));
    }

    #[test]
    fn email_does_not_match_phone_lookup() {
        let p = Profile::new("Carol", Some("carol@example.com"), None).unwrap();
        assert!(!p.matches(&RecipientContact::Phone("0700123456".to_string())));
    }
}
