//! Guest customer contact details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating customer contact details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The email is empty.
    #[error("email cannot be empty")]
    EmptyEmail,
    /// The email is too long.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The email does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MalformedEmail,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// The customer name is blank.
    #[error("name cannot be empty")]
    EmptyName,
}

/// An email address, trimmed and structurally checked.
///
/// ```
/// use kaos_euy_core::Email;
///
/// assert!(Email::parse("pembeli@kaoseuy.id").is_ok());
/// assert!(Email::parse("  spaced@kaoseuy.id ").is_ok());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("two@@kaoseuy.id").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than 254
    /// characters, lacks exactly one `@`, or has an empty local part or
    /// domain.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::EmptyEmail);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ContactError::EmailTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(ContactError::MalformedEmail)?;
        if domain.contains('@') {
            return Err(ContactError::MalformedEmail);
        }
        if local.is_empty() {
            return Err(ContactError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(ContactError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the @.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Contact details for a guest checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub email: Email,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerContact {
    /// Validate raw form input.
    ///
    /// A blank phone is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is invalid or the name is blank.
    pub fn new(email: &str, name: &str, phone: Option<&str>) -> Result<Self, ContactError> {
        let email = Email::parse(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactError::EmptyName);
        }
        let phone = phone
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            email,
            name: name.to_string(),
            phone,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user+tag@example.co.id").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
        assert_eq!(Email::parse(" a@b.c\n").unwrap().as_str(), "a@b.c");
    }

    #[test]
    fn test_parse_invalid_emails() {
        assert_eq!(Email::parse("   "), Err(ContactError::EmptyEmail));
        assert_eq!(Email::parse("no-at"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("a@b@c"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("@b.c"), Err(ContactError::EmptyLocalPart));
        assert_eq!(Email::parse("a@"), Err(ContactError::EmptyDomain));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(ContactError::EmailTooLong { .. })
        ));
    }

    #[test]
    fn test_domain() {
        assert_eq!(Email::parse("user@kaoseuy.id").unwrap().domain(), "kaoseuy.id");
    }

    #[test]
    fn test_contact_validation() {
        let contact = CustomerContact::new("asep@kaoseuy.id", "  Asep  ", Some("  ")).unwrap();
        assert_eq!(contact.name, "Asep");
        assert_eq!(contact.phone, None);

        let contact = CustomerContact::new("asep@kaoseuy.id", "Asep", Some("0812")).unwrap();
        assert_eq!(contact.phone.as_deref(), Some("0812"));

        assert_eq!(
            CustomerContact::new("asep@kaoseuy.id", " ", None),
            Err(ContactError::EmptyName)
        );
        assert!(CustomerContact::new("asep", "Asep", None).is_err());
    }

    #[test]
    fn test_serde_shape() {
        let contact = CustomerContact::new("asep@kaoseuy.id", "Asep", None).unwrap();
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "asep@kaoseuy.id", "name": "Asep"})
        );
    }
}
