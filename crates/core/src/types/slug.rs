//! Vendor slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
    /// The input contains `--`.
    #[error("slug cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
}

/// A unique, human-readable vendor key used in URLs.
///
/// ## Constraints
///
/// - Length: 1-100 characters
/// - Only lowercase ASCII letters, digits and hyphens
/// - No leading, trailing, or consecutive hyphens
///
/// ## Examples
///
/// ```
/// use marketplace_core::Slug;
///
/// assert!(Slug::parse("acme-goods").is_ok());
/// assert!(Slug::parse("shop42").is_ok());
///
/// assert!(Slug::parse("").is_err());           // empty
/// assert!(Slug::parse("Acme").is_err());       // uppercase
/// assert!(Slug::parse("-acme").is_err());      // leading hyphen
/// assert!(Slug::parse("acme--goods").is_err()); // consecutive hyphens
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 100 characters
    /// - Contains anything but `[a-z0-9-]`
    /// - Starts or ends with a hyphen, or contains `--`
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }

        if s.contains("--") {
            return Err(SlugError::ConsecutiveHyphens);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("a").is_ok());
        assert!(Slug::parse("acme").is_ok());
        assert!(Slug::parse("acme-goods-2").is_ok());
        assert!(Slug::parse(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            Slug::parse(&"a".repeat(101)),
            Err(SlugError::TooLong { max: 100 })
        );
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(Slug::parse("Acme"), Err(SlugError::InvalidCharacter('A')));
        assert_eq!(
            Slug::parse("acme goods"),
            Err(SlugError::InvalidCharacter(' '))
        );
        assert_eq!(
            Slug::parse("../etc"),
            Err(SlugError::InvalidCharacter('.'))
        );
    }

    #[test]
    fn test_parse_hyphen_rules() {
        assert_eq!(Slug::parse("-acme"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("acme-"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("acme--goods"), Err(SlugError::ConsecutiveHyphens));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let slug: Slug = serde_json::from_str("\"acme-goods\"").unwrap();
        assert_eq!(slug.as_str(), "acme-goods");
        assert!(serde_json::from_str::<Slug>("\"Acme Goods\"").is_err());
    }
}
