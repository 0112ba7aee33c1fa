//! CUID-backed identifiers for type-safe entity references.
//!
//! Records are keyed by CUIDs: 25-character, collision-resistant strings made
//! of a leading `c` followed by 24 lowercase base-36 characters, for example
//! `cjld2cjxh0000qzrmn831i7rn`.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Exact length of a CUID.
pub const CUID_LENGTH: usize = 25;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors that can occur when parsing a CUID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CuidError {
    /// The input has the wrong length.
    #[error("cuid must be exactly {CUID_LENGTH} characters (got {0})")]
    InvalidLength(usize),
    /// The input does not start with `c`.
    #[error("cuid must start with 'c'")]
    MissingPrefix,
    /// The input contains something other than lowercase letters and digits.
    #[error("cuid may only contain lowercase letters and digits")]
    InvalidCharacter,
}

/// Check that `s` has the CUID shape.
///
/// # Errors
///
/// Returns a [`CuidError`] describing the first violated rule.
///
/// # Examples
///
/// ```
/// use marketplace_core::validate_cuid;
///
/// assert!(validate_cuid("cjld2cjxh0000qzrmn831i7rn").is_ok());
/// assert!(validate_cuid("not-a-cuid").is_err());
/// ```
pub fn validate_cuid(s: &str) -> Result<(), CuidError> {
    if s.len() != CUID_LENGTH {
        return Err(CuidError::InvalidLength(s.len()));
    }

    if !s.starts_with('c') {
        return Err(CuidError::MissingPrefix);
    }

    if !s
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(CuidError::InvalidCharacter);
    }

    Ok(())
}

/// Generate a new CUID.
///
/// Layout after the `c` prefix: 8 chars of millisecond timestamp, 4 chars of
/// a per-process counter, 4 chars of process fingerprint, 8 random chars.
/// All blocks are base-36 and zero-padded.
#[must_use]
pub fn generate_cuid() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    let random: u64 = rand::rng().random();

    let mut id = String::with_capacity(CUID_LENGTH);
    id.push('c');
    push_base36(&mut id, millis, 8);
    push_base36(&mut id, count, 4);
    push_base36(&mut id, u64::from(std::process::id()), 4);
    push_base36(&mut id, random, 8);
    id
}

/// Append the low `width` base-36 digits of `value`, zero-padded.
fn push_base36(out: &mut String, mut value: u64, width: usize) {
    let mut digits = vec!['0'; width];
    for slot in digits.iter_mut().rev() {
        let digit = u32::try_from(value % 36).unwrap_or(0);
        *slot = char::from_digit(digit, 36).unwrap_or('0');
        value /= 36;
    }
    out.extend(digits);
}

/// Macro to define a type-safe CUID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, validated on deserialize
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `generate()`, `parse()`, `as_str()`, `into_inner()`
/// - `FromStr`, `TryFrom<String>`, `From<Id> for String`, `Display`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use marketplace_core::define_id;
/// define_id!(OrderId);
/// define_id!(InvoiceId);
///
/// let order_id = OrderId::parse("cjld2cjxh0000qzrmn831i7rn").unwrap();
/// assert_eq!(order_id.as_str(), "cjld2cjxh0000qzrmn831i7rn");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::generate_cuid())
            }

            /// Parse an ID, checking the CUID shape.
            ///
            /// # Errors
            ///
            /// Returns a `CuidError` if the input is not a CUID.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::CuidError> {
                $crate::validate_cuid(s)?;
                Ok(Self(s.to_owned()))
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::CuidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::CuidError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                $crate::validate_cuid(&s)?;
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                // Database values are assumed valid
                let id = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(VendorId);
define_id!(ProductId);
define_id!(VariantId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VALID: &str = "cjld2cjxh0000qzrmn831i7rn";

    #[test]
    fn test_validate_cuid_accepts_canonical_shape() {
        assert!(validate_cuid(VALID).is_ok());
        assert!(validate_cuid("c000000000000000000000000").is_ok());
    }

    #[test]
    fn test_validate_cuid_length() {
        assert_eq!(validate_cuid(""), Err(CuidError::InvalidLength(0)));
        assert_eq!(
            validate_cuid("cjld2cjxh0000qzrmn831i7r"),
            Err(CuidError::InvalidLength(24))
        );
        assert_eq!(
            validate_cuid("cjld2cjxh0000qzrmn831i7rnn"),
            Err(CuidError::InvalidLength(26))
        );
    }

    #[test]
    fn test_validate_cuid_prefix() {
        assert_eq!(
            validate_cuid("xjld2cjxh0000qzrmn831i7rn"),
            Err(CuidError::MissingPrefix)
        );
    }

    #[test]
    fn test_validate_cuid_characters() {
        assert_eq!(
            validate_cuid("cJLD2CJXH0000QZRMN831I7RN"),
            Err(CuidError::InvalidCharacter)
        );
        assert_eq!(
            validate_cuid("cjld2cjxh-000qzrmn831i7rn"),
            Err(CuidError::InvalidCharacter)
        );
    }

    #[test]
    fn test_generated_cuids_are_valid_and_unique() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| generate_cuid()).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert_eq!(validate_cuid(id), Ok(()));
        }
        assert!(VendorId::parse(VendorId::generate().as_str()).is_ok());
    }

    #[test]
    fn test_push_base36_pads_and_truncates() {
        let mut out = String::new();
        push_base36(&mut out, 35, 4);
        assert_eq!(out, "000z");

        out.clear();
        push_base36(&mut out, 36u64.pow(4) + 1, 4);
        assert_eq!(out, "0001");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        let product = ProductId::parse(VALID).unwrap();
        let variant = VariantId::parse(VALID).unwrap();
        assert_eq!(product.as_str(), variant.as_str());
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let id: ProductId = serde_json::from_str(&format!("\"{VALID}\"")).unwrap();
        assert_eq!(id.to_string(), VALID);
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{VALID}\""));

        assert!(serde_json::from_str::<ProductId>("\"abc\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let id: VendorId = VALID.parse().unwrap();
        assert_eq!(String::from(id), VALID);
        assert!("nope".parse::<VendorId>().is_err());
    }
}
