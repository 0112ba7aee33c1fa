//! Request body validation.
//!
//! Every request shape has one explicit entry point, [`Validate::validate`],
//! which turns untyped JSON into a typed payload or reports *every* offending
//! field. Handlers receive already-validated payloads through the
//! [`ValidatedJson`] extractor, so invalid input never reaches storage.
//!
//! # Error Response
//!
//! ```json
//! {
//!   "success": false,
//!   "error": "Validation failed",
//!   "details": [
//!     {"path": "productId", "message": "Invalid cuid"},
//!     {"path": "quantity", "message": "Number must be less than or equal to 999"}
//!   ]
//! }
//! ```

pub mod cart;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AppError;

pub use cart::{AddToCart, CartItem, MergeCart, UpdateQuantity};

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Location of the offending value, e.g. `guestCartItems[2].quantity`.
    /// Empty for the request body itself.
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

/// All constraint violations found in one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create an empty error list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation at `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Whether no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The recorded violations, in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Consume the list and return the violations.
    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// Whether any violation was recorded at exactly `path`.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }

    /// `Ok(value)` when nothing was recorded (and a value was produced),
    /// otherwise the collected violations.
    fn finish<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

/// A request payload that can be built from untyped JSON.
pub trait Validate: Sized {
    /// Validate `input` and produce the typed payload.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint, not just the first.
    fn validate(input: &Value) -> Result<Self, ValidationErrors>;
}

/// Extractor that parses a JSON body and runs [`Validate::validate`] on it.
///
/// # Example
///
/// ```rust,ignore
/// async fn add(ValidatedJson(item): ValidatedJson<AddToCart>) -> impl IntoResponse {
///     // item.quantity is already known to be within 1..=999
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                AppError::BadRequest("Invalid JSON body".to_string())
            })?;

        Ok(Self(T::validate(&value)?))
    }
}

// =============================================================================
// Field Checks
// =============================================================================

/// Append an object key to a path.
fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Append an array index to a path.
fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// JSON type name used in "Expected X, received Y" messages.
const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Require `value` to be a JSON object.
fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Map<String, Value>> {
    if let Value::Object(map) = value {
        Some(map)
    } else {
        errors.push(
            path,
            format!("Expected object, received {}", type_name(value)),
        );
        None
    }
}

/// Fetch a required key. Missing keys are reported as `Required`.
fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    parent: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Value> {
    let value = object.get(key);
    if value.is_none() {
        errors.push(field_path(parent, key), "Required");
    }
    value
}

/// Check a CUID-valued field with the given parser.
fn cuid<T, E>(
    value: &Value,
    path: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let Value::String(s) = value else {
        errors.push(
            path,
            format!("Expected string, received {}", type_name(value)),
        );
        return None;
    };

    let parsed = parse(s).ok();
    if parsed.is_none() {
        errors.push(path, "Invalid cuid");
    }
    parsed
}

/// Check an integer field within `min..=max`.
///
/// Any integral number counts as an integer, including `2.0` and values too
/// large for `i64`. A non-integral number reports both the integer violation
/// and any range violation.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn integer_in_range(
    value: &Value,
    path: &str,
    min: i64,
    max: i64,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let Value::Number(number) = value else {
        errors.push(
            path,
            format!("Expected number, received {}", type_name(value)),
        );
        return None;
    };
    let as_float = number.as_f64()?;

    let integral = number.is_i64() || number.is_u64() || as_float.fract() == 0.0;

    let before = errors.len();
    if !integral {
        errors.push(path, "Expected integer, received float");
    }
    if as_float < min as f64 {
        errors.push(
            path,
            format!("Number must be greater than or equal to {min}"),
        );
    }
    if as_float > max as f64 {
        errors.push(path, format!("Number must be less than or equal to {max}"));
    }

    if errors.len() != before {
        return None;
    }
    // In range, so the float form is exact
    number.as_i64().or(Some(as_float as i64))
}
