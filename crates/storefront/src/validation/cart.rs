//! Cart mutation payloads.
//!
//! Field names and bounds are the wire contract for the cart endpoints:
//!
//! | Shape            | Field            | Constraint                         |
//! |------------------|------------------|------------------------------------|
//! | add-to-cart      | `productId`      | CUID                               |
//! |                  | `quantity`       | integer, 1..=999                   |
//! |                  | `variantId`      | optional; CUID when present        |
//! | update-quantity  | `quantity`       | integer, 0..=999 (0 removes)       |
//! | merge-guest-cart | `guestCartItems` | at most 50 add-to-cart items       |
//!
//! Stock and pricing rules are not checked here.

use serde::Serialize;
use serde_json::{Map, Value};

use marketplace_core::{ProductId, VariantId};

use super::{
    Validate, ValidationErrors, cuid, expect_object, field_path, index_path, integer_in_range,
    required,
};

/// Smallest quantity accepted when adding an item.
pub const MIN_ADD_QUANTITY: i64 = 1;
/// Smallest quantity accepted when updating an item; zero removes it.
pub const MIN_UPDATE_QUANTITY: i64 = 0;
/// Largest quantity of a single line.
pub const MAX_QUANTITY: i64 = 999;
/// Largest guest cart that can be merged in one request.
pub const MAX_GUEST_CART_ITEMS: usize = 50;

/// One cart line to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
}

/// Body of an add-to-cart request.
pub type AddToCart = CartItem;

impl CartItem {
    /// Validate one item located at `path`, recording violations in `errors`.
    fn check(input: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Self> {
        let object = expect_object(input, path, errors)?;

        let product_id = required(object, "productId", path, errors).and_then(|value| {
            cuid(value, &field_path(path, "productId"), ProductId::parse, errors)
        });
        let quantity = check_quantity(object, path, MIN_ADD_QUANTITY, errors);
        let variant_id = object.get("variantId").map(|value| {
            cuid(value, &field_path(path, "variantId"), VariantId::parse, errors)
        });

        Some(Self {
            product_id: product_id?,
            quantity: quantity?,
            variant_id: match variant_id {
                None => None,
                Some(parsed) => Some(parsed?),
            },
        })
    }
}

impl Validate for CartItem {
    fn validate(input: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let item = Self::check(input, "", &mut errors);
        errors.finish(item)
    }
}

/// Body of an update-quantity request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantity {
    pub quantity: u16,
}

impl UpdateQuantity {
    /// Whether the update removes the line.
    #[must_use]
    pub const fn is_removal(&self) -> bool {
        self.quantity == 0
    }
}

impl Validate for UpdateQuantity {
    fn validate(input: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let update = expect_object(input, "", &mut errors)
            .and_then(|object| check_quantity(object, "", MIN_UPDATE_QUANTITY, &mut errors))
            .map(|quantity| Self { quantity });
        errors.finish(update)
    }
}

/// Body of a merge-guest-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCart {
    pub guest_cart_items: Vec<CartItem>,
}

impl Validate for MergeCart {
    fn validate(input: &Value) -> Result<Self, ValidationErrors> {
        const FIELD: &str = "guestCartItems";

        let mut errors = ValidationErrors::new();
        let Some(object) = expect_object(input, "", &mut errors) else {
            return Err(errors);
        };
        let Some(value) = required(object, FIELD, "", &mut errors) else {
            return Err(errors);
        };
        let Value::Array(entries) = value else {
            errors.push(
                FIELD,
                format!("Expected array, received {}", super::type_name(value)),
            );
            return Err(errors);
        };

        if entries.len() > MAX_GUEST_CART_ITEMS {
            errors.push(
                FIELD,
                format!("Array must contain at most {MAX_GUEST_CART_ITEMS} element(s)"),
            );
        }

        // Every entry is checked, even past the limit, so all issues surface at once.
        let items: Vec<Option<CartItem>> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| CartItem::check(entry, &index_path(FIELD, index), &mut errors))
            .collect();

        let merged = items
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(|guest_cart_items| Self { guest_cart_items });
        errors.finish(merged)
    }
}

/// Check the `quantity` key of `object` against `min..=MAX_QUANTITY`.
fn check_quantity(
    object: &Map<String, Value>,
    parent: &str,
    min: i64,
    errors: &mut ValidationErrors,
) -> Option<u16> {
    let value = required(object, "quantity", parent, errors)?;
    let quantity = integer_in_range(value, &field_path(parent, "quantity"), min, MAX_QUANTITY, errors)?;
    u16::try_from(quantity).ok()
}
