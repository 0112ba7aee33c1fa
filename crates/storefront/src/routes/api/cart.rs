//! Cart validation API.
//!
//! These endpoints are the validation boundary for cart mutations: a body
//! either comes back typed and normalized, or every violation is listed.

use tracing::instrument;

use crate::envelope::ApiResponse;
use crate::error::add_breadcrumb;
use crate::validation::{AddToCart, MergeCart, UpdateQuantity, ValidatedJson};

/// POST /api/cart/validate/add
#[instrument(skip_all, fields(product_id = %item.product_id))]
pub async fn validate_add(ValidatedJson(item): ValidatedJson<AddToCart>) -> ApiResponse<AddToCart> {
    add_breadcrumb(
        "cart",
        "Validated add to cart",
        Some(&[("product_id", item.product_id.as_str())]),
    );
    ApiResponse::success(item)
}

/// POST /api/cart/validate/update
#[instrument(skip_all, fields(quantity = update.quantity))]
pub async fn validate_update(
    ValidatedJson(update): ValidatedJson<UpdateQuantity>,
) -> ApiResponse<UpdateQuantity> {
    if update.is_removal() {
        add_breadcrumb("cart", "Validated line removal", None);
    }
    ApiResponse::success(update)
}

/// POST /api/cart/validate/merge
#[instrument(skip_all, fields(items = merge.guest_cart_items.len()))]
pub async fn validate_merge(
    ValidatedJson(merge): ValidatedJson<MergeCart>,
) -> ApiResponse<MergeCart> {
    add_breadcrumb("cart", "Validated guest cart merge", None);
    ApiResponse::success(merge)
}
