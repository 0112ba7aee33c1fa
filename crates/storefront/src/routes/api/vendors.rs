//! Vendor directory API.

use axum::extract::{Path, State};
use tracing::instrument;

use marketplace_core::Slug;

use crate::db::{RepositoryError, VendorRepository};
use crate::envelope::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::VendorSummary;
use crate::state::AppState;

const VENDOR_NOT_FOUND: &str = "Vendor not found";

/// List approved vendors.
///
/// GET /api/vendors
///
/// # Errors
///
/// Returns a generic 500 if the listing cannot be read.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<ApiResponse<Vec<VendorSummary>>> {
    let vendors = VendorRepository::new(state.pool())
        .list_approved()
        .await
        .map_err(AppError::retrieval("Failed to fetch vendors"))?;

    Ok(ApiResponse::success(vendors))
}

/// Show one approved vendor.
///
/// GET /api/vendors/{slug}
///
/// # Errors
///
/// Returns 404 for malformed, unknown, or unlisted slugs and a generic 500
/// if the vendor cannot be read.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<VendorSummary>> {
    let Ok(slug) = Slug::parse(&slug) else {
        return Err(AppError::NotFound(VENDOR_NOT_FOUND.to_string()));
    };

    match VendorRepository::new(state.pool())
        .get_approved_by_slug(&slug)
        .await
    {
        Ok(vendor) => Ok(ApiResponse::success(vendor)),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(VENDOR_NOT_FOUND.to_string())),
        Err(e) => Err(AppError::retrieval("Failed to fetch vendor")(e)),
    }
}
