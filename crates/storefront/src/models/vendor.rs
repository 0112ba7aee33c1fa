//! Vendor domain types.
//!
//! These types represent validated read projections, separate from database
//! row types.

use serde::Serialize;

use marketplace_core::{CommissionRate, Slug, VendorId};

/// Public directory entry for an approved vendor.
///
/// Only vendors approved by platform staff whose owning account is active are
/// ever materialized as a `VendorSummary`. The projection carries nothing
/// beyond what the directory shows; the owning user is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    /// Vendor ID.
    pub id: VendorId,
    /// Display name, also the directory sort key.
    pub business_name: String,
    /// Unique URL key.
    pub slug: Slug,
    /// Registered business address.
    pub business_address: String,
    /// Platform commission as a fraction.
    pub commission_rate: CommissionRate,
    /// Products that are active and not disabled by an admin.
    pub active_product_count: u32,
}
