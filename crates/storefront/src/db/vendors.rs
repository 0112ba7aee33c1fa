//! Vendor repository for database operations.
//!
//! Provides the read side of the public vendor directory. Queries use
//! runtime-checked `sqlx::query_as` with `FromRow` row types; every row is
//! converted into a validated [`VendorSummary`] before leaving this module.
//!
//! # Ordering
//!
//! Vendors are ordered by `business_name` under the `"C"` collation, i.e.
//! byte-wise and case-sensitive: `"Zeta"` sorts before `"alpha"`. Pinning the
//! collation keeps the order identical across database locales. Ties are
//! broken by `id`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use marketplace_core::{CommissionRate, Slug, VendorId};

use super::RepositoryError;
use crate::models::VendorSummary;

/// Approved vendors with active owners and their live product counts.
const LIST_APPROVED_VENDORS: &str = r#"
    SELECT v.id, v.business_name, v.slug, v.business_address, v.commission_rate,
           COUNT(p.id) AS active_product_count
    FROM marketplace.vendor v
    JOIN marketplace.user u ON u.id = v.user_id
    LEFT JOIN marketplace.product p
           ON p.vendor_id = v.id
          AND p.is_active
          AND NOT p.is_disabled_by_admin
    WHERE v.is_approved AND u.is_active
    GROUP BY v.id
    ORDER BY v.business_name COLLATE "C" ASC, v.id ASC
"#;

/// Same projection as [`LIST_APPROVED_VENDORS`], narrowed to one slug.
const GET_APPROVED_VENDOR_BY_SLUG: &str = r#"
    SELECT v.id, v.business_name, v.slug, v.business_address, v.commission_rate,
           COUNT(p.id) AS active_product_count
    FROM marketplace.vendor v
    JOIN marketplace.user u ON u.id = v.user_id
    LEFT JOIN marketplace.product p
           ON p.vendor_id = v.id
          AND p.is_active
          AND NOT p.is_disabled_by_admin
    WHERE v.is_approved AND u.is_active AND v.slug = $1
    GROUP BY v.id
"#;

/// Raw row shape shared by the vendor directory queries.
#[derive(Debug, sqlx::FromRow)]
struct VendorSummaryRow {
    id: String,
    business_name: String,
    slug: String,
    business_address: String,
    commission_rate: Decimal,
    active_product_count: i64,
}

impl TryFrom<VendorSummaryRow> for VendorSummary {
    type Error = RepositoryError;

    fn try_from(row: VendorSummaryRow) -> Result<Self, Self::Error> {
        let id = VendorId::parse(&row.id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid vendor id {:?}: {e}", row.id))
        })?;
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug for vendor {id}: {e}"))
        })?;
        let commission_rate = CommissionRate::new(row.commission_rate).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid commission for vendor {id}: {e}"))
        })?;
        let active_product_count = u32::try_from(row.active_product_count).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product count {} out of range for vendor {id}",
                row.active_product_count
            ))
        })?;

        Ok(Self {
            id,
            business_name: row.business_name,
            slug,
            business_address: row.business_address,
            commission_rate,
            active_product_count,
        })
    }
}

/// Repository for vendor database operations.
pub struct VendorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every approved vendor whose owning account is active.
    ///
    /// All-or-nothing: a single bad row fails the whole listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    #[instrument(skip(self))]
    pub async fn list_approved(&self) -> Result<Vec<VendorSummary>, RepositoryError> {
        let rows: Vec<VendorSummaryRow> = sqlx::query_as(LIST_APPROVED_VENDORS)
            .fetch_all(self.pool)
            .await?;

        let vendors = rows
            .into_iter()
            .map(VendorSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = vendors.len(), "Listed approved vendors");
        Ok(vendors)
    }

    /// Get one approved vendor by slug.
    ///
    /// Unapproved vendors and vendors with deactivated owners are reported
    /// as not found, exactly like unknown slugs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no listed vendor has this slug.
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    #[instrument(skip(self, slug), fields(slug = %slug))]
    pub async fn get_approved_by_slug(&self, slug: &Slug) -> Result<VendorSummary, RepositoryError> {
        let row: Option<VendorSummaryRow> = sqlx::query_as(GET_APPROVED_VENDOR_BY_SLUG)
            .bind(slug.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> VendorSummaryRow {
        VendorSummaryRow {
            id: "cjld2cjxh0000qzrmn831i7rn".to_string(),
            business_name: "Acme Goods".to_string(),
            slug: "acme-goods".to_string(),
            business_address: "1 Main St".to_string(),
            commission_rate: Decimal::new(1250, 4),
            active_product_count: 3,
        }
    }

    #[test]
    fn test_row_converts_to_summary() {
        let vendor = VendorSummary::try_from(row()).unwrap();
        assert_eq!(vendor.id.as_str(), "cjld2cjxh0000qzrmn831i7rn");
        assert_eq!(vendor.slug.as_str(), "acme-goods");
        assert_eq!(vendor.commission_rate.as_decimal(), Decimal::new(1250, 4));
        assert_eq!(vendor.active_product_count, 3);
    }

    #[test]
    fn test_row_with_bad_id_is_corruption() {
        let mut bad = row();
        bad.id = "42".to_string();
        assert!(matches!(
            VendorSummary::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_with_bad_slug_is_corruption() {
        let mut bad = row();
        bad.slug = "Acme Goods".to_string();
        assert!(matches!(
            VendorSummary::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_with_negative_count_is_corruption() {
        let mut bad = row();
        bad.active_product_count = -1;
        assert!(matches!(
            VendorSummary::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_with_out_of_range_commission_is_corruption() {
        let mut bad = row();
        bad.commission_rate = Decimal::new(2, 0);
        assert!(matches!(
            VendorSummary::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_queries_pin_collation_and_filters() {
        assert!(LIST_APPROVED_VENDORS.contains(r#"COLLATE "C" ASC"#));
        for query in [LIST_APPROVED_VENDORS, GET_APPROVED_VENDOR_BY_SLUG] {
            assert!(query.contains("v.is_approved AND u.is_active"));
            assert!(query.contains("AND NOT p.is_disabled_by_admin"));
        }
    }
}
