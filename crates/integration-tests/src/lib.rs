//! Integration tests for the marketplace storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Database tests (migrations are applied automatically)
//! DATABASE_URL=postgres://localhost/marketplace_test \
//!     cargo test -p marketplace-integration-tests -- --ignored
//!
//! # Live server tests additionally need a running storefront
//! STOREFRONT_BASE_URL=http://localhost:3000 \
//!     cargo test -p marketplace-integration-tests --test storefront_api -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `vendor_listing` - Repository queries against `PostgreSQL`
//! - `storefront_api` - HTTP tests against a running server
//!
//! Database tests share one database. Every fixture row is tagged with a
//! per-test marker so tests only look at their own rows.

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use marketplace_core::{ProductId, UserId, VendorId, generate_cuid};
use marketplace_storefront::db;

/// Connect to `DATABASE_URL` and apply migrations.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset, the database is unreachable, or
/// migrations fail.
#[allow(clippy::expect_used)]
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Fixture builder scoped to one test.
///
/// Business names are prefixed with a unique marker; use [`Fixtures::name`]
/// to build names and [`Fixtures::owns`] to filter query results.
pub struct Fixtures<'a> {
    pool: &'a PgPool,
    marker: String,
}

/// A vendor to insert.
#[derive(Debug, Clone)]
pub struct VendorFixture {
    pub business_name: String,
    pub approved: bool,
    pub owner_active: bool,
    pub commission_rate: Decimal,
}

impl VendorFixture {
    /// An approved vendor with an active owner and a 10% commission.
    #[must_use]
    pub fn approved(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            approved: true,
            owner_active: true,
            commission_rate: Decimal::new(10, 2),
        }
    }
}

/// Identifiers of an inserted vendor.
#[derive(Debug, Clone)]
pub struct InsertedVendor {
    pub id: VendorId,
    pub slug: String,
}

impl<'a> Fixtures<'a> {
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        // Markers are lowercase alphanumerics, so they are valid slug parts
        let marker = generate_cuid();
        Self { pool, marker }
    }

    /// Tag a display name with this test's marker.
    #[must_use]
    pub fn name(&self, base: &str) -> String {
        format!("{base} {}", self.marker)
    }

    /// Whether a business name belongs to this test.
    #[must_use]
    pub fn owns(&self, business_name: &str) -> bool {
        business_name.ends_with(&self.marker)
    }

    /// Insert a vendor and its owner.
    ///
    /// # Panics
    ///
    /// Panics if an insert fails.
    #[allow(clippy::expect_used)]
    pub async fn vendor(&self, fixture: &VendorFixture) -> InsertedVendor {
        let user_id = UserId::generate();
        let vendor_id = VendorId::generate();
        let slug = format!("v-{}", vendor_id.as_str());

        sqlx::query("INSERT INTO marketplace.user (id, email, is_active) VALUES ($1, $2, $3)")
            .bind(&user_id)
            .bind(format!("{}@fixtures.test", user_id.as_str()))
            .bind(fixture.owner_active)
            .execute(self.pool)
            .await
            .expect("Failed to insert user");

        sqlx::query(
            "INSERT INTO marketplace.vendor \
             (id, user_id, business_name, slug, business_address, commission_rate, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&vendor_id)
        .bind(&user_id)
        .bind(&fixture.business_name)
        .bind(&slug)
        .bind("1 Fixture Way")
        .bind(fixture.commission_rate)
        .bind(fixture.approved)
        .execute(self.pool)
        .await
        .expect("Failed to insert vendor");

        InsertedVendor {
            id: vendor_id,
            slug,
        }
    }

    /// Insert a product for `vendor`.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    #[allow(clippy::expect_used)]
    pub async fn product(&self, vendor: &InsertedVendor, active: bool, disabled_by_admin: bool) {
        sqlx::query(
            "INSERT INTO marketplace.product (id, vendor_id, name, is_active, is_disabled_by_admin) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(ProductId::generate())
        .bind(&vendor.id)
        .bind("Fixture product")
        .bind(active)
        .bind(disabled_by_admin)
        .execute(self.pool)
        .await
        .expect("Failed to insert product");
    }
}
