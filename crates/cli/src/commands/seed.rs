//! Seed the database with vendor fixtures.
//!
//! Reads vendors (with their owning accounts and products) from a YAML file,
//! validates the whole file, and only then connects and inserts everything in
//! a single transaction. A failure leaves the database untouched.
//!
//! # File Format
//!
//! ```yaml
//! vendors:
//!   - owner_email: owner@acme.test
//!     business_name: Acme Goods
//!     slug: acme-goods
//!     business_address: 1 Main St, Springfield
//!     commission_rate: "0.15"
//!     approved: true          # default: true
//!     owner_active: true      # default: true
//!     products:
//!       - name: Loose Leaf Tea
//!       - name: Teapot
//!         active: false       # default: true
//!       - name: Mug
//!         disabled_by_admin: true  # default: false
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

use marketplace_core::{CommissionRate, ProductId, Slug, UserId, VendorId};
use marketplace_storefront::db;

/// Top-level seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSeedFile {
    pub vendors: Vec<VendorSeed>,
}

/// One vendor and its owning account.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSeed {
    pub owner_email: String,
    #[serde(default = "default_true")]
    pub owner_active: bool,
    pub business_name: String,
    pub slug: Slug,
    pub business_address: String,
    pub commission_rate: CommissionRate,
    #[serde(default = "default_true")]
    pub approved: bool,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One product listed by a seeded vendor.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub disabled_by_admin: bool,
}

const fn default_true() -> bool {
    true
}

/// Counts of inserted rows.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub vendors: usize,
    pub products: usize,
}

/// Check constraints serde cannot express.
///
/// Returns every problem found, empty when the file is valid.
#[must_use]
pub fn validate_file(file: &VendorSeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut slugs = HashSet::new();
    let mut emails = HashSet::new();

    if file.vendors.is_empty() {
        errors.push("vendors: must contain at least one vendor".to_string());
    }

    for (i, vendor) in file.vendors.iter().enumerate() {
        let at = format!("vendors[{i}]");

        if vendor.business_name.trim().is_empty() {
            errors.push(format!("{at}.business_name: must not be blank"));
        }
        if vendor.business_address.trim().is_empty() {
            errors.push(format!("{at}.business_address: must not be blank"));
        }
        if !is_plausible_email(&vendor.owner_email) {
            errors.push(format!(
                "{at}.owner_email: '{}' is not an email address",
                vendor.owner_email
            ));
        }
        if !emails.insert(vendor.owner_email.to_lowercase()) {
            errors.push(format!(
                "{at}.owner_email: '{}' owns more than one vendor",
                vendor.owner_email
            ));
        }
        if !slugs.insert(vendor.slug.as_str()) {
            errors.push(format!("{at}.slug: '{}' is used twice", vendor.slug));
        }

        for (j, product) in vendor.products.iter().enumerate() {
            if product.name.trim().is_empty() {
                errors.push(format!("{at}.products[{j}].name: must not be blank"));
            }
        }
    }

    errors
}

fn is_plausible_email(email: &str) -> bool {
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
    })
}

/// Seed vendors from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `dry_run` - Validate only; do not connect to the database
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, the database
/// URL is missing, or any insert fails. Inserts are rolled back on failure.
pub async fn vendors(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading vendor fixtures from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let file: VendorSeedFile = serde_yaml::from_str(&content)?;

    info!(vendors = file.vendors.len(), "Parsed fixtures");

    let errors = validate_file(&file);
    if !errors.is_empty() {
        error!("Fixture validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!("Fixtures validated successfully");

    if dry_run {
        info!("Dry run, not touching the database");
        return Ok(());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;
    let summary = insert_all(&mut tx, &file).await?;
    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Users inserted: {}", summary.users);
    info!("  Vendors inserted: {}", summary.vendors);
    info!("  Products inserted: {}", summary.products);

    Ok(())
}

async fn insert_all(
    tx: &mut Transaction<'_, Postgres>,
    file: &VendorSeedFile,
) -> Result<SeedSummary, sqlx::Error> {
    let mut summary = SeedSummary::default();

    for vendor in &file.vendors {
        let user_id = UserId::generate();
        sqlx::query("INSERT INTO marketplace.user (id, email, is_active) VALUES ($1, $2, $3)")
            .bind(&user_id)
            .bind(&vendor.owner_email)
            .bind(vendor.owner_active)
            .execute(&mut **tx)
            .await?;
        summary.users += 1;

        let vendor_id = VendorId::generate();
        sqlx::query(
            "INSERT INTO marketplace.vendor \
             (id, user_id, business_name, slug, business_address, commission_rate, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&vendor_id)
        .bind(&user_id)
        .bind(&vendor.business_name)
        .bind(&vendor.slug)
        .bind(&vendor.business_address)
        .bind(vendor.commission_rate.as_decimal())
        .bind(vendor.approved)
        .execute(&mut **tx)
        .await?;
        summary.vendors += 1;

        for product in &vendor.products {
            sqlx::query(
                "INSERT INTO marketplace.product \
                 (id, vendor_id, name, is_active, is_disabled_by_admin) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(ProductId::generate())
            .bind(&vendor_id)
            .bind(&product.name)
            .bind(product.active)
            .bind(product.disabled_by_admin)
            .execute(&mut **tx)
            .await?;
            summary.products += 1;
        }

        info!(slug = %vendor.slug, products = vendor.products.len(), "Seeded vendor");
    }

    Ok(summary)
}
