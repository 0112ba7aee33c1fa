//! Domain models for the storefront.
//!
//! Read projections returned by the API. Request payloads live next to their
//! validators in [`crate::validation`].

pub mod vendor;

pub use vendor::VendorSummary;
