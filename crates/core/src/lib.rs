//! Marketplace Core - Shared domain types.
//!
//! This crate provides the types used across all marketplace components:
//! - `storefront` - Public JSON API (vendors, cart validation, logout)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for CUID identifiers, slugs, commission rates,
//!   and session cookie names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
