//! Core types for the marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod commission;
pub mod id;
pub mod session;
pub mod slug;

pub use commission::{CommissionRate, CommissionRateError};
pub use id::*;
pub use session::SessionCookie;
pub use slug::{Slug, SlugError};
