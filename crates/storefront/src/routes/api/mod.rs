//! JSON API handlers.

pub mod auth;
pub mod cart;
pub mod vendors;
