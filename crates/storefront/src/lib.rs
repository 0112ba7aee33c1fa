//! Marketplace storefront API library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod models;
pub mod nav;
pub mod routes;
pub mod state;
pub mod validation;
