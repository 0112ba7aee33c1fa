//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, nosniff, no-store)
//! 5. Rate limiting (governor), per route group, answering in the JSON envelope
//!
//! Session credentials are not middleware state; handlers take them as the
//! [`SessionTokens`] extractor.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::SessionTokens;
pub use rate_limit::{ClientIpKeyExtractor, api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{clear_session_cookies, removal_cookie};
