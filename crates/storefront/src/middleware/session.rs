//! Session cookie removal.
//!
//! Logout asks the browser to delete each session credential by sending a
//! replacement cookie with an empty value and an expiry in the past. The
//! replacement must repeat the `Domain` and `Path` of the original.

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE, header::InvalidHeaderValue};
use cookie::{Cookie, SameSite, time::Duration};

use marketplace_core::SessionCookie;

use crate::config::CookieConfig;

/// Build the removal cookie for one session credential.
#[must_use]
pub fn removal_cookie(kind: SessionCookie, config: &CookieConfig) -> Cookie<'static> {
    let mut builder = Cookie::build((kind.name(), ""))
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax);

    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }

    let mut cookie = builder.build();
    cookie.make_removal();
    // make_removal already zeroes Max-Age; keep it explicit on the wire.
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// `Set-Cookie` headers clearing every session credential.
///
/// # Errors
///
/// Returns an error if the configured cookie attributes cannot be encoded
/// as a header value.
pub fn clear_session_cookies(config: &CookieConfig) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    for kind in SessionCookie::ALL {
        let value = HeaderValue::from_str(&removal_cookie(kind, config).to_string())?;
        headers.append(SET_COOKIE, value);
    }
    Ok(headers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn set_cookies(config: &CookieConfig) -> Vec<String> {
        clear_session_cookies(config)
            .unwrap()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_clears_both_tokens() {
        let cookies = set_cookies(&CookieConfig::default());
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("accessToken=;"));
        assert!(cookies[1].starts_with("refreshToken=;"));
    }

    #[test]
    fn test_removal_attributes() {
        let cookie = removal_cookie(SessionCookie::AccessToken, &CookieConfig::default());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert!(cookie.domain().is_none());
        assert!(cookie.secure() != Some(true));

        let header = cookie.to_string();
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Expires="));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_repeats_configured_domain_and_path() {
        let config = CookieConfig {
            domain: Some("shop.example.com".to_string()),
            path: "/app".to_string(),
            secure: true,
        };

        for header in set_cookies(&config) {
            assert!(header.contains("Domain=shop.example.com"));
            assert!(header.contains("Path=/app"));
            assert!(header.contains("Secure"));
        }
    }

    #[test]
    fn test_unencodable_domain_is_an_error() {
        let config = CookieConfig {
            domain: Some("bad\ndomain".to_string()),
            ..CookieConfig::default()
        };
        assert!(clear_session_cookies(&config).is_err());
    }
}
