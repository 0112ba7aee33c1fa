//! Session credential extractor.
//!
//! Reads the `accessToken` and `refreshToken` cookies into an explicit
//! per-request value. Handlers receive the credentials as an argument instead
//! of reaching into shared state.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use cookie::Cookie;
use secrecy::SecretString;

use marketplace_core::SessionCookie;

/// Session credentials presented with the current request.
///
/// Either token may be absent; logout succeeds without them.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(tokens: SessionTokens) -> impl IntoResponse {
///     if tokens.is_authenticated() { ... }
/// }
/// ```
#[derive(Debug, Default)]
pub struct SessionTokens {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl SessionTokens {
    /// Whether the client presented any session credential.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }

    /// Collect session cookies from every `Cookie` header in `parts`.
    ///
    /// Unparseable pairs are skipped. When a cookie repeats, the first
    /// non-empty value wins.
    fn from_parts(parts: &Parts) -> Self {
        let mut tokens = Self::default();

        let pairs = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok);

        for cookie in pairs {
            if cookie.value().is_empty() {
                continue;
            }
            let slot = match SessionCookie::from_name(cookie.name()) {
                Some(SessionCookie::AccessToken) => &mut tokens.access_token,
                Some(SessionCookie::RefreshToken) => &mut tokens.refresh_token,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(SecretString::from(cookie.value().to_string()));
            }
        }

        tokens
    }
}

impl<S> FromRequestParts<S> for SessionTokens
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use secrecy::ExposeSecret;

    use super::*;

    fn tokens_for(cookies: &[&str]) -> SessionTokens {
        let mut builder = Request::builder().uri("/api/auth/logout");
        for value in cookies {
            builder = builder.header(COOKIE, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        SessionTokens::from_parts(&parts)
    }

    #[test]
    fn test_no_cookies() {
        let tokens = tokens_for(&[]);
        assert!(tokens.access_token.is_none());
        assert!(tokens.refresh_token.is_none());
        assert!(!tokens.is_authenticated());
    }

    #[test]
    fn test_reads_both_tokens() {
        let tokens = tokens_for(&["theme=dark; accessToken=abc; refreshToken=def"]);
        assert_eq!(tokens.access_token.unwrap().expose_secret(), "abc");
        assert_eq!(tokens.refresh_token.unwrap().expose_secret(), "def");
    }

    #[test]
    fn test_reads_across_headers() {
        let tokens = tokens_for(&["accessToken=abc", "refreshToken=def"]);
        assert!(tokens.access_token.is_some());
        assert!(tokens.refresh_token.is_some());
    }

    #[test]
    fn test_ignores_empty_and_unrelated_cookies() {
        let tokens = tokens_for(&["accessToken=; AccessToken=x; np_session=y"]);
        assert!(!tokens.is_authenticated());
    }

    #[test]
    fn test_first_value_wins() {
        let tokens = tokens_for(&["refreshToken=one; refreshToken=two"]);
        assert_eq!(tokens.refresh_token.unwrap().expose_secret(), "one");
    }
}
