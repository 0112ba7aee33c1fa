//! Session credential cookie names.

/// A bearer credential the client holds as an HTTP cookie.
///
/// Tokens are issued by the login flow and destroyed by logout, which asks
/// the client to delete every variant listed in [`SessionCookie::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCookie {
    /// Short-lived access token.
    AccessToken,
    /// Long-lived refresh token.
    RefreshToken,
}

impl SessionCookie {
    /// Every session cookie, in the order they are cleared.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// The cookie name on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }

    /// Look up a session cookie by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cookie| cookie.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(SessionCookie::AccessToken.name(), "accessToken");
        assert_eq!(SessionCookie::RefreshToken.name(), "refreshToken");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            SessionCookie::from_name("refreshToken"),
            Some(SessionCookie::RefreshToken)
        );
        assert_eq!(SessionCookie::from_name("np_session"), None);
        assert_eq!(SessionCookie::from_name("AccessToken"), None);
    }
}
