//! Basic-vs-token header selection and token capture.
//!
//! The server issues a `Token` response header on a successfully
//! authenticated call; its value, base64-encoded, stands in for the
//! user:pass pair on subsequent calls for one hour.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{TimeDelta, Utc};
use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderMap};

use super::constants::{TOKEN_HEADER, TOKEN_TTL_SECS};
use crate::core::session::CachedToken;

/// The credential material attached to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeader {
    /// Standard HTTP Basic credentials.
    Basic {
        /// Account username.
        username: String,
        /// Account password.
        password: String,
    },
    /// A cached session token. Sent as `Authorization: Basic <token>`: the
    /// value is itself base64 credential material the server accepts in
    /// place of user:pass.
    Token(String),
}

impl AuthHeader {
    pub(crate) fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => req.basic_auth(username, Some(password)),
            Self::Token(value) => req.header(AUTHORIZATION, format!("Basic {value}")),
        }
    }
}

impl super::VebraClient {
    /// Select the header for the next request.
    ///
    /// Basic credentials when `force_basic` is set or no valid token is
    /// cached; the token otherwise. An expired token is treated as absent.
    pub(crate) fn auth_header(&self, force_basic: bool) -> AuthHeader {
        if !force_basic
            && let Some(token) = self.session().load()
            && token.is_valid_at(Utc::now())
        {
            return AuthHeader::Token(token.value);
        }
        let (username, password) = self.credentials();
        AuthHeader::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Capture a freshly issued token from response headers, replacing any
    /// cached one. Absent, empty, or non-ASCII `Token` values are ignored.
    pub(crate) fn capture_token(&self, headers: &HeaderMap) {
        let Some(raw) = headers.get(TOKEN_HEADER) else {
            return;
        };
        let Ok(raw) = raw.to_str() else {
            return;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        self.session().store(CachedToken {
            value: BASE64.encode(trimmed),
            expires_at: Utc::now() + TimeDelta::seconds(TOKEN_TTL_SECS),
        });
    }

    /// Drop the cached token. Used when the server rejects it with 401.
    pub(crate) fn invalidate_token(&self) {
        self.session().clear();
    }

    /// Whether a non-expired token is currently cached.
    pub fn has_valid_token(&self) -> bool {
        self.session()
            .load()
            .is_some_and(|t| t.is_valid_at(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VebraClient;
    use reqwest::header::HeaderValue;

    fn client() -> VebraClient {
        VebraClient::new("user", "pass", "Feed").unwrap()
    }

    fn headers_with_token(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn no_token_means_basic() {
        let c = client();
        assert_eq!(
            c.auth_header(false),
            AuthHeader::Basic {
                username: "user".into(),
                password: "pass".into(),
            }
        );
    }

    #[test]
    fn captured_token_is_trimmed_and_base64_encoded() {
        let c = client();
        c.capture_token(&headers_with_token("  tok-123  "));
        assert_eq!(
            c.auth_header(false),
            AuthHeader::Token(BASE64.encode("tok-123"))
        );
    }

    #[test]
    fn force_basic_bypasses_a_valid_token() {
        let c = client();
        c.capture_token(&headers_with_token("tok"));
        assert!(c.has_valid_token());
        assert!(matches!(c.auth_header(true), AuthHeader::Basic { .. }));
    }

    #[test]
    fn expired_token_is_treated_as_absent() {
        let c = client();
        c.session().store(CachedToken {
            value: "stale".into(),
            expires_at: Utc::now() - TimeDelta::seconds(1),
        });
        assert!(!c.has_valid_token());
        assert!(matches!(c.auth_header(false), AuthHeader::Basic { .. }));
    }

    #[test]
    fn empty_token_header_is_ignored() {
        let c = client();
        c.capture_token(&headers_with_token("   "));
        assert!(!c.has_valid_token());
    }

    #[test]
    fn invalidate_clears_the_cache() {
        let c = client();
        c.capture_token(&headers_with_token("tok"));
        c.invalidate_token();
        assert!(!c.has_valid_token());
    }
}
