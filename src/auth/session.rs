use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "jwt";

/// Session credential handed back by a handler; the response layer decides
/// how it reaches the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCookie {
    Issue {
        token: String,
        max_age: Duration,
        secure: bool,
    },
    Clear {
        secure: bool,
    },
}

impl SessionCookie {
    /// Signs a fresh session for `user_id` with the configured keys.
    pub fn issue(state: &AppState, user_id: Uuid) -> anyhow::Result<Self> {
        let keys = JwtKeys::from_ref(state);
        let token = keys.sign(user_id)?;
        Ok(SessionCookie::Issue {
            token,
            max_age: keys.ttl,
            secure: state.config.cookie.secure,
        })
    }

    pub fn clear(state: &AppState) -> Self {
        SessionCookie::Clear {
            secure: state.config.cookie.secure,
        }
    }

    pub fn header_value(&self) -> String {
        let (mut value, secure) = match self {
            SessionCookie::Issue {
                token,
                max_age,
                secure,
            } => (
                format!(
                    "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Strict; Max-Age={}",
                    max_age.as_secs()
                ),
                *secure,
            ),
            SessionCookie::Clear { secure } => (
                format!(
                    "{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0; \
                     Expires=Thu, 01 Jan 1970 00:00:00 GMT"
                ),
                *secure,
            ),
        };
        if secure {
            value.push_str("; Secure");
        }
        value
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let value = HeaderValue::from_str(&self.header_value())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid cookie header: {e}")))?;
        res.headers_mut().append(header::SET_COOKIE, value);
        Ok(res)
    }
}

/// Returns the value of cookie `name` from the request's `Cookie` headers.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_cookie_is_http_only_with_max_age() {
        let cookie = SessionCookie::Issue {
            token: "abc.def.ghi".into(),
            max_age: Duration::from_secs(3600),
            secure: false,
        };
        let value = cookie.header_value();
        assert!(value.starts_with("jwt=abc.def.ghi;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=3600"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn cleared_cookie_is_empty_and_expired() {
        let value = SessionCookie::Clear { secure: true }.header_value();
        assert!(value.starts_with("jwt=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(value.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(value.ends_with("; Secure"));
    }

    #[test]
    fn extract_cookie_finds_named_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; jwt=tok123; lang=en"),
        );
        assert_eq!(extract_cookie(&headers, "jwt"), Some("tok123"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn issue_uses_state_cookie_settings() {
        let state = AppState::for_tests();
        let cookie = SessionCookie::issue(&state, Uuid::new_v4()).unwrap();
        match cookie {
            SessionCookie::Issue { secure, max_age, .. } => {
                assert_eq!(secure, state.config.cookie.secure);
                assert_eq!(
                    max_age.as_secs(),
                    (state.config.jwt.ttl_minutes as u64) * 60
                );
            }
            other => panic!("expected issued cookie, got {other:?}"),
        }
    }
}
