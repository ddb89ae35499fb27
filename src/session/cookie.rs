//! Session cookie encoding.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

use crate::session::SessionId;

pub const SESSION_COOKIE: &str = "onramp_session";

/// Extract the session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value.trim()))
}

/// `Set-Cookie` value for a new session.
pub fn session_cookie(id: &SessionId, max_age_secs: u64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    // UUIDs and the fixed attributes are always valid header bytes.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_among_other_cookies() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; x=1", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_missing_or_invalid() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("onramp_session=not-a-uuid"));
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let id = SessionId::new();
        let value = session_cookie(&id, 3600, true);
        let text = value.to_str().unwrap();
        assert!(text.starts_with(&format!("onramp_session={}", id)));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("Max-Age=3600"));
        assert!(text.ends_with("; Secure"));

        let insecure = session_cookie(&id, 60, false);
        assert!(!insecure.to_str().unwrap().contains("Secure"));
    }
}
