//! `Set-Cookie` values for login and logout

use axum::http::HeaderValue;

use crate::auth::extractor::SESSION_COOKIE;
use crate::auth::jwt::TOKEN_VALIDITY_SECS;
use crate::error::{Error, Result};

/// Cookie that carries a freshly issued token for 24 hours
pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue> {
    build(token, TOKEN_VALIDITY_SECS, secure)
}

/// Cookie that overwrites the session cookie with an empty, expired value
pub fn logout_cookie(secure: bool) -> Result<HeaderValue> {
    build("", 0, secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| Error::Other(format!("Invalid cookie value: {}", e)))
}
