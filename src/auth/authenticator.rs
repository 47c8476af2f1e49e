//! Turning request headers into an authenticated identity

use axum::http::HeaderMap;

use crate::auth::extractor::extract_token;
use crate::auth::jwt::{Claims, TokenCodec};
use crate::auth::models::{AuthFailure, AuthResult};

/// Combines credential extraction with token verification
#[derive(Clone)]
pub struct Authenticator {
    codec: TokenCodec,
}

impl Authenticator {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Verified claims of the request's token
    pub fn claims(&self, headers: &HeaderMap) -> Result<Claims, AuthFailure> {
        let token = extract_token(headers).ok_or(AuthFailure::NoCredential)?;

        self.codec.claims(&token).map_err(|e| {
            if e.is_invalid_token() {
                tracing::debug!("Rejected token: {}", e);
            } else {
                tracing::warn!("Token verification failed: {}", e);
            }
            AuthFailure::Invalid(e)
        })
    }

    /// Authenticate a request from its headers. Never fails; every problem
    /// becomes an unauthenticated result.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult {
        match self.claims(headers) {
            Ok(claims) => AuthResult::success(claims.identity()),
            Err(reason) => AuthResult::failure(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenError;
    use crate::auth::models::Role;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_no_credential() {
        let auth = Authenticator::new(TokenCodec::generate());
        let result = auth.authenticate(&HeaderMap::new());
        assert!(!result.authenticated);
        assert_eq!(result.error, Some(AuthFailure::NoCredential));
    }

    #[test]
    fn test_valid_cookie_token() {
        let auth = Authenticator::new(TokenCodec::generate());
        let token = auth.codec().issue("ana@example.com", Role::Student).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("jwt={}", token)).unwrap(),
        );

        let result = auth.authenticate(&headers);
        assert!(result.authenticated);
        let identity = result.identity.unwrap();
        assert_eq!(identity.subject, "ana@example.com");
        assert_eq!(identity.role, Role::Student);
    }

    #[test]
    fn test_invalid_token_reports_kind() {
        let auth = Authenticator::new(TokenCodec::generate());
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));

        let result = auth.authenticate(&headers);
        assert!(!result.authenticated);
        assert_eq!(
            result.error,
            Some(AuthFailure::Invalid(TokenError::Malformed))
        );
    }
}
