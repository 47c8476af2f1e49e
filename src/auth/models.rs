//! Authentication models

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::jwt::TokenError;

/// Account kinds that can hold a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books sessions with tutors
    Student,
    /// Listed in the marketplace, teaches sessions
    Tutor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Tutor => write!(f, "tutor"),
        }
    }
}

/// Who a valid token speaks for.
///
/// Once the gate admits a request this is stored in the request extensions,
/// so handlers can take it as an extractor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account email
    pub subject: String,
    pub role: Role,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    pub fn is_tutor(&self) -> bool {
        self.role == Role::Tutor
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Why a request did not authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Neither a bearer header nor a `jwt` cookie was present
    NoCredential,
    /// A candidate token was found but did not verify
    Invalid(TokenError),
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::NoCredential => write!(f, "no credential"),
            AuthFailure::Invalid(e) => write!(f, "{}", e),
        }
    }
}

/// Outcome of authenticating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub authenticated: bool,
    pub identity: Option<Identity>,
    pub error: Option<AuthFailure>,
}

impl AuthResult {
    pub fn success(identity: Identity) -> Self {
        Self {
            authenticated: true,
            identity: Some(identity),
            error: None,
        }
    }

    pub fn failure(reason: AuthFailure) -> Self {
        Self {
            authenticated: false,
            identity: None,
            error: Some(reason),
        }
    }

    /// Consume the result, keeping the identity only when authenticated
    pub fn into_identity(self) -> Option<Identity> {
        if self.authenticated {
            self.identity
        } else {
            None
        }
    }
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body. The token is also set as the `jwt` cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_type: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Student.to_string(), "student");
        assert_eq!(Role::Tutor.to_string(), "tutor");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Tutor).unwrap();
        assert_eq!(json, "\"tutor\"");
    }

    #[test]
    fn test_failed_result_has_no_identity() {
        let result = AuthResult::failure(AuthFailure::NoCredential);
        assert!(!result.authenticated);
        assert!(result.into_identity().is_none());
    }
}
