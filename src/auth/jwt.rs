//! JWT token handling

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::models::{Identity, Role};

/// How long an issued token stays valid (24 hours)
pub const TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// Reasons a token fails verification.
///
/// `Malformed`, `BadSignature` and `Expired` are the invalid-token kinds; they
/// are kept apart for logging only and all end in the same 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token processing failed: {0}")]
    Internal(String),
}

impl TokenError {
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed | TokenError::BadSignature | TokenError::Expired
        )
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidKeyFormat => TokenError::Internal(err.to_string()),
            _ => TokenError::Malformed,
        }
    }
}

/// Reject anything that is not `header.payload.signature` with base64url
/// segments and JSON object header and payload. jsonwebtoken verifies the
/// signature before decoding the payload.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments[..] else {
        return Err(TokenError::Malformed);
    };

    for segment in [header, payload] {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| TokenError::Malformed)?;
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(serde_json::Value::Object(_)) => {}
            _ => return Err(TokenError::Malformed),
        }
    }

    match URL_SAFE_NO_PAD.decode(signature) {
        Ok(bytes) if !bytes.is_empty() => Ok(()),
        _ => Err(TokenError::Malformed),
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,
    /// Account role
    pub role: Role,
    /// Issued at
    pub iat: i64,
    /// Expiration time (issued at + 24 hours)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// Build claims for an identity issued at `now`
    pub fn new(subject: &str, role: Role, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            sub: subject.to_string(),
            role,
            iat,
            exp: iat + TOKEN_VALIDITY_SECS,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Check if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.role)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies session tokens.
///
/// The signing key lives for the lifetime of the codec. Cloning shares the
/// same key, so one codec built at startup serves every request task. A new
/// process generates a new key, which invalidates all earlier tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<Keys>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Create a codec with a fresh random 256-bit HMAC key
    pub fn generate() -> Self {
        let secret: [u8; 32] = rand::random();
        Self::from_secret(&secret)
    }

    /// Create a codec from an explicit secret
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at`, without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            validation: Arc::new(validation),
        }
    }

    /// Issue a token for `subject` valid for the next 24 hours
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Decode a token and check its signature and expiry
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.claims_at(token, Utc::now())
    }

    pub fn claims_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        check_structure(token)?;
        let claims = decode::<Claims>(token, &self.keys.decoding, &self.validation)?.claims;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Verify a token and return the identity it carries
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.claims_at(token, now).map(|claims| claims.identity())
    }

    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|identity| identity.subject)
    }

    pub fn role(&self, token: &str) -> Result<Role, TokenError> {
        self.verify(token).map(|identity| identity.role)
    }

    /// Token lifetime as a chrono duration
    pub fn validity() -> Duration {
        Duration::seconds(TOKEN_VALIDITY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_token() {
        let codec = TokenCodec::generate();
        let token = codec.issue("ana@example.com", Role::Tutor).expect("Failed to issue token");
        let identity = codec.verify(&token).expect("Failed to verify token");

        assert_eq!(identity.subject, "ana@example.com");
        assert_eq!(identity.role, Role::Tutor);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = TokenCodec::generate();
        let issued = Utc::now();
        let token = codec.issue_at("ben@example.com", Role::Student, issued).unwrap();

        let just_before = issued + TokenCodec::validity() - Duration::seconds(1);
        assert!(codec.verify_at(&token, just_before).is_ok());

        let at_bound = issued + TokenCodec::validity();
        assert_eq!(codec.verify_at(&token, at_bound), Err(TokenError::Expired));
    }

    #[test]
    fn test_other_key_is_bad_signature() {
        let ours = TokenCodec::from_secret(b"first-secret-first-secret-first!");
        let theirs = TokenCodec::from_secret(b"other-secret-other-secret-other!");
        let token = theirs.issue("eve@example.com", Role::Tutor).unwrap();

        assert_eq!(ours.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::generate();
        assert_eq!(codec.verify("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_junk_payload_with_valid_header_is_malformed() {
        let codec = TokenCodec::generate();
        let token = codec.issue("ana@example.com", Role::Student).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        for forged in [
            format!("{}.%%%.{}", parts[0], parts[2]),
            format!("{}.not-json-payload.{}", parts[0], parts[2]),
            format!("{}..{}", parts[0], parts[2]),
            format!("{}.{}.", parts[0], parts[1]),
            format!("{}.{}.{}.{}", parts[0], parts[1], parts[2], parts[2]),
        ] {
            assert_eq!(codec.verify(&forged), Err(TokenError::Malformed), "{}", forged);
        }

        // Structurally sound, wrong signature
        let resigned = format!("{}.{}.c2ln", parts[0], parts[1]);
        assert_eq!(codec.verify(&resigned), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_claims_carry_lifetime() {
        let codec = TokenCodec::generate();
        let token = codec.issue("ana@example.com", Role::Student).unwrap();
        let claims = codec.claims(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, TOKEN_VALIDITY_SECS);
        assert!(!claims.is_expired());
        assert!(claims.expires_at().is_some());
    }
}
