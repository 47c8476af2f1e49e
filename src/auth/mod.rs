//! Authentication: session tokens, credential extraction and the request gate

pub mod authenticator;
pub mod cookie;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use authenticator::Authenticator;
pub use extractor::{extract_token, SESSION_COOKIE};
pub use jwt::{Claims, TokenCodec, TokenError, TOKEN_VALIDITY_SECS};
pub use middleware::{require_auth, GateDecision, RequestGate};
pub use models::{AuthFailure, AuthResult, Identity, Role};
