//! Request gate: authentication middleware in front of the API

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::authenticator::Authenticator;
use crate::auth::jwt::TokenError;
use crate::auth::models::{AuthFailure, Identity};

/// What the gate decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Continue downstream. Exempt paths carry no identity.
    Admitted(Option<Identity>),
    /// Stop with 401
    Rejected(AuthFailure),
}

/// Admits requests with a valid token and lets exempt path prefixes through
#[derive(Clone)]
pub struct RequestGate {
    authenticator: Authenticator,
    exempt_prefixes: Arc<Vec<String>>,
}

impl RequestGate {
    pub fn new<I, S>(authenticator: Authenticator, exempt_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exempt_prefixes = exempt_prefixes
            .into_iter()
            .map(|p| p.into().trim_end_matches('/').to_string())
            .collect();
        Self {
            authenticator,
            exempt_prefixes: Arc::new(exempt_prefixes),
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// A path is exempt when it equals a configured prefix or continues
    /// below it with `/`.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn evaluate(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        if self.is_exempt(path) {
            return GateDecision::Admitted(None);
        }

        let result = self.authenticator.authenticate(headers);
        match (result.authenticated, result.identity, result.error) {
            (true, Some(identity), _) => GateDecision::Admitted(Some(identity)),
            (_, _, Some(reason)) => GateDecision::Rejected(reason),
            _ => GateDecision::Rejected(AuthFailure::NoCredential),
        }
    }

    /// `evaluate`, with a panic anywhere below it turned into a rejection
    pub fn evaluate_fail_closed(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        fail_closed(path, || self.evaluate(path, headers))
    }
}

/// Run a gate evaluation, rejecting with an internal failure if it panics
pub fn fail_closed<F>(path: &str, evaluate: F) -> GateDecision
where
    F: FnOnce() -> GateDecision,
{
    catch_unwind(AssertUnwindSafe(evaluate)).unwrap_or_else(|_| {
        tracing::warn!("Authentication panicked for {}", path);
        GateDecision::Rejected(AuthFailure::Invalid(TokenError::Internal(
            "authentication panicked".to_string(),
        )))
    })
}

/// Middleware for requiring authentication outside the exempt prefixes
pub async fn require_auth(State(gate): State<RequestGate>, req: Request, next: Next) -> Response {
    let decision = gate.evaluate_fail_closed(req.uri().path(), req.headers());
    apply_decision(decision, req, next).await
}

/// Forward an admitted request, answer a rejected one with an empty 401
async fn apply_decision(decision: GateDecision, mut req: Request, next: Next) -> Response {
    match decision {
        GateDecision::Admitted(Some(identity)) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GateDecision::Admitted(None) => next.run(req).await,
        GateDecision::Rejected(reason) => {
            tracing::debug!("Rejected {} {}: {}", req.method(), req.uri().path(), reason);
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}
