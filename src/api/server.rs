//! HTTP API server

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, Authenticator, RequestGate, TokenCodec};
use crate::config::Config;
use crate::directory::UserDirectory;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub directory: UserDirectory,
    pub authenticator: Authenticator,
}

impl AppState {
    /// State with empty directories and a freshly generated signing key
    pub fn new(config: Config) -> Self {
        Self::with_parts(config, UserDirectory::new(), TokenCodec::generate())
    }

    pub fn with_parts(config: Config, directory: UserDirectory, codec: TokenCodec) -> Self {
        Self {
            config,
            directory,
            authenticator: Authenticator::new(codec),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        self.authenticator.codec()
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(config));

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let gate = RequestGate::new(
        state.authenticator.clone(),
        state.config.auth.exempt_prefixes.iter().cloned(),
    );
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/auth/register/student", post(routes::register_student))
        .route("/api/auth/register/tutor", post(routes::register_tutor))
        .route("/api/auth/status", get(routes::status))
        .route("/api/auth/current-user", get(routes::current_user))
        // Tutor routes
        .route("/api/tutors", get(routes::list_tutors))
        .route("/api/tutors/me", get(routes::my_tutor_profile))
        .route("/api/tutors/{id}", get(routes::get_tutor))
        // Student routes
        .route("/api/students/me", get(routes::my_student_profile))
        // Middleware
        .layer(middleware::from_fn_with_state(gate, require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
