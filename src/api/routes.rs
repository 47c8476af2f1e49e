//! API route handlers

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::server::SharedState;
use crate::auth::cookie::{logout_cookie, session_cookie};
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::auth::{Identity, Role};
use crate::directory::{RegisterStudent, RegisterTutor, Student, Tutor, UserDirectory};
use crate::error::Result;

// Response types

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Session summary returned by `/api/auth/status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
    pub email: String,
    pub role: Role,
    pub user_id: Option<u64>,
    pub name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Profile of the calling account
#[derive(Debug, Serialize)]
#[serde(tag = "user_type", rename_all = "lowercase")]
pub enum Profile {
    Student(Student),
    Tutor(Tutor),
}

impl Profile {
    pub fn id(&self) -> u64 {
        match self {
            Profile::Student(s) => s.id,
            Profile::Tutor(t) => t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Student(s) => &s.name,
            Profile::Tutor(t) => &t.name,
        }
    }
}

async fn load_profile(directory: &UserDirectory, identity: &Identity) -> Option<Profile> {
    match identity.role {
        Role::Student => directory
            .students
            .find_by_subject(&identity.subject)
            .await
            .map(Profile::Student),
        Role::Tutor => directory
            .tutors
            .find_by_subject(&identity.subject)
            .await
            .map(Profile::Tutor),
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiResponse::err(message))).into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiResponse::err(message))).into_response()
}

fn forbidden(message: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(ApiResponse::err(message))).into_response()
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response> {
    let email = req.email.trim();
    let Some(role) = state.directory.check_credentials(email, &req.password).await? else {
        tracing::info!("Failed login for {}", email);
        return Ok(unauthorized("Invalid email or password"));
    };

    let token = state.codec().issue(email, role)?;
    let cookie = session_cookie(&token, state.config.auth.cookie_secure)?;
    tracing::info!("Login for {} as {}", email, role);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(LoginResponse {
            token,
            user_type: role,
        })),
    )
        .into_response())
}

pub async fn logout(State(state): State<SharedState>) -> Result<Response> {
    let cookie = logout_cookie(state.config.auth.cookie_secure)?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok("Logged out successfully")),
    )
        .into_response())
}

pub async fn register_student(
    State(state): State<SharedState>,
    Json(req): Json<RegisterStudent>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>)> {
    let student = state
        .directory
        .register_student(req, state.config.auth.bcrypt_cost)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(student))))
}

pub async fn register_tutor(
    State(state): State<SharedState>,
    Json(req): Json<RegisterTutor>,
) -> Result<(StatusCode, Json<ApiResponse<Tutor>>)> {
    let tutor = state
        .directory
        .register_tutor(req, state.config.auth.bcrypt_cost)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tutor))))
}

/// Reports the session carried by the request. Lives under the exempt
/// prefix, so it authenticates on its own.
pub async fn status(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Ok(claims) = state.authenticator.claims(&headers) else {
        return unauthorized("Not authenticated");
    };
    let identity = claims.identity();
    let profile = load_profile(&state.directory, &identity).await;

    Json(ApiResponse::ok(StatusResponse {
        authenticated: true,
        email: identity.subject,
        role: identity.role,
        user_id: profile.as_ref().map(Profile::id),
        name: profile.as_ref().map(|p| p.name().to_string()),
        expires_at: claims.expires_at(),
    }))
    .into_response()
}

pub async fn current_user(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(identity) = state.authenticator.authenticate(&headers).into_identity() else {
        return unauthorized("Invalid or missing token");
    };

    match load_profile(&state.directory, &identity).await {
        Some(profile) => Json(ApiResponse::ok(profile)).into_response(),
        None => not_found("Account not found"),
    }
}

// Tutor routes

pub async fn list_tutors(State(state): State<SharedState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.directory.tutors.list().await))
}

pub async fn get_tutor(State(state): State<SharedState>, Path(id): Path<u64>) -> Response {
    match state.directory.tutors.find_by_id(id).await {
        Some(tutor) => Json(ApiResponse::ok(tutor)).into_response(),
        None => not_found(&format!("Tutor {} not found", id)),
    }
}

pub async fn my_tutor_profile(State(state): State<SharedState>, identity: Identity) -> Response {
    if !identity.is_tutor() {
        return forbidden("Only tutors have a tutor profile");
    }
    match state.directory.tutors.find_by_subject(&identity.subject).await {
        Some(tutor) => Json(ApiResponse::ok(tutor)).into_response(),
        None => not_found("Account not found"),
    }
}

// Student routes

pub async fn my_student_profile(State(state): State<SharedState>, identity: Identity) -> Response {
    if !identity.is_student() {
        return forbidden("Only students have a student profile");
    }
    match state.directory.students.find_by_subject(&identity.subject).await {
        Some(student) => Json(ApiResponse::ok(student)).into_response(),
        None => not_found("Account not found"),
    }
}
