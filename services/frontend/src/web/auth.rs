//! services/frontend/src/web/auth.rs
//!
//! Authentication endpoints for sign-up, sign-in, sign-out and the session view.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use booking_auth_core::domain::{AuthResult, Profile, SignInData, SignUpData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            uid: profile.uid,
            email: profile.email,
            name: profile.name,
            photo_url: profile.photo_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResultResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ProfileResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AuthResult> for AuthResultResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            success: result.success,
            user: result.user.map(ProfileResponse::from),
            error: result.error,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub is_authenticated: bool,
    pub user: Option<ProfileResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/sign-up - Create a new account and its profile
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResultResponse),
        (status = 400, description = "The provider or profile store rejected the sign-up", body = AuthResultResponse)
    )
)]
pub async fn sign_up_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> impl IntoResponse {
    let data = SignUpData {
        email: req.email,
        password: req.password,
        name: req.name,
    };
    let result = state.session.sign_up(&data).await;
    let status = if result.success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(AuthResultResponse::from(result)))
}

/// POST /auth/sign-in - Sign in with an existing account
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResultResponse),
        (status = 401, description = "Invalid credentials", body = AuthResultResponse)
    )
)]
pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> impl IntoResponse {
    let data = SignInData {
        email: req.email,
        password: req.password,
    };
    let result = state.session.sign_in(&data).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(AuthResultResponse::from(result)))
}

/// GET /auth/sign-in - Where protected routes send unauthenticated visitors
#[utoipa::path(
    get,
    path = "/auth/sign-in",
    responses(
        (status = 200, description = "Sign-in required", body = MessageResponse)
    )
)]
pub async fn sign_in_page_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Sign in to continue".to_string(),
    })
}

/// POST /auth/sign-out - Sign out the current identity
#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 204, description = "Signed out"),
        (status = 500, description = "The provider failed to sign out")
    )
)]
pub async fn sign_out_handler(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.session.sign_out().await.map_err(|e| {
        error!("Failed to sign out: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign out".to_string())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/session - The currently published session state
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse)
    )
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let snapshot = state.session.subscribe().borrow().clone();
    Json(SessionResponse {
        is_authenticated: snapshot.is_authenticated(),
        user: snapshot.current_user().cloned().map(ProfileResponse::from),
    })
}
