//! services/frontend/src/web/rest.rs
//!
//! Contains the Axum handlers for the protected profile endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::SessionError;
use crate::web::auth::{
    self, AuthResultResponse, MessageResponse, ProfileResponse, SessionResponse, SignInRequest,
    SignUpRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use booking_auth_core::domain::ProfileUpdate;
use booking_auth_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::sign_up_handler,
        auth::sign_in_handler,
        auth::sign_in_page_handler,
        auth::sign_out_handler,
        auth::session_handler,
        get_profile_handler,
        update_profile_handler,
    ),
    components(
        schemas(
            SignUpRequest,
            SignInRequest,
            AuthResultResponse,
            ProfileResponse,
            SessionResponse,
            MessageResponse,
            UpdateProfileRequest
        )
    ),
    tags(
        (name = "Booking Front-end API", description = "Authentication and profile endpoints for the booking site.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// A partial profile update. Omitted fields are left untouched.
#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// The signed-in user's profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 303, description = "Not signed in, redirected to the sign-in route"),
        (status = 401, description = "Signed out while the request was in flight")
    )
)]
pub async fn get_profile_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    app_state
        .session
        .current_user()
        .map(|profile| Json(ProfileResponse::from(profile)))
        .ok_or((StatusCode::UNAUTHORIZED, "No authenticated user".to_string()))
}

/// Merge a name and/or photo URL into the signed-in user's profile.
#[utoipa::path(
    patch,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 303, description = "Not signed in, redirected to the sign-in route"),
        (status = 401, description = "No authenticated user"),
        (status = 404, description = "The profile document does not exist"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let update = ProfileUpdate {
        name: req.name,
        photo_url: req.photo_url,
    };

    match app_state.session.update_profile(&update).await {
        Ok(profile) => Ok(Json(ProfileResponse::from(profile))),
        Err(SessionError::NotAuthenticated) => Err((
            StatusCode::UNAUTHORIZED,
            "No authenticated user".to_string(),
        )),
        Err(SessionError::Port(PortError::NotFound(message))) => {
            Err((StatusCode::NOT_FOUND, message))
        }
        Err(e) => {
            error!("Failed to update profile: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update profile".to_string(),
            ))
        }
    }
}
