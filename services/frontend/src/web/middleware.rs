//! services/frontend/src/web/middleware.rs
//!
//! Guard middleware for protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::info;

use crate::session::GuardDecision;
use crate::web::state::AppState;

/// Middleware that consults the route guard before running the handler.
///
/// If nobody is signed in, answers with `303 See Other` pointing at the sign-in route.
pub async fn require_auth(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    match state.guard.can_activate() {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(target) => {
            info!(path = %req.uri().path(), "Redirecting unauthenticated request to {}", target);
            Redirect::to(&target).into_response()
        }
    }
}
