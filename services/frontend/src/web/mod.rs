pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_auth;
pub use rest::{get_profile_handler, update_profile_handler};
pub use state::AppState;

/// Builds the API router: public auth routes plus guarded profile routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/sign-up", post(auth::sign_up_handler))
        .route(
            "/auth/sign-in",
            get(auth::sign_in_page_handler).post(auth::sign_in_handler),
        )
        .route("/auth/sign-out", post(auth::sign_out_handler))
        .route("/auth/session", get(auth::session_handler));

    // Protected routes (route guard consulted first)
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
