//! services/frontend/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::session::{RouteGuard, SessionService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
    pub guard: RouteGuard,
}

impl AppState {
    pub fn new(session: Arc<SessionService>) -> Self {
        let guard = session.route_guard();
        Self { session, guard }
    }
}
