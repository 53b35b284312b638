//! services/frontend/src/session/guard.rs
//!
//! Decides whether navigation to a protected route may proceed.

use crate::session::state::SessionSnapshot;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigation is refused; the caller should go to this path instead.
    Redirect(String),
}

/// Reads the latest published session state and nothing else.
#[derive(Clone)]
pub struct RouteGuard {
    session: watch::Receiver<SessionSnapshot>,
    sign_in_route: String,
}

impl RouteGuard {
    pub fn new(session: watch::Receiver<SessionSnapshot>, sign_in_route: impl Into<String>) -> Self {
        Self {
            session,
            sign_in_route: sign_in_route.into(),
        }
    }

    pub fn can_activate(&self) -> GuardDecision {
        if self.session.borrow().is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(self.sign_in_route.clone())
        }
    }
}
