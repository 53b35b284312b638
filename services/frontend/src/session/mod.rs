pub mod guard;
pub mod service;
pub mod state;

pub use guard::{GuardDecision, RouteGuard};
pub use service::SessionService;
pub use state::SessionSnapshot;
