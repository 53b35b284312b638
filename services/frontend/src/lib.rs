//! services/frontend/src/lib.rs
//!
//! Authentication and session sync for the booking front-end: identity and profile
//! adapters, the session service and route guard, and the HTTP surface.

pub mod adapters;
pub mod config;
pub mod error;
pub mod session;
pub mod web;
