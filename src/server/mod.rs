//! HTTP exposure
//!
//! `ServerBuilder` wires the stores into the action services and mounts
//! them on an axum router:
//! - Invoice form actions and the cached listing
//! - The sign-in action
//! - The seed route
//! - Health checks

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_router;
