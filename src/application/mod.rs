//! Application layer services implementing business logic.
//!
//! Services consume domain traits (store, metrics sink) and infrastructure
//! capabilities (cache) and expose a small API to HTTP handlers.
//!
//! - [`services::shorten_coordinator::ShortenCoordinator`] - Shorten, resolve and list
pub mod services;
