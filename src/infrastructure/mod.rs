//! Infrastructure layer for external integrations.
//!
//! Implements the contracts defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Read-through cache backends (Redis, moka, no-op)
//! - [`metrics`] - Metrics sinks
//! - [`persistence`] - Short link stores (PostgreSQL, in-memory)

pub mod cache;
pub mod metrics;
pub mod persistence;
