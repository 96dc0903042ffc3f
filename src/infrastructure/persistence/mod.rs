//! Short link store implementations.
//!
//! - [`PgShortLinkStore`] - PostgreSQL storage via SQLx runtime queries
//! - [`InMemoryStore`] - Concurrent in-process storage

pub mod memory_store;
pub mod pg_short_link_store;

pub use memory_store::InMemoryStore;
pub use pg_short_link_store::PgShortLinkStore;
