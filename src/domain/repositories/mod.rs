//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.

pub mod short_link_store;

pub use short_link_store::{ShortLinkStore, StoreError};

#[cfg(test)]
pub use short_link_store::MockShortLinkStore;
