//! Business logic services for the application layer.

pub mod shorten_coordinator;

pub use shorten_coordinator::{
    CoordinatorSettings, MAX_RETRIES, ResolveError, ShortenCoordinator, ShortenError,
    VisitContext,
};
