//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store trait and its error type
//! - [`short_code`] - Validated short code value type
//! - [`metrics`] - Metrics sink trait
//! - [`visit_event`] - Visit message passed to the worker
//! - [`visit_worker`] - Asynchronous visit persistence
//!
//! # Visit Processing Flow
//!
//! 1. A code resolves successfully in the coordinator
//! 2. A [`visit_event::VisitEvent`] is pushed onto a bounded channel (never awaited)
//! 3. [`visit_worker::run_visit_worker`] persists it with retry
//! 4. Failures are logged and counted, never returned to the caller

pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod short_code;
pub mod visit_event;
pub mod visit_worker;
