//! Metrics sink implementations.
//!
//! - [`RecorderMetrics`] - Forwards to the `metrics` facade (production)
//! - [`InMemoryMetrics`] - Atomic counters readable in-process (tests, diagnostics)

mod in_memory;
mod recorder;

pub use in_memory::InMemoryMetrics;
pub use recorder::RecorderMetrics;
