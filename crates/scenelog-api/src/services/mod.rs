//! Ingest and query services.

pub mod ingest;
pub mod query;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use ingest::{IngestError, IngestJob};
pub use query::QueryService;
pub use scheduler::Scheduler;
