//! # crfbatch-pipeline
//!
//! Orchestration of a batch encode run.
//!
//! This crate provides:
//!
//! - **[`discover`]** -- non-recursive listing of input files by extension.
//! - **[`EncodeJob`]** -- the per-file unit of work: CRF selection, encode,
//!   size measurement, audit record.
//! - **[`Dispatcher`]** -- launches one job per file behind an admission
//!   semaphore and waits for all of them.
//! - **[`AuditLog`]** -- serialized, append-only input-to-output mapping.
//! - **[`Aggregator`]** -- medians and totals over the collected sizes.
//! - **[`JobContext`]** / **[`ProgressSender`]** -- shared collaborators.

pub mod aggregate;
pub mod audit;
pub mod context;
pub mod discovery;
pub mod dispatcher;
pub mod job;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at the crate root.
pub use aggregate::{median, Aggregator, SizePair, Summary};
pub use audit::{AuditLog, AuditRecord};
pub use context::{JobContext, ProgressSender};
pub use discovery::{discover, InputFile};
pub use dispatcher::{DispatchOutcome, Dispatcher, JobReport};
pub use job::EncodeJob;
