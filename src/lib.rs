//! crfbatch - batch re-encoder with a bitrate-adaptive CRF
//!
//! This library crate exposes the run orchestration for integration testing.

pub mod batch;
pub mod report;
