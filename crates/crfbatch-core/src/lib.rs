//! crfbatch-core: shared error taxonomy and configuration.
//!
//! This crate is the foundational dependency for all other crfbatch crates,
//! providing the unified error type and the batch configuration loaded from
//! TOML.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use config::Config;
pub use error::{Error, Result};
