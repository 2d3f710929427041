//! # crfbatch-av
//!
//! External tool plumbing for the crfbatch pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- async builder that captures
//!   stdout and stderr of external processes.
//! - **Bitrate probing** ([`BitrateProber`], [`FfprobeBitrateProber`]).
//! - **Encoding** ([`Encoder`], [`FfmpegEncoder`]) -- fixed libx265/AAC
//!   settings with a per-file CRF.
//! - **CRF selection** ([`quality`]) -- the bitrate table and its fallbacks.

pub mod command;
pub mod encode;
pub mod probe;
pub mod quality;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use encode::{Encoder, FfmpegEncoder};
pub use probe::{BitrateProber, FfprobeBitrateProber};
pub use quality::{crf_for_bitrate, select_crf, Crf};
pub use tools::{ToolInfo, ToolRegistry};
