//! Unified error type for crfbatch.
//!
//! All crates funnel their failures into [`Error`]. Whether a failure stops
//! the whole batch or only the job that hit it is decided by
//! [`Error::is_fatal`].

use std::path::PathBuf;

/// Unified error type covering all failure modes of a batch run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration; the pipeline never starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input directory could not be read.
    #[error("Directory not found or unreadable: {}: {source}", path.display())]
    NotFound {
        /// Directory that was listed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Discovery found no file with the target extension.
    #[error("No files matching *{extension} in {}", dir.display())]
    EmptySet {
        /// Directory that was listed.
        dir: PathBuf,
        /// Extension suffix that was searched for.
        extension: String,
    },

    /// Prober output could not be interpreted.
    #[error("Probe error: {0}")]
    Probe(String),

    /// An external tool (ffmpeg, ffprobe) failed to run or exited non-zero.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description, including captured stderr.
        message: String,
    },

    /// Reading the size of an input or output file failed.
    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        /// File that could not be inspected.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Appending a line to the audit log failed.
    #[error("Failed to write audit log {}: {source}", path.display())]
    AuditWrite {
        /// Audit log location.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A statistic was requested over an empty sample set.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error must stop the whole run rather than a single job.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::NotFound { .. } | Error::EmptySet { .. }
        )
    }

    /// Convenience constructor for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Stat`].
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Stat {
            path: path.into(),
            source,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
