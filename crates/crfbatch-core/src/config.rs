//! Batch configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML and carries the
//! sub-configs for the batch, external tools and logging. Every section
//! defaults sensibly so an empty file is valid. Input and output directories
//! are not part of the file; they always come from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Locations searched when no config path is given explicitly.
const DEFAULT_CONFIG_PATHS: &[&str] = &["./crfbatch.toml", "~/.config/crfbatch/config.toml"];

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub batch: BatchConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::config(format!("config parse error: {e}")))
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The config file to read: the explicit path if given, otherwise the
    /// first default location that exists.
    ///
    /// `None` means no file was found and defaults apply.
    pub fn locate(custom_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = custom_path {
            return Some(path.to_path_buf());
        }

        DEFAULT_CONFIG_PATHS
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
            .find(|p| p.exists())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch.concurrency == 0 {
            return Err(Error::config("batch.concurrency must be at least 1"));
        }
        if self.batch.extension.is_empty() {
            return Err(Error::config("batch.extension cannot be empty"));
        }
        if self.batch.output_extension.is_empty() {
            return Err(Error::config("batch.output_extension cannot be empty"));
        }

        for (name, path) in [
            ("ffmpeg_path", &self.tools.ffmpeg_path),
            ("ffprobe_path", &self.tools.ffprobe_path),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    return Err(Error::config(format!(
                        "tools.{name} does not exist: {}",
                        p.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Batch scheduling and output naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of encode jobs running at once.
    pub concurrency: usize,
    /// Case-sensitive file name suffix selecting input files.
    pub extension: String,
    /// Extension given to encoded outputs (without the dot).
    pub output_extension: String,
    /// Append-only input-to-output mapping.
    pub audit_log: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            extension: ".mp4".into(),
            output_extension: "mp4".into(),
            audit_log: PathBuf::from("reference.txt"),
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// Log destination and filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// File the run log is appended to.
    pub file: PathBuf,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logfile.log"),
            filter: None,
        }
    }
}
