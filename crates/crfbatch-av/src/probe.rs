//! Video bitrate probing.
//!
//! The [`BitrateProber`] trait is the seam between CRF selection and the
//! external prober; [`FfprobeBitrateProber`] implements it by shelling out to
//! ffprobe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crfbatch_core::{Error, Result};

use crate::command::ToolCommand;

/// Reads the bitrate of the first video stream of a media file.
///
/// Implementations must distinguish two failure modes: the prober could not
/// run or exited non-zero ([`Error::Tool`]), and the prober ran but its output
/// is not a bitrate ([`Error::Probe`]).
#[async_trait]
pub trait BitrateProber: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Video bitrate in bits per second.
    async fn probe_bitrate(&self, path: &Path) -> Result<u64>;
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeBitrateProber {
    ffprobe_path: PathBuf,
}

impl FfprobeBitrateProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self { ffprobe_path }
    }

    fn command(&self, path: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffprobe_path.clone());
        cmd.args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=bit_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]);
        cmd.arg(path.to_string_lossy().as_ref());
        cmd
    }
}

#[async_trait]
impl BitrateProber for FfprobeBitrateProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    async fn probe_bitrate(&self, path: &Path) -> Result<u64> {
        let output = self.command(path).execute().await?;
        parse_bitrate(&output.stdout)
    }
}

/// Parse the single integer ffprobe prints for `stream=bit_rate`.
pub fn parse_bitrate(stdout: &str) -> Result<u64> {
    let trimmed = stdout.trim();
    trimmed
        .parse::<u64>()
        .map_err(|e| Error::Probe(format!("unparseable bitrate {trimmed:?}: {e}")))
}
