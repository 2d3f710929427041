//! HEVC encoding through ffmpeg.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crfbatch_core::Result;

use crate::command::ToolCommand;
use crate::quality::Crf;

// Fixed output options: first video and audio stream, libx265 in
// constant-quality mode, AAC audio at 60k, tuned for animation.
const MAP_ARGS: &[&str] = &["-map", "0:v:0", "-map", "0:a:0"];
const VIDEO_ARGS: &[&str] = &["-c:v", "libx265", "-b:v", "0"];
const PRESET_ARGS: &[&str] = &["-preset", "medium"];
const AUDIO_ARGS: &[&str] = &["-c:a", "aac", "-b:a", "60k"];
const TUNING_ARGS: &[&str] = &["-tune", "animation", "-threads", "16"];

/// Transcodes one input file into one output file at a given CRF.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Human-readable name identifying this encoder implementation.
    fn name(&self) -> &'static str;

    /// Encode `input` into `output`.
    ///
    /// A failed encode returns [`crfbatch_core::Error::Tool`] carrying the
    /// encoder's captured stderr. Partial output is left in place.
    async fn encode(&self, input: &Path, crf: Crf, output: &Path) -> Result<()>;
}

/// An [`Encoder`] backed by the `ffmpeg` CLI.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegEncoder {
    /// Create a new encoder using the given ffmpeg path.
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    fn command(&self, input: &Path, crf: Crf, output: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffmpeg_path.clone());
        cmd.arg("-i");
        cmd.arg(input.to_string_lossy().as_ref());
        cmd.args(MAP_ARGS.iter().copied());
        cmd.args(VIDEO_ARGS.iter().copied());
        cmd.args(["-crf".to_string(), crf.to_string()]);
        cmd.args(PRESET_ARGS.iter().copied());
        cmd.args(AUDIO_ARGS.iter().copied());
        cmd.args(TUNING_ARGS.iter().copied());
        cmd.arg(output.to_string_lossy().as_ref());
        cmd
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn encode(&self, input: &Path, crf: Crf, output: &Path) -> Result<()> {
        tracing::info!("HEVC encode: {:?} -> {:?} (crf={crf})", input, output);
        self.command(input, crf, output).execute().await?;
        Ok(())
    }
}
