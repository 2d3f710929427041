use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crfbatch")]
#[command(
    author,
    version,
    about = "Re-encode a directory of videos to HEVC/AAC with a bitrate-adaptive CRF"
)]
pub struct Cli {
    /// Directory containing the videos to encode
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory receiving the encoded files (created if missing)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of concurrent encodes
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// File name suffix selecting input files, e.g. ".mkv"
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Audit log mapping input names to output paths
    #[arg(long)]
    pub audit_log: Option<PathBuf>,

    /// File the run log is appended to
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (also mirrors logs to stderr)
    #[arg(short, long)]
    pub verbose: bool,
}
