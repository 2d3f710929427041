//! Wiring of one batch run: discovery, tool lookup, dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use crfbatch_av::{FfmpegEncoder, FfprobeBitrateProber, ToolRegistry};
use crfbatch_core::Config;
use crfbatch_pipeline::{
    discover, AuditLog, Dispatcher, JobContext, JobReport, ProgressSender, Summary,
};

/// Everything a run needs, after CLI flags have been merged into the config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: Config,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub concurrency: Option<usize>,
    pub extension: Option<String>,
    pub audit_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Merge `overrides` into `config` and validate the result.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        mut config: Config,
        overrides: Overrides,
    ) -> Result<Self> {
        if let Some(concurrency) = overrides.concurrency {
            config.batch.concurrency = concurrency;
        }
        if let Some(extension) = overrides.extension {
            config.batch.extension = extension;
        }
        if let Some(audit_log) = overrides.audit_log {
            config.batch.audit_log = audit_log;
        }
        if let Some(log_file) = overrides.log_file {
            config.logging.file = log_file;
        }
        config.validate()?;

        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config,
        })
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: JobReport,
    /// `None` when no job succeeded.
    pub summary: Option<Summary>,
}

/// Execute a batch run.
///
/// Discovery and configuration problems abort with an error before any job
/// starts. Per-job failures only show up in the returned report.
pub async fn run(settings: &Settings, progress: ProgressSender) -> Result<RunOutcome> {
    let batch = &settings.config.batch;

    let files = discover(&settings.input_dir, &batch.extension).await?;

    let registry = ToolRegistry::discover(&settings.config.tools);
    let ffmpeg = registry
        .require("ffmpeg")
        .context("Configuration error: an encoder is required")?
        .to_path_buf();
    let ffprobe = match registry.get("ffprobe") {
        Some(path) => path.to_path_buf(),
        None => {
            tracing::warn!("ffprobe not found; every file will use the fallback CRF");
            PathBuf::from("ffprobe")
        }
    };
    log_tool_versions(registry).await;

    create_output_dir(&settings.output_dir).await?;

    let ctx = JobContext::new(
        Arc::new(FfmpegEncoder::new(ffmpeg)),
        Arc::new(FfprobeBitrateProber::new(ffprobe)),
        Arc::new(AuditLog::new(&batch.audit_log)),
        &settings.output_dir,
    )
    .with_output_extension(batch.output_extension.clone());

    let dispatcher = Dispatcher::new(ctx, batch.concurrency)?.with_progress(progress);
    let outcome = dispatcher.run(files).await;

    let summary = match outcome.sizes.summary() {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::error!("No statistics for this run: {e}");
            None
        }
    };

    Ok(RunOutcome {
        report: outcome.report,
        summary,
    })
}

async fn create_output_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

async fn log_tool_versions(registry: ToolRegistry) {
    let infos = tokio::task::spawn_blocking(move || registry.check_all()).await;
    let Ok(infos) = infos else {
        return;
    };
    for info in infos.iter().filter(|i| i.available) {
        tracing::info!(
            "{}: {}",
            info.name,
            info.version.as_deref().unwrap_or("unknown version")
        );
    }
}
