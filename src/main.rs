mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use crfbatch::batch::{self, Overrides, Settings};
use crfbatch::report;
use crfbatch_core::Config;
use crfbatch_pipeline::ProgressSender;
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} encoded";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::locate(cli.config.as_deref());
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = Settings::new(
        &cli.input,
        &cli.output,
        config,
        Overrides {
            concurrency: cli.concurrency,
            extension: cli.extension.clone(),
            audit_log: cli.audit_log.clone(),
            log_file: cli.log_file.clone(),
        },
    )?;

    let _log_guard = logging::init(&settings.config.logging, cli.verbose)?;
    tracing::info!(
        "Starting crfbatch {}: {} -> {}",
        env!("CARGO_PKG_VERSION"),
        settings.input_dir.display(),
        settings.output_dir.display()
    );
    match &config_path {
        Some(path) => tracing::info!("Using config file {}", path.display()),
        None => tracing::debug!("No config file found; using defaults"),
    }

    let bar = progress_bar()?;
    let progress = {
        let bar = bar.clone();
        ProgressSender::new(move |done, total| {
            bar.set_length(total);
            bar.set_position(done);
        })
    };

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(batch::run(&settings, progress));
    bar.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("{e:#}");
            return Err(e);
        }
    };

    print!("{}", report::render(&outcome.report, outcome.summary.as_ref()));

    if outcome.summary.is_none() {
        anyhow::bail!(
            "No file was encoded successfully; see {}",
            settings.config.logging.file.display()
        );
    }
    Ok(())
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)?.progress_chars("=> ");
    bar.set_style(style);
    Ok(bar)
}
