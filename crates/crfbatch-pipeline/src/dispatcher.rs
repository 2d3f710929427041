//! Bounded-concurrency fan-out of encode jobs.

use std::sync::Arc;

use crfbatch_core::{Error, Result};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};

use crate::aggregate::{Aggregator, SizePair};
use crate::context::{JobContext, ProgressSender};
use crate::discovery::InputFile;
use crate::job::EncodeJob;

/// Per-job outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub report: JobReport,
    /// Sizes of every successful job.
    pub sizes: Aggregator,
}

/// Runs one [`EncodeJob`] per input file, at most `concurrency` at a time.
///
/// A permit is acquired before each job is spawned and released when the
/// job's task ends, whatever the outcome.
pub struct Dispatcher {
    ctx: Arc<JobContext>,
    concurrency: usize,
    progress: Arc<ProgressSender>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// # Errors
    ///
    /// [`Error::Config`] if `concurrency` is zero.
    pub fn new(ctx: JobContext, concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::config("concurrency must be at least 1"));
        }
        Ok(Self {
            ctx: Arc::new(ctx),
            concurrency,
            progress: Arc::new(ProgressSender::noop()),
        })
    }

    /// Builder: report finished jobs to `progress`.
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Run every file and wait until all jobs have finished.
    pub async fn run(&self, files: Vec<InputFile>) -> DispatchOutcome {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, rx) = mpsc::unbounded_channel::<SizePair>();
        let mut tasks = JoinSet::new();
        let mut report = JobReport {
            attempted: files.len(),
            ..JobReport::default()
        };

        self.progress.start(files.len() as u64);
        tracing::info!(
            "Dispatching {} job(s) with concurrency {}",
            files.len(),
            self.concurrency
        );

        for file in files {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore closed");

            // Reap anything that already finished so the set stays small.
            while let Some(joined) = tasks.try_join_next() {
                record(&mut report, joined);
            }

            let ctx = self.ctx.clone();
            let intake = tx.clone();
            let progress = self.progress.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let _tick = TickOnDrop(progress);
                EncodeJob::new(file).run(&ctx, &intake).await
            });
        }
        drop(tx);

        while let Some(joined) = tasks.join_next().await {
            record(&mut report, joined);
        }

        let sizes = Aggregator::collect(rx).await;
        tracing::info!(
            "All jobs finished: {} succeeded, {} failed",
            report.succeeded,
            report.failed
        );
        DispatchOutcome { report, sizes }
    }
}

/// Ticks progress when the job's task ends, including by panic.
struct TickOnDrop(Arc<ProgressSender>);

impl Drop for TickOnDrop {
    fn drop(&mut self) {
        self.0.tick();
    }
}

fn record(report: &mut JobReport, joined: std::result::Result<Result<SizePair>, JoinError>) {
    match joined {
        Ok(Ok(_)) => report.succeeded += 1,
        Ok(Err(_)) => report.failed += 1,
        Err(e) => {
            tracing::error!("Encode task panicked: {e}");
            report.failed += 1;
        }
    }
}
