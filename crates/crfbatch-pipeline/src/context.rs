//! Collaborators shared by every job of a batch run.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crfbatch_av::{BitrateProber, Encoder};
use uuid::Uuid;

use crate::audit::AuditLog;

/// Sender for reporting batch progress.
///
/// Wraps a callback that receives the number of finished jobs and the total
/// job count. The counter is atomic, so concurrent jobs can tick it freely.
pub struct ProgressSender {
    callback: Box<dyn Fn(u64, u64) + Send + Sync>,
    completed: AtomicU64,
    total: AtomicU64,
}

impl ProgressSender {
    /// Create a new sender from the given callback.
    pub fn new(callback: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            completed: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Create a no-op sender that only counts.
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    /// Reset the counter for a run of `total` jobs.
    pub fn start(&self, total: u64) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
        (self.callback)(0, total);
    }

    /// Record one finished job.
    pub fn tick(&self) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        (self.callback)(completed, self.total.load(Ordering::SeqCst));
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ProgressSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSender")
            .field("completed", &self.completed)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Context passed to every [`EncodeJob`](crate::EncodeJob).
pub struct JobContext {
    /// Encoder invoked once per job.
    pub encoder: Arc<dyn Encoder>,
    /// Prober used for CRF selection.
    pub prober: Arc<dyn BitrateProber>,
    /// Shared audit log.
    pub audit: Arc<AuditLog>,
    /// Directory receiving encoded files.
    pub output_dir: PathBuf,
    /// Extension of encoded files, without the dot.
    pub output_extension: String,
}

impl JobContext {
    /// Create a new context writing `.mp4` outputs into `output_dir`.
    pub fn new(
        encoder: Arc<dyn Encoder>,
        prober: Arc<dyn BitrateProber>,
        audit: Arc<AuditLog>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            encoder,
            prober,
            audit,
            output_dir: output_dir.into(),
            output_extension: "mp4".into(),
        }
    }

    /// Builder: set the output extension.
    pub fn with_output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = extension.into();
        self
    }

    /// Destination for the output identified by `id`.
    pub fn output_path(&self, id: Uuid) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", id.hyphenated(), self.output_extension))
    }
}
