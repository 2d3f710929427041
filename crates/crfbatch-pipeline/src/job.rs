//! The per-file unit of work.

use std::path::Path;

use crfbatch_av::select_crf;
use crfbatch_core::{Error, Result};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::aggregate::SizePair;
use crate::audit::AuditRecord;
use crate::context::JobContext;
use crate::discovery::InputFile;

/// Encodes one input file.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    input: InputFile,
}

impl EncodeJob {
    pub fn new(input: InputFile) -> Self {
        Self { input }
    }

    /// Run the job to completion.
    ///
    /// On success the [`SizePair`] is sent to `intake` and an audit record is
    /// appended. An encode or stat failure aborts the job before either
    /// happens. A failed audit append is logged but does not fail the job,
    /// because the output file already exists.
    pub async fn run(
        &self,
        ctx: &JobContext,
        intake: &mpsc::UnboundedSender<SizePair>,
    ) -> Result<SizePair> {
        let input = &self.input;
        tracing::info!("Starting encoding for file: {}", input.name);

        let crf = select_crf(ctx.prober.as_ref(), &input.path).await;
        let output = ctx.output_path(Uuid::new_v4());

        if let Err(e) = ctx.encoder.encode(&input.path, crf, &output).await {
            tracing::error!("Failed to encode file: {}: {e}", input.path.display());
            return Err(e);
        }

        let sizes = match stat_pair(&input.path, &output).await {
            Ok(sizes) => sizes,
            Err(e) => {
                tracing::error!(
                    "Failed to get file sizes for {} and {}: {e}",
                    input.path.display(),
                    output.display()
                );
                return Err(e);
            }
        };

        if intake.send(sizes).is_err() {
            tracing::warn!("Size intake closed; sizes for {} not collected", input.name);
        }

        let record = AuditRecord {
            input_name: input.name.clone(),
            output_path: output,
        };
        if let Err(e) = ctx.audit.append(&record).await {
            tracing::error!("{e}");
        }

        tracing::info!(
            "Finished {} (crf {crf}): {} -> {} bytes",
            input.name,
            sizes.input_bytes,
            sizes.output_bytes
        );
        Ok(sizes)
    }
}

async fn stat_pair(input: &Path, output: &Path) -> Result<SizePair> {
    let input_bytes = file_size(input).await?;
    let output_bytes = file_size(output).await?;
    Ok(SizePair {
        input_bytes,
        output_bytes,
    })
}

async fn file_size(path: &Path) -> Result<u64> {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.len())
        .map_err(|e| Error::stat(path, e))
}
