//! End-to-end batch run with fake tools.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use crfbatch_av::{BitrateProber, Crf, Encoder};
use crfbatch_core::{Error, Result};
use crfbatch_pipeline::{discover, AuditLog, Dispatcher, JobContext, JobReport};

/// Copies a quarter of the input, failing for listed names.
struct QuarterEncoder {
    fail: HashSet<&'static str>,
}

#[async_trait]
impl Encoder for QuarterEncoder {
    fn name(&self) -> &'static str {
        "quarter"
    }

    async fn encode(&self, input: &Path, _crf: Crf, output: &Path) -> Result<()> {
        let name = input.file_name().unwrap().to_str().unwrap();
        if self.fail.contains(name) {
            return Err(Error::tool("quarter", "exited with status 1"));
        }
        let data = tokio::fs::read(input).await?;
        tokio::fs::write(output, &data[..data.len() / 4]).await?;
        Ok(())
    }
}

struct FixedProber;

#[async_trait]
impl BitrateProber for FixedProber {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn probe_bitrate(&self, _path: &Path) -> Result<u64> {
        Ok(800_000)
    }
}

#[tokio::test]
async fn ten_files_two_failures() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::create_dir_all(&output).unwrap();

    for i in 1..=10u64 {
        std::fs::write(input.join(format!("{i:02}.mp4")), vec![0u8; (i * 400) as usize]).unwrap();
    }
    std::fs::write(input.join("notes.txt"), "skip me").unwrap();

    let files = discover(&input, ".mp4").await.unwrap();
    assert_eq!(files.len(), 10);

    let audit_path = dir.path().join("reference.txt");
    let ctx = JobContext::new(
        Arc::new(QuarterEncoder {
            fail: ["03.mp4", "07.mp4"].into_iter().collect(),
        }),
        Arc::new(FixedProber),
        Arc::new(AuditLog::new(&audit_path)),
        &output,
    );
    let outcome = Dispatcher::new(ctx, 4).unwrap().run(files).await;

    assert_eq!(
        outcome.report,
        JobReport {
            attempted: 10,
            succeeded: 8,
            failed: 2
        }
    );

    // Successful inputs: 400 * {1,2,4,5,6,8,9,10}; middle pair is 5 and 6.
    let summary = outcome.sizes.summary().unwrap();
    assert_eq!(summary.samples, 8);
    assert_eq!(summary.median_input_bytes, 2200);
    assert_eq!(summary.median_output_bytes, 550);
    assert!((summary.reduction_percent() - 75.0).abs() < 1e-9);

    let audit = std::fs::read_to_string(&audit_path).unwrap();
    let lines: Vec<&str> = audit.lines().collect();
    assert_eq!(lines.len(), 8);
    for line in &lines {
        let (name, out) = line.split_once(" - ").unwrap();
        assert!(name != "03.mp4" && name != "07.mp4");
        assert!(Path::new(out).exists());
    }

    let produced = std::fs::read_dir(&output).unwrap().count();
    assert_eq!(produced, 8);
}
