//! Fake collaborators for pipeline tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use crfbatch_av::{BitrateProber, Crf, Encoder};
use crfbatch_core::{Error, Result};

/// Encoder that writes an output half the size of its input, optionally
/// failing for selected input names, and records peak concurrency.
#[derive(Debug, Default)]
pub(crate) struct FakeEncoder {
    fail_inputs: HashSet<String>,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
    crfs: Mutex<Vec<Crf>>,
}

impl FakeEncoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.fail_inputs = names.into_iter().map(str::to_string).collect();
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn crfs(&self) -> Vec<Crf> {
        self.crfs.lock().unwrap().clone()
    }

    async fn write_output(&self, input: &Path, output: &Path) -> Result<()> {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_inputs.contains(&name) {
            return Err(Error::tool("fake-encoder", format!("simulated failure for {name}")));
        }

        let size = tokio::fs::metadata(input).await?.len();
        tokio::fs::write(output, vec![0u8; (size / 2) as usize]).await?;
        Ok(())
    }
}

#[async_trait]
impl Encoder for FakeEncoder {
    fn name(&self) -> &'static str {
        "fake-encoder"
    }

    async fn encode(&self, input: &Path, crf: Crf, output: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.crfs.lock().unwrap().push(crf);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self.write_output(input, output).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Prober returning a canned result.
#[derive(Debug, Clone)]
pub(crate) enum FakeProber {
    Bitrate(u64),
    ToolFailure,
    Unparseable,
}

impl FakeProber {
    pub(crate) fn bitrate(bps: u64) -> Self {
        Self::Bitrate(bps)
    }
}

#[async_trait]
impl BitrateProber for FakeProber {
    fn name(&self) -> &'static str {
        "fake-prober"
    }

    async fn probe_bitrate(&self, _path: &Path) -> Result<u64> {
        match self {
            Self::Bitrate(bps) => Ok(*bps),
            Self::ToolFailure => Err(Error::tool("fake-prober", "exit status 1")),
            Self::Unparseable => Err(Error::Probe("unparseable bitrate \"N/A\"".into())),
        }
    }
}
