//! Cross-job size statistics.
//!
//! Sizes are collected in bytes. The [`Summary`] reports medians in bytes
//! and offers MiB (1024 × 1024 bytes) views for display.

use crfbatch_core::{Error, Result};
use tokio::sync::mpsc;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Input and output size of one successfully encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePair {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Median of `values`.
///
/// Odd counts return the middle element. Even counts return the mean of the
/// two middle elements, rounded down.
///
/// # Errors
///
/// [`Error::InsufficientData`] if `values` is empty.
pub fn median(values: &[u64]) -> Result<u64> {
    if values.is_empty() {
        return Err(Error::InsufficientData("median of an empty set".into()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Ok(sorted[mid]);
    }

    let (a, b) = (sorted[mid - 1], sorted[mid]);
    Ok(a / 2 + b / 2 + (a % 2 + b % 2) / 2)
}

/// Converts a byte count to mebibytes.
pub fn bytes_to_mib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

/// Collected input and output sizes of a run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    inputs: Vec<u64>,
    outputs: Vec<u64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: SizePair) {
        self.inputs.push(pair.input_bytes);
        self.outputs.push(pair.output_bytes);
    }

    /// Drain the intake channel until every sender is gone.
    pub async fn collect(mut intake: mpsc::UnboundedReceiver<SizePair>) -> Self {
        let mut aggregator = Self::new();
        while let Some(pair) = intake.recv().await {
            aggregator.push(pair);
        }
        aggregator
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = SizePair>) -> Self {
        let mut aggregator = Self::new();
        for pair in pairs {
            aggregator.push(pair);
        }
        aggregator
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Medians and totals over everything collected.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] if nothing was collected.
    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary {
            samples: self.len(),
            median_input_bytes: median(&self.inputs)?,
            median_output_bytes: median(&self.outputs)?,
            total_input_bytes: self.inputs.iter().sum(),
            total_output_bytes: self.outputs.iter().sum(),
        })
    }
}

/// Size statistics of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of size pairs the statistics cover.
    pub samples: usize,
    pub median_input_bytes: u64,
    pub median_output_bytes: u64,
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
}

impl Summary {
    pub fn median_input_mib(&self) -> f64 {
        bytes_to_mib(self.median_input_bytes)
    }

    pub fn median_output_mib(&self) -> f64 {
        bytes_to_mib(self.median_output_bytes)
    }

    /// Overall size reduction in percent; negative if outputs grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.total_input_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.total_output_bytes as f64 / self.total_input_bytes as f64) * 100.0
    }
}
