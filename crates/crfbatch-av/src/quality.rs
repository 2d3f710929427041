//! Bitrate-driven CRF selection.
//!
//! Lower CRF means higher quality and larger output. High-bitrate sources are
//! compressed hardest; low-bitrate sources keep more of what they have.
//!
//! | bitrate (bps)            | CRF |
//! |--------------------------|-----|
//! | ≥ 2,000,000              | 48  |
//! | [1,500,000, 2,000,000)   | 44  |
//! | [1,000,000, 1,500,000)   | 32  |
//! | (500,000, 1,000,000)     | 28  |
//! | [200,000, 500,000]       | 24  |
//! | < 200,000                | 22  |
//!
//! Probing never fails a job: a prober that cannot run yields
//! [`PROBE_FAILURE_CRF`], output that is not a bitrate yields
//! [`PARSE_FAILURE_CRF`].

use std::fmt;
use std::path::Path;

use crfbatch_core::Error;

use crate::probe::BitrateProber;

/// CRF used when the prober cannot be executed or exits non-zero.
pub const PROBE_FAILURE_CRF: Crf = Crf(28);

/// CRF used when the prober runs but its output is not an integer.
pub const PARSE_FAILURE_CRF: Crf = Crf(24);

/// Encoder constant rate factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Crf(pub u8);

impl Crf {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Crf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Map a video bitrate (bits/second) to a CRF.
pub fn crf_for_bitrate(bitrate: u64) -> Crf {
    match bitrate {
        2_000_000.. => Crf(48),
        1_500_000..=1_999_999 => Crf(44),
        1_000_000..=1_499_999 => Crf(32),
        500_001..=999_999 => Crf(28),
        200_000..=500_000 => Crf(24),
        _ => Crf(22),
    }
}

/// Map a probe result to a CRF, applying the failure fallbacks.
pub fn crf_for_probe(result: &crfbatch_core::Result<u64>) -> Crf {
    match result {
        Ok(bitrate) => crf_for_bitrate(*bitrate),
        Err(Error::Probe(_)) => PARSE_FAILURE_CRF,
        Err(_) => PROBE_FAILURE_CRF,
    }
}

/// Probe `path` and choose its CRF. Never fails.
pub async fn select_crf(prober: &dyn BitrateProber, path: &Path) -> Crf {
    let result = prober.probe_bitrate(path).await;
    let crf = crf_for_probe(&result);

    match result {
        Ok(bitrate) => {
            tracing::debug!("{}: bitrate {bitrate} bps -> crf {crf}", path.display());
        }
        Err(e) => {
            tracing::warn!(
                "{} failed for {}, falling back to crf {crf}: {e}",
                prober.name(),
                path.display()
            );
        }
    }

    crf
}
