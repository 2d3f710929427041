//! Append-only mapping from input names to encoded outputs.

use std::fmt;
use std::path::{Path, PathBuf};

use crfbatch_core::{Error, Result};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Display name of the input file.
    pub input_name: String,
    /// Where the encoded output was written.
    pub output_path: PathBuf,
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.input_name, self.output_path.display())
    }
}

/// Serialized appender for the audit file.
///
/// Every [`append`](AuditLog::append) writes one complete line while holding
/// the log's mutex, so concurrent jobs never interleave partial records.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record` as a single line, creating the file if needed.
    pub async fn append(&self, record: &AuditRecord) -> Result<()> {
        let line = format!("{record}\n");
        let write_err = |source| Error::AuditWrite {
            path: self.path.clone(),
            source,
        };

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        file.write_all(line.as_bytes()).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn record(i: usize) -> AuditRecord {
        AuditRecord {
            input_name: format!("episode_{i:02}.mp4"),
            output_path: PathBuf::from(format!("/out/{i:02}.mp4")),
        }
    }

    #[test]
    fn record_format() {
        let rec = AuditRecord {
            input_name: "a.mp4".into(),
            output_path: PathBuf::from("/out/5f0c.mp4"),
        };
        assert_eq!(rec.to_string(), "a.mp4 - /out/5f0c.mp4");
    }

    #[tokio::test]
    async fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("reference.txt"));

        log.append(&record(1)).await.unwrap();
        log.append(&record(2)).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "episode_01.mp4 - /out/01.mp4\nepisode_02.mp4 - /out/02.mp4\n"
        );
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(AuditLog::new(dir.path().join("reference.txt")));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..32 {
            let log = log.clone();
            tasks.spawn(async move { log.append(&record(i)).await });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap().unwrap();
        }

        let content = std::fs::read_to_string(log.path()).unwrap();
        let mut lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 32);
        lines.sort_unstable();
        let mut expected: Vec<String> = (0..32).map(|i| record(i).to_string()).collect();
        expected.sort_unstable();
        assert_eq!(lines, expected);
    }

    #[tokio::test]
    async fn unwritable_location_is_audit_error() {
        let log = AuditLog::new("/nonexistent/crfbatch/reference.txt");
        let err = log.append(&record(1)).await.unwrap_err();
        assert_matches!(err, Error::AuditWrite { .. });
        assert!(!err.is_fatal());
    }
}
