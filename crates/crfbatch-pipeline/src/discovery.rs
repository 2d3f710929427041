//! Input file discovery.

use std::path::{Path, PathBuf};

use crfbatch_core::{Error, Result};

/// A file selected for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Location of the file (input directory joined with the name).
    pub path: PathBuf,
    /// File name, used for logging and the audit record.
    pub name: String,
}

/// List `dir` (non-recursively) and return every regular file whose name
/// ends with `extension`.
///
/// The match is a case-sensitive suffix comparison. Results are sorted by
/// name.
///
/// # Errors
///
/// - [`Error::NotFound`] if the directory cannot be read.
/// - [`Error::EmptySet`] if no file matches.
pub async fn discover(dir: &Path, extension: &str) -> Result<Vec<InputFile>> {
    let not_found = |source| Error::NotFound {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(not_found)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(not_found)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(extension) {
            continue;
        }

        let path = entry.path();
        // Follows symlinks, so a link to a regular file is accepted.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(InputFile { path, name }),
            Ok(_) => tracing::debug!("Skipping non-file entry {}", path.display()),
            Err(e) => tracing::debug!("Skipping unreadable entry {}: {e}", path.display()),
        }
    }

    if files.is_empty() {
        return Err(Error::EmptySet {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!("Found {} video(s) in {}", files.len(), dir.display());

    Ok(files)
}
