//! Temp-file staging for uploaded scan exports.
//!
//! An upload is written in full to a private temp directory before extraction
//! starts. The directory is removed when the [`StagedUpload`] is dropped, so
//! every exit path (success, bad input, store failure) cleans up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

/// Name used when the client sends no usable filename.
pub const FALLBACK_FILENAME: &str = "upload.csv";

/// Reduce a client-supplied filename to its final path component.
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

/// A fully written upload inside its own temp directory.
#[derive(Debug)]
pub struct StagedUpload {
    // Held for its Drop; removes the directory and file
    _dir: TempDir,
    path: PathBuf,
    filename: String,
}

impl StagedUpload {
    /// Write `contents` to `<temp>/<filename>` and sync it to disk.
    pub async fn write(parent: Option<&Path>, filename: &str, contents: &[u8]) -> Result<Self> {
        let dir = match parent {
            Some(parent) => TempDir::new_in(parent),
            None => TempDir::new(),
        }
        .context("Failed to create staging directory")?;

        let filename = sanitize_filename(filename);
        let path = dir.path().join(&filename);

        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create staged file {}", path.display()))?;
        file.write_all(contents)
            .await
            .context("Failed to write staged upload")?;
        file.sync_all()
            .await
            .context("Failed to flush staged upload")?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Staged upload");

        Ok(Self {
            _dir: dir,
            path,
            filename,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitized filename, used as the stored file label.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}
