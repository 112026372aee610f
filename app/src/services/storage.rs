//! Local disk storage for uploaded documents.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static RE_UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.\-]").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Uploaded file is empty")]
    Empty,
    #[error("File too large (max {0} bytes)")]
    FileTooLarge(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written by [`UploadStore::save`].
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Writes uploads into a directory served under `/uploads`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: PathBuf, max_bytes: usize) -> Self {
        Self { root, max_bytes }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save `data` as `{unix_millis}_{sanitized original name}`.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<StoredFile, StorageError> {
        if data.is_empty() {
            return Err(StorageError::Empty);
        }
        if data.len() > self.max_bytes {
            return Err(StorageError::FileTooLarge(self.max_bytes));
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let filename = format!(
            "{}_{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        let path = self.root.join(&filename);
        tokio::fs::write(&path, data).await?;
        tracing::info!(filename = %filename, size = data.len(), "Upload stored");

        Ok(StoredFile {
            filename,
            path,
            size: data.len(),
        })
    }
}

/// Replace every character outside `[a-zA-Z0-9.-]` with `_`.
///
/// Only the final path component is kept, so the result never escapes the
/// upload directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = RE_UNSAFE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Whether an upload looks like a PDF by content type or extension.
pub fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    if let Some(ct) = content_type {
        if ct.eq_ignore_ascii_case("application/pdf") {
            return true;
        }
    }
    mime_guess::from_path(filename)
        .first()
        .is_some_and(|m| m == mime_guess::mime::APPLICATION_PDF)
}
