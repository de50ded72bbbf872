//! Disk storage for uploaded workout plan spreadsheets.
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const EXCEL_MIME_TYPES: [&str; 2] = [
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only Excel files are allowed")]
    UnsupportedType,
    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),
    #[error("Invalid file name")]
    InvalidName,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

pub fn is_allowed_mime(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    EXCEL_MIME_TYPES.iter().any(|m| m.eq_ignore_ascii_case(essence))
}

/// Keeps only the final path component and replaces anything outside a safe set.
fn sanitize_file_name(original: &str) -> Option<String> {
    let base = original.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(
        base.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    )
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Writes the file as `<uuid>_<original name>` and returns the stored name.
    pub async fn save(&self, original_name: &str, content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if !is_allowed_mime(content_type) {
            return Err(UploadError::UnsupportedType);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }
        let clean = sanitize_file_name(original_name).ok_or(UploadError::InvalidName)?;
        let stored = format!("{}_{}", Uuid::new_v4(), clean);

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&stored), bytes).await?;
        tracing::info!("Stored upload {} ({} bytes)", stored, bytes.len());
        Ok(stored)
    }

    /// Removes a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, stored_name: &str) -> Result<(), UploadError> {
        let clean = sanitize_file_name(stored_name).ok_or(UploadError::InvalidName)?;
        match tokio::fs::remove_file(self.dir.join(clean)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Upload {} already missing on disk", stored_name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
