//! Disk-backed store for uploaded policy documents.
//!
//! Files live flat in one upload directory as `<file_id><ext>`, where the
//! extension is taken from the original filename at save and download time.
//! Ownership is tracked in the `file_info` table, not here.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Local file storage for uploaded documents.
#[derive(Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given upload directory.
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Create the upload directory and verify it is writable.
    ///
    /// A store that cannot write is fatal at startup, not per request.
    pub async fn init(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| {
                AppError::FileSystem(format!(
                    "Failed to create upload directory {}: {}",
                    self.upload_dir.display(),
                    e
                ))
            })?;

        let probe = self.upload_dir.join(".write_probe");
        tokio::fs::write(&probe, b"ok").await.map_err(|e| {
            AppError::FileSystem(format!(
                "Upload directory {} is not writable: {}",
                self.upload_dir.display(),
                e
            ))
        })?;
        tokio::fs::remove_file(&probe).await.ok();

        info!("File store initialized at {}", self.upload_dir.display());
        Ok(())
    }

    /// Extension of an original filename, dot included, or empty.
    pub fn extension_of(name: &str) -> String {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }

    /// On-disk path for a stored file.
    pub fn path_for(&self, file_id: &str, original_name: &str) -> PathBuf {
        self.upload_dir
            .join(format!("{}{}", file_id, Self::extension_of(original_name)))
    }

    /// A fresh temp path for staging an in-flight upload.
    pub fn stage_path(&self) -> PathBuf {
        self.upload_dir
            .join(format!(".upload_{}", Uuid::new_v4()))
    }

    /// Promote a staged upload to its final name under a fresh file id.
    /// The bytes are on disk under the final path before this returns.
    pub async fn commit(&self, staged: &Path, original_name: &str) -> AppResult<String> {
        let file_id = Uuid::new_v4().to_string();
        let final_path = self.path_for(&file_id, original_name);

        tokio::fs::rename(staged, &final_path)
            .await
            .map_err(|e| AppError::FileSystem(format!("Failed to store upload: {}", e)))?;

        info!("Stored {} as {}", original_name, final_path.display());
        Ok(file_id)
    }

    /// Drop a staged upload that will not be committed.
    pub async fn discard(&self, staged: &Path) {
        if let Err(e) = tokio::fs::remove_file(staged).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to discard staged upload {}: {}", staged.display(), e);
            }
        }
    }

    /// Best-effort delete of a stored file; a missing file is not an error.
    pub async fn delete(&self, file_id: &str, original_name: &str) {
        let path = self.path_for(file_id, original_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Deleted superseded file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
        }
    }

    /// Resolve a stored file to its path, failing Not-Found when the bytes
    /// are missing from disk.
    pub async fn resolve(&self, file_id: &str, original_name: &str) -> AppResult<PathBuf> {
        let path = self.path_for(file_id, original_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(AppError::NotFound("File".to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File".to_string()))
            }
            Err(e) => Err(AppError::FileSystem(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Get the content type for a file based on its extension.
    pub fn content_type_for_extension(ext: &str) -> &'static str {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => "application/pdf",
            "doc" => "application/msword",
            "docx" => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            "xls" => "application/vnd.ms-excel",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "csv" => "text/csv",
            "txt" => "text/plain",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "json" => "application/json",
            "xml" => "application/xml",
            "zip" => "application/zip",
            _ => "application/octet-stream",
        }
    }
}
