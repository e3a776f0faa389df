//! Local disk storage for uploaded files.
//!
//! Uploaded bytes are written into a single flat directory under a
//! server-generated name (`<uuid>.<ext>`). The mapping back to the client's
//! original filename lives only in the item records.

use actix_web::web::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::UploadFile;

/// A file part received in a multipart body.
#[derive(Debug, Clone, Default)]
pub struct MultipartFile {
    /// Filename from the part's Content-Disposition header
    pub original_filename: String,
    /// Full part content
    pub content: Bytes,
}

impl MultipartFile {
    pub fn new(original_filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        MultipartFile {
            original_filename: original_filename.into(),
            content: content.into(),
        }
    }

    /// True when the client left the file input empty.
    pub fn is_empty(&self) -> bool {
        self.original_filename.is_empty() || self.content.is_empty()
    }
}

/// Extract the extension of a filename: the text after the last `.`.
///
/// Returns an empty string when there is no `.` or when the extension holds
/// anything other than ASCII letters, digits, `-` or `_`. Stored names end up
/// in URL paths, so only characters that need no escaping are kept.
pub fn extract_ext(original_name: &str) -> &str {
    match original_name.rfind('.') {
        Some(pos) => {
            let ext = &original_name[pos + 1..];
            if ext.bytes().all(is_ext_byte) { ext } else { "" }
        }
        None => "",
    }
}

fn is_ext_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Generate a unique stored filename that keeps the original extension.
pub fn generate_store_name(original_name: &str) -> String {
    let uuid = Uuid::new_v4();
    match extract_ext(original_name) {
        "" => uuid.to_string(),
        ext => format!("{}.{}", uuid, ext),
    }
}

/// Writes uploaded files into the configured storage directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    file_dir: PathBuf,
}

impl FileStore {
    pub fn new(file_dir: impl Into<PathBuf>) -> Self {
        FileStore {
            file_dir: file_dir.into(),
        }
    }

    /// Base storage directory.
    pub fn file_dir(&self) -> &Path {
        &self.file_dir
    }

    /// Create the storage directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.file_dir)
            .await
            .map_err(|e| {
                AppError::FileSystem(format!(
                    "Failed to create storage directory {}: {}",
                    self.file_dir.display(),
                    e
                ))
            })?;
        info!("File storage directory: {}", self.file_dir.display());
        Ok(())
    }

    /// Full path of a stored file. Does not check that the file exists.
    pub fn full_path(&self, store_file_name: &str) -> PathBuf {
        self.file_dir.join(store_file_name)
    }

    /// Store one uploaded file.
    ///
    /// Returns `Ok(None)` without touching the disk when no file was selected.
    pub async fn store_file(&self, file: &MultipartFile) -> AppResult<Option<UploadFile>> {
        if file.is_empty() {
            return Ok(None);
        }

        let store_file_name = generate_store_name(&file.original_filename);
        let path = self.full_path(&store_file_name);

        tokio::fs::write(&path, &file.content).await.map_err(|e| {
            AppError::FileSystem(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(
            "Stored '{}' as {} ({} bytes)",
            file.original_filename,
            store_file_name,
            file.content.len()
        );

        Ok(Some(UploadFile::new(
            file.original_filename.clone(),
            store_file_name,
        )))
    }

    /// Store every non-empty file, keeping input order.
    pub async fn store_files(&self, files: &[MultipartFile]) -> AppResult<Vec<UploadFile>> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            if let Some(upload_file) = self.store_file(file).await? {
                stored.push(upload_file);
            }
        }
        Ok(stored)
    }
}
