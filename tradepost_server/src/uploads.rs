//! Image storage for product listings.
//!
//! Uploaded files are renamed to `<32 random hex chars>.<ext>` before they touch the disk, so nothing a client
//! sends ever becomes part of a path. Only the extension of the original filename survives, and only if it is on
//! the allow-list.
use std::path::{Path, PathBuf};

use log::*;

use crate::errors::ServerError;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(dir: P, max_bytes: usize) -> Self {
        Self { dir: dir.into(), max_bytes }
    }

    pub async fn ensure_dir(&self) -> Result<(), ServerError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Returns the lowercased extension of `filename` if it is allow-listed.
    pub fn allowed_extension(filename: &str) -> Option<String> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
    }

    /// Writes the upload under a fresh random name and returns the stored filename.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, ServerError> {
        if original_name.is_empty() {
            return Err(ServerError::ValidationError("No file selected".to_string()));
        }
        let ext = Self::allowed_extension(original_name)
            .ok_or_else(|| ServerError::ValidationError(format!("File type of {original_name} is not allowed")))?;
        if bytes.is_empty() {
            return Err(ServerError::ValidationError("Uploaded file is empty".to_string()));
        }
        let stored = format!("{:032x}.{ext}", rand::random::<u128>());
        tokio::fs::write(self.dir.join(&stored), bytes).await?;
        debug!("🖼️ Stored {original_name} as {stored} ({} bytes)", bytes.len());
        Ok(stored)
    }

    /// Reads a stored image back, returning its bytes and content type.
    pub async fn fetch(&self, filename: &str) -> Result<(Vec<u8>, &'static str), ServerError> {
        // Stored names never contain separators, so anything with one is not ours.
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(ServerError::NoRecordFound(format!("No image named {filename}")));
        }
        let content_type = match Self::allowed_extension(filename).as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => return Err(ServerError::NoRecordFound(format!("No image named {filename}"))),
        };
        let bytes = tokio::fs::read(self.dir.join(filename))
            .await
            .map_err(|_| ServerError::NoRecordFound(format!("No image named {filename}")))?;
        Ok((bytes, content_type))
    }
}
