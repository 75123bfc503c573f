//! Uploaded image storage.
//!
//! Images are written to a local directory as `{millis}_{filename}` and
//! referenced from records by a server-relative path such as
//! `/uploads/1718000000000_cessna.png`. Files are never overwritten and are
//! never removed when a record changes or goes away; the only deletion is
//! [`UploadDir::discard`], used to undo a write whose record mutation failed.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Characters allowed in a stored file name; everything else becomes `_`.
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("file name pattern is valid"));

/// Name used when an upload arrives without a usable file name.
const FALLBACK_FILE_NAME: &str = "image";

/// An image received with a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name as sent by the client.
    pub file_name: String,
    /// File content.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload from a client file name and its content.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Whether the upload carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The image reference a record should carry after a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Server-relative path, or empty when the record has no image.
    pub reference: String,
    /// Whether the file was written by this call.
    pub newly_written: bool,
}

/// Directory holding uploaded images.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
    url_prefix: String,
}

impl UploadDir {
    /// Create an upload directory rooted at `root`, served under `url_prefix`.
    ///
    /// The directory itself is created on the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory on disk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix of image references.
    #[must_use]
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Write an image and return its reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written, including when a file of the same name already exists.
    pub async fn save(&self, upload: &ImageUpload) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: self.root.clone(),
                source,
            })?;

        let name = stored_file_name(Utc::now().timestamp_millis(), &upload.file_name);
        let path = self.root.join(&name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| Error::Upload {
                path: path.clone(),
                source,
            })?;
        file.write_all(&upload.bytes)
            .await
            .map_err(|source| Error::Upload {
                path: path.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| Error::Upload {
            path: path.clone(),
            source,
        })?;

        info!(
            "Stored image {} ({} bytes)",
            path.display(),
            upload.bytes.len()
        );
        Ok(format!("{}/{}", self.url_prefix, name))
    }

    /// Decide the image reference for a record.
    ///
    /// A non-empty upload is written and its new reference returned;
    /// otherwise `existing` is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the upload fails.
    pub async fn resolve(
        &self,
        upload: Option<&ImageUpload>,
        existing: &str,
    ) -> Result<StoredImage> {
        match upload {
            Some(upload) if !upload.is_empty() => Ok(StoredImage {
                reference: self.save(upload).await?,
                newly_written: true,
            }),
            _ => Ok(StoredImage {
                reference: existing.to_string(),
                newly_written: false,
            }),
        }
    }

    /// Map an image reference to its file inside the directory.
    ///
    /// Returns `None` if the reference is not under the URL prefix or would
    /// leave the directory.
    #[must_use]
    pub fn path_for(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))?;
        self.path_for_name(name)
    }

    /// Map a bare file name to its path, rejecting anything but a single
    /// plain path component.
    #[must_use]
    pub fn path_for_name(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains('\0');
        plain.then(|| self.root.join(name))
    }

    /// Read a stored image by file name.
    ///
    /// Returns `None` if no such image exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_for_name(name) else {
            return Ok(None);
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Upload { path, source }),
        }
    }

    /// Remove an image written earlier in the same request.
    ///
    /// Failures are logged; the caller is already reporting a more relevant error.
    pub async fn discard(&self, reference: &str) {
        let Some(path) = self.path_for(reference) else {
            warn!("Not discarding image outside the uploads directory: {}", reference);
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Discarded image {}", path.display()),
            Err(e) => warn!("Failed to discard image {}: {}", path.display(), e),
        }
    }
}

/// Build the stored file name from the upload time and the client's file name.
fn stored_file_name(millis: i64, original: &str) -> String {
    format!("{millis}_{}", sanitize_file_name(original))
}

/// Reduce a client file name to a safe single path component.
fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_FILE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
