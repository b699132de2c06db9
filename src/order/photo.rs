//! Photo attachments and their temporary storage.
//!
//! A spooled photo lives in a uniquely named temporary file owned by a
//! [`TempPath`]. The file is deleted when the attachment is dropped, which
//! happens when the order leaves scope on every handler exit path.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_FILE_NAME: &str = "photo.jpg";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Uploaded photo: metadata plus bytes in memory or on disk.
#[derive(Debug)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub content_type: String,
    data: PhotoData,
}

#[derive(Debug)]
enum PhotoData {
    Memory(Bytes),
    Spooled { path: TempPath, len: u64 },
}

impl PhotoAttachment {
    /// Attachment held in memory.
    pub fn in_memory(file_name: Option<&str>, content_type: Option<&str>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name_or_default(file_name),
            content_type: content_type_or_default(content_type),
            data: PhotoData::Memory(bytes),
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        match &self.data {
            PhotoData::Memory(bytes) => bytes.len() as u64,
            PhotoData::Spooled { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Location of the temporary file, if the photo was spooled to disk.
    pub fn spool_path(&self) -> Option<&Path> {
        match &self.data {
            PhotoData::Memory(_) => None,
            PhotoData::Spooled { path, .. } => Some(&**path),
        }
    }

    /// Request body for sending. A spooled photo is streamed from disk
    /// rather than read back into memory.
    pub async fn body(&self) -> io::Result<reqwest::Body> {
        match &self.data {
            PhotoData::Memory(bytes) => Ok(reqwest::Body::from(bytes.clone())),
            PhotoData::Spooled { path, .. } => File::open(path).await.map(reqwest::Body::from),
        }
    }
}

/// A photo being streamed into a temporary file.
pub struct PhotoSpool {
    file: File,
    path: TempPath,
    len: u64,
}

impl PhotoSpool {
    /// Create a fresh temporary file in `dir` (or the OS temp dir).
    pub async fn create(dir: Option<PathBuf>) -> io::Result<Self> {
        let named = tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix("order-photo-");
            match dir {
                Some(dir) => builder.tempfile_in(dir),
                None => builder.tempfile(),
            }
        })
        .await
        .map_err(io::Error::other)??;

        let (file, path) = named.into_parts();
        Ok(Self {
            file: File::from_std(file),
            path,
            len: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        self.len += chunk.len() as u64;
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Flush and hand ownership of the file to an attachment.
    pub async fn finish(
        mut self,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> io::Result<PhotoAttachment> {
        self.file.flush().await?;
        drop(self.file);
        Ok(PhotoAttachment {
            file_name: file_name_or_default(file_name),
            content_type: content_type_or_default(content_type),
            data: PhotoData::Spooled {
                path: self.path,
                len: self.len,
            },
        })
    }
}

fn file_name_or_default(file_name: Option<&str>) -> String {
    file_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

fn content_type_or_default(content_type: Option<&str>) -> String {
    content_type
        .map(str::trim)
        .filter(|ct| ct.split_once('/').is_some_and(|(t, s)| !t.is_empty() && !s.is_empty()))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
