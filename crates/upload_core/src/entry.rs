use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::Category;

pub type FileId = u64;

/// Handle to a decoded preview held by the engine's preview registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PreviewId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[default]
    Pending,
    Uploading,
    Processing,
    Completed,
    Error,
}

impl FileStatus {
    /// Uploading or processing; collaborators disable conflicting actions while any file is active.
    pub fn is_active(self) -> bool {
        matches!(self, FileStatus::Uploading | FileStatus::Processing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FileStatus::Completed | FileStatus::Error)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Pending => write!(f, "pending"),
            FileStatus::Uploading => write!(f, "uploading"),
            FileStatus::Processing => write!(f, "processing"),
            FileStatus::Completed => write!(f, "completed"),
            FileStatus::Error => write!(f, "error"),
        }
    }
}

/// The only per-file failure. Local to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct UploadError {
    pub message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A file handed over by a drop zone or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    /// Preview acquired by the engine before the file entered the store.
    pub preview: Option<PreviewId>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: PreviewId) -> Self {
        self.preview = Some(preview);
        self
    }
}

/// Only image uploads get a preview.
pub fn wants_preview(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub category: Category,
    pub status: FileStatus,
    /// Percent in `0..=100`. Never 100 while uploading.
    pub progress: u8,
    pub records: Option<u32>,
    pub error: Option<UploadError>,
    pub preview: Option<PreviewId>,
    /// Simulation generation; bumped on every retry so late messages from an old run are dropped.
    pub run: u32,
}

impl FileEntry {
    pub(crate) fn new(id: FileId, raw: RawFile, category: Category) -> Self {
        Self {
            id,
            name: raw.name,
            size: raw.size,
            mime_type: raw.mime_type,
            category,
            status: FileStatus::Pending,
            progress: 0,
            records: None,
            error: None,
            preview: raw.preview,
            run: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{wants_preview, FileStatus};

    #[test]
    fn only_images_want_previews() {
        assert!(wants_preview("image/png"));
        assert!(wants_preview("image/jpeg"));
        assert!(!wants_preview("application/pdf"));
        assert!(!wants_preview("text/csv"));
    }

    #[test]
    fn active_statuses() {
        assert!(FileStatus::Uploading.is_active());
        assert!(FileStatus::Processing.is_active());
        assert!(!FileStatus::Pending.is_active());
        assert!(!FileStatus::Completed.is_active());
        assert!(FileStatus::Error.is_terminal());
        assert!(!FileStatus::Processing.is_terminal());
    }
}
