use serde::Serialize;

use crate::{Category, FileEntry, FileId, FileStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UploadViewModel {
    pub files: Vec<FileRowView>,
    pub completed_count: usize,
    pub total_count: usize,
    /// Any file uploading or processing.
    pub is_uploading: bool,
}

impl UploadViewModel {
    pub fn file(&self, file_id: FileId) -> Option<&FileRowView> {
        self.files.iter().find(|row| row.file_id == file_id)
    }

    /// Every file is either completed or failed.
    pub fn is_settled(&self) -> bool {
        self.files.iter().all(|row| row.status.is_terminal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRowView {
    pub file_id: FileId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub category: Category,
    pub status: FileStatus,
    pub progress: u8,
    pub records: Option<u32>,
    pub error: Option<String>,
    pub has_preview: bool,
}

impl From<&FileEntry> for FileRowView {
    fn from(entry: &FileEntry) -> Self {
        Self {
            file_id: entry.id,
            name: entry.name.clone(),
            size: entry.size,
            mime_type: entry.mime_type.clone(),
            category: entry.category,
            status: entry.status,
            progress: entry.progress,
            records: entry.records,
            error: entry.error.as_ref().map(|err| err.message.clone()),
            has_preview: entry.preview.is_some(),
        }
    }
}
