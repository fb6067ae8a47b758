use bytes::Bytes;
use upload_core::{FileId, FileStatus, Msg, UploadError};

/// A file as handed to the engine by a drop zone or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    /// Raw bytes. Only kept around when the file gets a preview.
    pub content: Bytes,
}

impl IncomingFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// A file whose content was not read.
    pub fn metadata_only(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            content: Bytes::new(),
        }
    }
}

/// Emitted by simulation tasks; applied to the store in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadStarted {
        file_id: FileId,
        run: u32,
    },
    UploadTick {
        file_id: FileId,
        run: u32,
        increment: u8,
    },
    ProcessingFinished {
        file_id: FileId,
        run: u32,
        records: u32,
    },
    UploadFailed {
        file_id: FileId,
        run: u32,
        error: UploadError,
    },
}

impl From<EngineEvent> for Msg {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::UploadStarted { file_id, run } => Msg::UploadStarted { file_id, run },
            EngineEvent::UploadTick {
                file_id,
                run,
                increment,
            } => Msg::UploadTick {
                file_id,
                run,
                increment,
            },
            EngineEvent::ProcessingFinished {
                file_id,
                run,
                records,
            } => Msg::ProcessingFinished {
                file_id,
                run,
                records,
            },
            EngineEvent::UploadFailed {
                file_id,
                run,
                error,
            } => Msg::UploadFailed {
                file_id,
                run,
                error,
            },
        }
    }
}

/// One status transition, broadcast to observers in the order it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub file_id: FileId,
    pub status: FileStatus,
}
