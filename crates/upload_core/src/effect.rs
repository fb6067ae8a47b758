use crate::{FileId, FileStatus, PreviewId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start ticking uploads for this run.
    StartSimulation { file_id: FileId, run: u32 },
    /// Upload reached 100%; stop ticking and schedule the processing delay.
    BeginProcessing { file_id: FileId, run: u32 },
    /// Cancel and forget whatever simulation task the file still has.
    StopSimulation { file_id: FileId },
    /// The owning entry left the collection.
    ReleasePreview { preview: PreviewId },
    /// A file moved to a new status.
    StatusChanged { file_id: FileId, status: FileStatus },
}
