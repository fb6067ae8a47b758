use crate::{Category, FileId, RawFile, UploadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Files dropped on (or picked for) a category zone.
    FilesAdded {
        files: Vec<RawFile>,
        category: Category,
    },
    /// User clicked remove on a file row.
    RemoveClicked { file_id: FileId },
    /// User clicked retry on a file row.
    RetryClicked { file_id: FileId },
    /// User cleared every completed row.
    ClearCompletedClicked,
    /// External error assignment, independent of any simulation run.
    FailRequested { file_id: FileId, error: UploadError },
    /// Engine started the simulation for a run.
    UploadStarted { file_id: FileId, run: u32 },
    /// Engine upload tick with a random progress increment.
    UploadTick {
        file_id: FileId,
        run: u32,
        increment: u8,
    },
    /// Engine finished the processing delay.
    ProcessingFinished {
        file_id: FileId,
        run: u32,
        records: u32,
    },
    /// Engine injected a synthetic failure.
    UploadFailed {
        file_id: FileId,
        run: u32,
        error: UploadError,
    },
}
