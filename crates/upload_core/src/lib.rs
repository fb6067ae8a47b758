//! Upload core: pure state machine and view-model helpers for simulated file ingestion.
mod category;
mod effect;
mod entry;
mod msg;
mod state;
mod update;
mod view_model;

pub use category::{Category, UnknownCategory};
pub use effect::Effect;
pub use entry::{wants_preview, FileEntry, FileId, FileStatus, PreviewId, RawFile, UploadError};
pub use msg::Msg;
pub use state::UploadState;
pub use update::update;
pub use view_model::{FileRowView, UploadViewModel};
