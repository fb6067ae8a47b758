use std::collections::BTreeMap;

use crate::view_model::{FileRowView, UploadViewModel};
use crate::{Category, FileEntry, FileId, FileStatus, RawFile, UploadError};

/// Owns the file collection. Ids are allocated in increasing order, so map order is
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    files: BTreeMap<FileId, FileEntry>,
    last_file_id: FileId,
    dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Ignored,
    Advanced,
    ReachedProcessing,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> UploadViewModel {
        let files: Vec<FileRowView> = self.files.values().map(FileRowView::from).collect();
        UploadViewModel {
            completed_count: self.completed_count(),
            total_count: self.total_count(),
            is_uploading: self.is_uploading(),
            files,
        }
    }

    pub fn entry(&self, file_id: FileId) -> Option<&FileEntry> {
        self.files.get(&file_id)
    }

    pub fn completed_count(&self) -> usize {
        self.files
            .values()
            .filter(|entry| entry.status == FileStatus::Completed)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_uploading(&self) -> bool {
        self.files.values().any(|entry| entry.status.is_active())
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn next_file_id(&mut self) -> FileId {
        self.last_file_id += 1;
        self.last_file_id
    }

    pub(crate) fn add_files(&mut self, files: Vec<RawFile>, category: Category) -> Vec<FileId> {
        let mut added = Vec::with_capacity(files.len());
        for raw in files {
            let file_id = self.next_file_id();
            self.files
                .insert(file_id, FileEntry::new(file_id, raw, category));
            added.push(file_id);
        }
        if !added.is_empty() {
            self.mark_dirty();
        }
        added
    }

    pub(crate) fn remove(&mut self, file_id: FileId) -> Option<FileEntry> {
        let removed = self.files.remove(&file_id);
        if removed.is_some() {
            self.mark_dirty();
        }
        removed
    }

    /// Removes every completed entry, keeping the rest in order.
    pub(crate) fn clear_completed(&mut self) -> Vec<FileEntry> {
        let completed: Vec<FileId> = self
            .files
            .values()
            .filter(|entry| entry.status == FileStatus::Completed)
            .map(|entry| entry.id)
            .collect();
        let removed: Vec<FileEntry> = completed
            .into_iter()
            .filter_map(|file_id| self.files.remove(&file_id))
            .collect();
        if !removed.is_empty() {
            self.mark_dirty();
        }
        removed
    }

    /// Resets the entry to pending under a new run. Returns the new run.
    pub(crate) fn reset_for_retry(&mut self, file_id: FileId) -> Option<u32> {
        let entry = self.files.get_mut(&file_id)?;
        entry.status = FileStatus::Pending;
        entry.progress = 0;
        entry.records = None;
        entry.error = None;
        entry.run += 1;
        let run = entry.run;
        self.mark_dirty();
        Some(run)
    }

    pub(crate) fn start_upload(&mut self, file_id: FileId, run: u32) -> bool {
        let Some(entry) = self.current_run_mut(file_id, run) else {
            return false;
        };
        if entry.status != FileStatus::Pending {
            return false;
        }
        entry.status = FileStatus::Uploading;
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_tick(&mut self, file_id: FileId, run: u32, increment: u8) -> TickOutcome {
        let Some(entry) = self.current_run_mut(file_id, run) else {
            return TickOutcome::Ignored;
        };
        if entry.status != FileStatus::Uploading {
            return TickOutcome::Ignored;
        }
        let raw = u16::from(entry.progress) + u16::from(increment);
        let outcome = if raw >= 100 {
            entry.status = FileStatus::Processing;
            entry.progress = 100;
            TickOutcome::ReachedProcessing
        } else if increment > 0 {
            entry.progress = raw.min(99) as u8;
            TickOutcome::Advanced
        } else {
            return TickOutcome::Advanced;
        };
        self.mark_dirty();
        outcome
    }

    pub(crate) fn complete(&mut self, file_id: FileId, run: u32, records: u32) -> bool {
        let Some(entry) = self.current_run_mut(file_id, run) else {
            return false;
        };
        if entry.status != FileStatus::Processing {
            return false;
        }
        entry.status = FileStatus::Completed;
        entry.progress = 100;
        entry.records = Some(records);
        self.mark_dirty();
        true
    }

    /// Moves a pending or uploading entry to `Error`. `run` of `None` means the failure did not
    /// come from a simulation run and applies to whatever run is current.
    pub(crate) fn fail(&mut self, file_id: FileId, run: Option<u32>, error: UploadError) -> bool {
        let entry = match run {
            Some(run) => self.current_run_mut(file_id, run),
            None => self.files.get_mut(&file_id),
        };
        let Some(entry) = entry else {
            return false;
        };
        if !matches!(entry.status, FileStatus::Pending | FileStatus::Uploading) {
            return false;
        }
        entry.status = FileStatus::Error;
        entry.error = Some(error);
        self.mark_dirty();
        true
    }

    fn current_run_mut(&mut self, file_id: FileId, run: u32) -> Option<&mut FileEntry> {
        self.files
            .get_mut(&file_id)
            .filter(|entry| entry.run == run)
    }
}
