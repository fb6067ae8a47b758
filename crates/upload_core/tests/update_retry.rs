use upload_core::{update, Category, Effect, FileStatus, Msg, RawFile, UploadError, UploadState};

fn failed_file() -> UploadState {
    let (state, _) = update(
        UploadState::new(),
        Msg::FilesAdded {
            files: vec![RawFile::new("mail.eml", 512, "message/rfc822")],
            category: Category::Emails,
        },
    );
    let (state, _) = update(state, Msg::UploadStarted { file_id: 1, run: 1 });
    let (state, _) = update(
        state,
        Msg::UploadTick {
            file_id: 1,
            run: 1,
            increment: 40,
        },
    );
    let (state, _) = update(
        state,
        Msg::UploadFailed {
            file_id: 1,
            run: 1,
            error: UploadError::new("Upload failed"),
        },
    );
    state
}

#[test]
fn retry_resets_error_to_pending() {
    let state = failed_file();
    assert_eq!(state.entry(1).unwrap().status, FileStatus::Error);

    let (state, effects) = update(state, Msg::RetryClicked { file_id: 1 });
    let entry = state.entry(1).unwrap();
    assert_eq!(entry.status, FileStatus::Pending);
    assert_eq!(entry.progress, 0);
    assert_eq!(entry.error, None);
    assert_eq!(entry.run, 2);
    assert_eq!(
        effects,
        vec![
            Effect::StopSimulation { file_id: 1 },
            Effect::StatusChanged {
                file_id: 1,
                status: FileStatus::Pending
            },
            Effect::StartSimulation { file_id: 1, run: 2 },
        ]
    );
}

#[test]
fn retried_file_completes_on_new_run() {
    let state = failed_file();
    let (state, _) = update(state, Msg::RetryClicked { file_id: 1 });
    let (mut state, _) = update(state, Msg::UploadStarted { file_id: 1, run: 2 });
    for _ in 0..4 {
        let (next, _) = update(
            state,
            Msg::UploadTick {
                file_id: 1,
                run: 2,
                increment: 25,
            },
        );
        state = next;
    }
    let (state, _) = update(
        state,
        Msg::ProcessingFinished {
            file_id: 1,
            run: 2,
            records: 640,
        },
    );

    let entry = state.entry(1).unwrap();
    assert_eq!(entry.status, FileStatus::Completed);
    assert_eq!(entry.progress, 100);
    assert_eq!(entry.records, Some(640));
}

#[test]
fn stale_run_messages_are_dropped_after_retry() {
    let (state, _) = update(
        UploadState::new(),
        Msg::FilesAdded {
            files: vec![RawFile::new("jan.csv", 10, "text/csv")],
            category: Category::Transactions,
        },
    );
    let (state, _) = update(state, Msg::UploadStarted { file_id: 1, run: 1 });
    let (state, _) = update(state, Msg::RetryClicked { file_id: 1 });
    let (mut state, _) = update(state, Msg::UploadStarted { file_id: 1, run: 2 });
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::UploadTick {
            file_id: 1,
            run: 1,
            increment: 50,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.entry(1).unwrap().progress, 0);
    assert!(!state.consume_dirty());

    let (state, effects) = update(
        state,
        Msg::UploadFailed {
            file_id: 1,
            run: 1,
            error: UploadError::new("old run"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.entry(1).unwrap().status, FileStatus::Uploading);
}

#[test]
fn retry_from_completed_restarts_the_run() {
    let (state, _) = update(
        UploadState::new(),
        Msg::FilesAdded {
            files: vec![RawFile::new("jan.csv", 10, "text/csv")],
            category: Category::Transactions,
        },
    );
    let (state, _) = update(state, Msg::UploadStarted { file_id: 1, run: 1 });
    let (state, _) = update(
        state,
        Msg::UploadTick {
            file_id: 1,
            run: 1,
            increment: 100,
        },
    );
    let (state, _) = update(
        state,
        Msg::ProcessingFinished {
            file_id: 1,
            run: 1,
            records: 100,
        },
    );
    let (state, _) = update(state, Msg::RetryClicked { file_id: 1 });

    let entry = state.entry(1).unwrap();
    assert_eq!(entry.status, FileStatus::Pending);
    assert_eq!(entry.records, None);
    assert_eq!(entry.progress, 0);
    assert_eq!(state.view().completed_count, 0);
}
