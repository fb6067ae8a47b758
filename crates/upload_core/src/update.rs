use crate::state::TickOutcome;
use crate::{Effect, FileId, FileStatus, Msg, UploadError, UploadState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: UploadState, msg: Msg) -> (UploadState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded { files, category } => {
            let added = state.add_files(files, category);
            let mut effects = Vec::with_capacity(added.len() * 2);
            for file_id in added {
                effects.push(Effect::StatusChanged {
                    file_id,
                    status: FileStatus::Pending,
                });
                effects.push(Effect::StartSimulation { file_id, run: 1 });
            }
            effects
        }
        Msg::RemoveClicked { file_id } => match state.remove(file_id) {
            Some(entry) => {
                let mut effects = vec![Effect::StopSimulation { file_id }];
                if let Some(preview) = entry.preview {
                    effects.push(Effect::ReleasePreview { preview });
                }
                effects
            }
            None => Vec::new(),
        },
        Msg::RetryClicked { file_id } => match state.reset_for_retry(file_id) {
            // The old run may still be ticking; stop it before the new one starts.
            Some(run) => vec![
                Effect::StopSimulation { file_id },
                Effect::StatusChanged {
                    file_id,
                    status: FileStatus::Pending,
                },
                Effect::StartSimulation { file_id, run },
            ],
            None => Vec::new(),
        },
        Msg::ClearCompletedClicked => state
            .clear_completed()
            .into_iter()
            .filter_map(|entry| entry.preview)
            .map(|preview| Effect::ReleasePreview { preview })
            .collect(),
        Msg::FailRequested { file_id, error } => fail(&mut state, file_id, None, error),
        Msg::UploadStarted { file_id, run } => {
            if state.start_upload(file_id, run) {
                vec![Effect::StatusChanged {
                    file_id,
                    status: FileStatus::Uploading,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::UploadTick {
            file_id,
            run,
            increment,
        } => match state.apply_tick(file_id, run, increment) {
            TickOutcome::ReachedProcessing => vec![
                Effect::StatusChanged {
                    file_id,
                    status: FileStatus::Processing,
                },
                Effect::BeginProcessing { file_id, run },
            ],
            TickOutcome::Advanced | TickOutcome::Ignored => Vec::new(),
        },
        Msg::ProcessingFinished {
            file_id,
            run,
            records,
        } => {
            if state.complete(file_id, run, records) {
                vec![
                    Effect::StatusChanged {
                        file_id,
                        status: FileStatus::Completed,
                    },
                    Effect::StopSimulation { file_id },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::UploadFailed {
            file_id,
            run,
            error,
        } => fail(&mut state, file_id, Some(run), error),
    };

    (state, effects)
}

fn fail(
    state: &mut UploadState,
    file_id: FileId,
    run: Option<u32>,
    error: UploadError,
) -> Vec<Effect> {
    if state.fail(file_id, run, error) {
        vec![
            Effect::StatusChanged {
                file_id,
                status: FileStatus::Error,
            },
            Effect::StopSimulation { file_id },
        ]
    } else {
        Vec::new()
    }
}
