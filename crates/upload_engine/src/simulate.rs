use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use upload_core::{FileId, UploadError};
use upload_logging::upload_trace;

use crate::{EngineEvent, SimulationSettings};

/// Message attached to synthetic upload failures.
pub const FAILURE_MESSAGE: &str = "Upload failed";

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Ticks one upload run until cancelled or until a synthetic failure fires.
///
/// Emits `UploadStarted` right away, then one `UploadTick` per interval. The run does not stop on
/// its own when progress reaches 100: the store cancels it when it moves the file to processing.
pub async fn run_upload(
    file_id: FileId,
    run: u32,
    settings: &SimulationSettings,
    rng: &mut StdRng,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) {
    sink.emit(EngineEvent::UploadStarted { file_id, run });

    let period = settings.tick_interval();
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                upload_trace!("Upload run {} for file {} cancelled", run, file_id);
                return;
            }
            _ = ticker.tick() => {}
        }

        if settings.failure_rate > 0.0 && rng.gen_bool(settings.failure_rate) {
            sink.emit(EngineEvent::UploadFailed {
                file_id,
                run,
                error: UploadError::new(FAILURE_MESSAGE),
            });
            return;
        }

        let increment = rng.gen_range(settings.increment_range());
        sink.emit(EngineEvent::UploadTick {
            file_id,
            run,
            increment,
        });
    }
}

/// Waits out a random processing delay, then reports a random record count.
pub async fn run_processing(
    file_id: FileId,
    run: u32,
    settings: &SimulationSettings,
    rng: &mut StdRng,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) {
    let delay = Duration::from_millis(rng.gen_range(settings.processing_range()));
    tokio::select! {
        _ = cancel.cancelled() => {
            upload_trace!("Processing run {} for file {} cancelled", run, file_id);
            return;
        }
        _ = tokio::time::sleep(delay) => {}
    }

    let records = rng.gen_range(settings.record_range());
    sink.emit(EngineEvent::ProcessingFinished {
        file_id,
        run,
        records,
    });
}
