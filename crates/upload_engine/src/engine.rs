use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use upload_core::{
    update, wants_preview, Category, Effect, FileEntry, FileId, Msg, RawFile, UploadError,
    UploadState, UploadViewModel,
};
use upload_logging::{upload_debug, upload_info};

use crate::simulate::{run_processing, run_upload, ChannelProgressSink};
use crate::{
    EngineError, EngineEvent, IncomingFile, PreviewRegistry, SimulationSettings, StatusChange,
};

enum Command {
    Add {
        files: Vec<IncomingFile>,
        category: Category,
        reply: oneshot::Sender<Vec<FileEntry>>,
    },
    Remove {
        file_id: FileId,
        reply: oneshot::Sender<()>,
    },
    Retry {
        file_id: FileId,
        reply: oneshot::Sender<()>,
    },
    ClearCompleted {
        reply: oneshot::Sender<()>,
    },
    Fail {
        file_id: FileId,
        error: UploadError,
        reply: oneshot::Sender<()>,
    },
    LivePreviews {
        reply: oneshot::Sender<usize>,
    },
}

/// Command surface and read side of the upload store.
///
/// The store itself runs as a single task that owns the file collection; every handle clone
/// talks to that task. The task stops on [`UploadHandle::shutdown`] or once every handle is
/// dropped.
#[derive(Clone)]
pub struct UploadHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    view_rx: watch::Receiver<UploadViewModel>,
    status_tx: broadcast::Sender<StatusChange>,
    root: CancellationToken,
}

impl UploadHandle {
    /// Starts the store task on the current tokio runtime.
    pub fn spawn(settings: SimulationSettings) -> Result<Self, EngineError> {
        settings.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(UploadViewModel::default());
        let (status_tx, _) = broadcast::channel(settings.status_channel_capacity);
        let root = CancellationToken::new();

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let service = UploadService {
            state: UploadState::new(),
            previews: PreviewRegistry::new(),
            simulations: HashMap::new(),
            settings: Arc::new(settings),
            rng,
            root: root.clone(),
            sink: ChannelProgressSink::new(event_tx),
            view_tx,
            status_tx: status_tx.clone(),
        };
        tokio::spawn(service.run(cmd_rx, event_rx));

        Ok(Self {
            cmd_tx,
            view_rx,
            status_tx,
            root,
        })
    }

    /// Adds one entry per file and starts a simulation for each. Returns the created entries.
    pub async fn add_files(
        &self,
        files: Vec<IncomingFile>,
        category: Category,
    ) -> Result<Vec<FileEntry>, EngineError> {
        self.request(|reply| Command::Add {
            files,
            category,
            reply,
        })
        .await
    }

    pub async fn remove_file(&self, file_id: FileId) -> Result<(), EngineError> {
        self.request(|reply| Command::Remove { file_id, reply }).await
    }

    pub async fn retry_file(&self, file_id: FileId) -> Result<(), EngineError> {
        self.request(|reply| Command::Retry { file_id, reply }).await
    }

    pub async fn clear_completed(&self) -> Result<(), EngineError> {
        self.request(|reply| Command::ClearCompleted { reply }).await
    }

    /// Marks a pending or uploading file as failed with `message`.
    pub async fn fail_file(
        &self,
        file_id: FileId,
        message: impl Into<String>,
    ) -> Result<(), EngineError> {
        let error = UploadError::new(message);
        self.request(|reply| Command::Fail {
            file_id,
            error,
            reply,
        })
        .await
    }

    /// Number of previews currently held by the store.
    pub async fn live_previews(&self) -> Result<usize, EngineError> {
        self.request(|reply| Command::LivePreviews { reply }).await
    }

    /// Latest published view of the whole collection.
    pub fn snapshot(&self) -> UploadViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadViewModel> {
        self.view_rx.clone()
    }

    pub fn status_events(&self) -> broadcast::Receiver<StatusChange> {
        self.status_tx.subscribe()
    }

    /// Resolves once every file is completed or failed.
    pub async fn wait_until_settled(&self) -> Result<UploadViewModel, EngineError> {
        let mut rx = self.view_rx.clone();
        let view = rx
            .wait_for(UploadViewModel::is_settled)
            .await
            .map_err(|_| EngineError::ServiceStopped)?;
        Ok((*view).clone())
    }

    /// Stops the store and every running simulation.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(reply))
            .map_err(|_| EngineError::ServiceStopped)?;
        rx.await.map_err(|_| EngineError::ServiceStopped)
    }
}

struct UploadService {
    state: UploadState,
    previews: PreviewRegistry,
    simulations: HashMap<FileId, CancellationToken>,
    settings: Arc<SimulationSettings>,
    rng: StdRng,
    root: CancellationToken,
    sink: ChannelProgressSink,
    view_tx: watch::Sender<UploadViewModel>,
    status_tx: broadcast::Sender<StatusChange>,
}

impl UploadService {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut event_rx: mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        upload_info!("Upload service started");
        let root = self.root.clone();
        loop {
            tokio::select! {
                biased;
                _ = root.cancelled() => break,
                command = cmd_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = event_rx.recv() => {
                    self.dispatch(event.into());
                }
            }
        }

        self.root.cancel();
        let dropped = self.previews.release_all();
        upload_info!(
            "Upload service stopped ({} file(s), {} preview(s) dropped)",
            self.state.total_count(),
            dropped
        );
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Add {
                files,
                category,
                reply,
            } => {
                let count = files.len();
                let raw = files.into_iter().map(|file| self.admit(file)).collect();
                let effects = self.dispatch(Msg::FilesAdded {
                    files: raw,
                    category,
                });
                let created: Vec<FileEntry> = effects
                    .iter()
                    .filter_map(|effect| match effect {
                        Effect::StartSimulation { file_id, .. } => {
                            self.state.entry(*file_id).cloned()
                        }
                        _ => None,
                    })
                    .collect();
                upload_info!("Added {} file(s) to {}", count, category);
                let _ = reply.send(created);
            }
            Command::Remove { file_id, reply } => {
                self.dispatch(Msg::RemoveClicked { file_id });
                let _ = reply.send(());
            }
            Command::Retry { file_id, reply } => {
                self.dispatch(Msg::RetryClicked { file_id });
                let _ = reply.send(());
            }
            Command::ClearCompleted { reply } => {
                self.dispatch(Msg::ClearCompletedClicked);
                let _ = reply.send(());
            }
            Command::Fail {
                file_id,
                error,
                reply,
            } => {
                self.dispatch(Msg::FailRequested { file_id, error });
                let _ = reply.send(());
            }
            Command::LivePreviews { reply } => {
                let _ = reply.send(self.previews.live_count());
            }
        }
    }

    fn admit(&mut self, file: IncomingFile) -> RawFile {
        let raw = RawFile::new(file.name, file.size, file.mime_type);
        if wants_preview(&raw.mime_type) {
            let preview = self.previews.acquire(file.content);
            raw.with_preview(preview)
        } else {
            raw
        }
    }

    /// Applies one message, publishes the new view if anything changed, then runs the effects.
    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        if self.state.consume_dirty() {
            self.view_tx.send_replace(self.state.view());
        }
        for effect in &effects {
            self.run_effect(effect);
        }
        effects
    }

    fn run_effect(&mut self, effect: &Effect) {
        match *effect {
            Effect::StartSimulation { file_id, run } => {
                let cancel = self.track(file_id);
                let settings = Arc::clone(&self.settings);
                let sink = self.sink.clone();
                let mut rng = self.fork_rng();
                tokio::spawn(async move {
                    run_upload(file_id, run, &settings, &mut rng, &sink, &cancel).await;
                });
            }
            Effect::BeginProcessing { file_id, run } => {
                let cancel = self.track(file_id);
                let settings = Arc::clone(&self.settings);
                let sink = self.sink.clone();
                let mut rng = self.fork_rng();
                tokio::spawn(async move {
                    run_processing(file_id, run, &settings, &mut rng, &sink, &cancel).await;
                });
            }
            Effect::StopSimulation { file_id } => {
                if let Some(cancel) = self.simulations.remove(&file_id) {
                    cancel.cancel();
                }
            }
            Effect::ReleasePreview { preview } => {
                self.previews.release(preview);
            }
            Effect::StatusChanged { file_id, status } => {
                upload_debug!("File {} is now {}", file_id, status);
                // No subscribers is fine.
                let _ = self.status_tx.send(StatusChange { file_id, status });
            }
        }
    }

    /// Registers a fresh cancellation token for the file, cancelling any previous one.
    fn track(&mut self, file_id: FileId) -> CancellationToken {
        let cancel = self.root.child_token();
        if let Some(previous) = self.simulations.insert(file_id, cancel.clone()) {
            previous.cancel();
        }
        cancel
    }

    fn fork_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}
