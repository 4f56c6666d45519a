use crate::common::{
    event_channel, Effect, Emitter, Event, Events, FileSelection, FormState, TaskEpoch,
    VidupResult,
};
use crate::config::ClientConfig;
use crate::native::controller::UploadController;
use crate::native::poller::{PollHandle, StatusPoller};
use futures::StreamExt;
use log::{debug, error};

/// The upload form: a file selection, one upload at a time, and the status of
/// the last accepted processing task.
///
/// Uploads and polls run as tasks on the tokio runtime; their results come
/// back as [`Event`]s which are applied one by one by [`UploadForm::next_event`].
/// Dropping the form cancels polling. An upload already on the wire is left
/// to finish on its own.
pub struct UploadForm {
    config: ClientConfig,
    client: reqwest::Client,
    controller: UploadController,
    state: FormState,
    emitter: Emitter,
    events: Events,
    poll: Option<PollHandle>,
}

impl UploadForm {
    pub fn new(config: ClientConfig) -> VidupResult<Self> {
        let client = config.build_client()?;
        Self::with_client(config, client)
    }

    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> VidupResult<Self> {
        let (emitter, events) = event_channel();
        let controller = UploadController::new(client.clone(), &config, emitter.clone())?;

        Ok(Self {
            config,
            client,
            controller,
            state: FormState::default(),
            emitter,
            events,
            poll: None,
        })
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().map_or(false, |poll| !poll.is_finished())
    }

    /// Replaces the current selection.
    pub fn select(&mut self, selection: FileSelection) {
        self.state.select(selection);
    }

    /// Starts uploading the current selection in the background.
    ///
    /// Fails with `VidupError::UploadInFlight` while a previous upload has
    /// not completed. Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> VidupResult<()> {
        let files = self.state.begin_upload()?;
        let controller = self.controller.clone();
        let emitter = self.emitter.clone();

        tokio::spawn(async move {
            let result = controller.submit(&files).await;
            emitter.emit(Event::Uploaded { result });
        });

        Ok(())
    }

    /// Waits for the next completion and applies it.
    pub async fn next_event(&mut self) -> &FormState {
        // `self.emitter` keeps the channel open, so this only waits
        if let Some(event) = self.events.next().await {
            self.handle(event);
        }

        &self.state
    }

    /// Applies events until no upload is running and no task is being polled.
    pub async fn run_until_settled(&mut self) -> &FormState {
        while !self.state.is_settled() {
            self.next_event().await;
        }

        &self.state
    }

    /// Tears the form down, cancelling any scheduled poll.
    pub fn close(self) {}

    fn handle(&mut self, event: Event) {
        match self.state.apply(event) {
            Effect::None => {}
            Effect::StartPolling { task_id, epoch } => self.start_polling(&task_id, epoch),
            Effect::StopPolling => self.poll = None,
        }
    }

    fn start_polling(&mut self, task_id: &str, epoch: TaskEpoch) {
        // the previous task, if any, is superseded
        self.poll = None;

        match StatusPoller::new(
            self.client.clone(),
            &self.config,
            task_id,
            epoch,
            self.emitter.clone(),
        ) {
            Ok(poller) => self.poll = Some(poller.spawn()),
            Err(e) => {
                error!("cannot poll task {}: {}", task_id, e);
                self.state.halt_polling();
            }
        }
    }
}

impl Drop for UploadForm {
    fn drop(&mut self) {
        if let Some(poll) = self.poll.take() {
            debug!("form torn down, cancelling poll of task {}", poll.epoch());
        }
    }
}
