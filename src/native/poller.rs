use crate::common::{Emitter, Event, TaskEpoch, TaskStatusReply, VidupError, VidupResult};
use crate::config::ClientConfig;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::Url;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

/// Polls the status endpoint of one task until it reports a terminal state.
#[derive(Debug)]
pub struct StatusPoller {
    client: reqwest::Client,
    url: Url,
    interval: Duration,
    epoch: TaskEpoch,
    emitter: Emitter,
}

impl StatusPoller {
    pub fn new(
        client: reqwest::Client,
        config: &ClientConfig,
        task_id: &str,
        epoch: TaskEpoch,
        emitter: Emitter,
    ) -> VidupResult<Self> {
        Ok(Self {
            client,
            url: config.status_url(task_id)?,
            interval: config.poll_interval(),
            epoch,
            emitter,
        })
    }

    /// Runs the poll loop on the current runtime.
    pub fn spawn(self) -> PollHandle {
        let epoch = self.epoch;
        PollHandle {
            epoch,
            handle: tokio::spawn(self.run()),
        }
    }

    async fn run(self) {
        // first request one full interval after the task id is known
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            debug!("polling {} ({})", self.url, self.epoch);

            // a reply slower than one interval counts as a failed poll
            let result = match timeout(self.interval, self.fetch()).await {
                Ok(result) => result,
                Err(_) => Err(VidupError::PollTimeout(self.interval)),
            };

            let terminal = matches!(&result, Ok(reply) if reply.state.is_terminal());

            let delivered = self.emitter.emit(Event::Polled {
                epoch: self.epoch,
                result,
            });

            if terminal || !delivered {
                break;
            }
        }

        debug!("stopped polling {} ({})", self.url, self.epoch);
    }

    async fn fetch(&self) -> VidupResult<TaskStatusReply> {
        let resp = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VidupError::Status { status, body });
        }

        Ok(resp.json().await?)
    }
}

/// Running poll loop. Dropping the handle cancels it, including a request
/// that is still in flight.
#[derive(Debug)]
pub struct PollHandle {
    epoch: TaskEpoch,
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn epoch(&self) -> TaskEpoch {
        self.epoch
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
