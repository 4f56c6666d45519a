use crate::common::{VidupError, VidupResult, PROCESS_ROUTE, STATUS_ROUTE};
use reqwest::IntoUrl;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Where the processing API lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl IntoUrl) -> VidupResult<Self> {
        let mut base_url = base_url.into_url()?;

        if base_url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base url", base_url).into());
        }

        // `Url::join` drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        })
    }

    /// Zero is bumped to one millisecond.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Applies to every request, the upload included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn process_url(&self) -> VidupResult<Url> {
        Ok(self.base_url.join(PROCESS_ROUTE)?)
    }

    pub fn status_url(&self, task_id: &str) -> VidupResult<Url> {
        let mut url = self.base_url.join(STATUS_ROUTE)?;

        url.path_segments_mut()
            .map_err(|_| VidupError::from("status url cannot be a base"))?
            .push(task_id);

        Ok(url)
    }

    pub fn build_client(&self) -> VidupResult<reqwest::Client> {
        let mut builder = reqwest::ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}
