use reqwest::StatusCode;
use thiserror::Error as TError;

#[derive(TError, Debug)]
pub enum VidupError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("no status reply within {0:?}")]
    PollTimeout(std::time::Duration),

    #[error("an upload is already in flight")]
    UploadInFlight,

    #[error("{0} is not a regular file")]
    NotAFile(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for VidupError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for VidupError {
    fn from(s: &str) -> Self {
        Self::Other(s.into())
    }
}

pub type VidupResult<T> = Result<T, VidupError>;
