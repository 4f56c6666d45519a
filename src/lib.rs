//! Upload videos to a processing API and follow the resulting task.
//!
//! [`UploadForm`] is the entry point: select files, submit them as one
//! multipart request, then keep applying events until the processing task
//! reports `SUCCESS` or `FAILURE`.

mod common;
mod config;
mod native;

pub use common::*;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL};
pub use native::{PollHandle, StatusPoller, UploadController, UploadForm};
