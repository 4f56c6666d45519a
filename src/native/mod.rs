mod controller;
mod file;
mod form;
mod poller;

pub use controller::UploadController;
pub use form::UploadForm;
pub use poller::{PollHandle, StatusPoller};
