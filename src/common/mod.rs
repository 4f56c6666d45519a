mod error;
mod event;
mod json;
mod progress;
mod selection;
mod state;

pub use error::{VidupError, VidupResult};
pub use event::{event_channel, Emitter, Event, Events};
pub use json::{TaskState, TaskStatusReply, UploadAccepted};
pub use progress::percent;
pub use selection::{FileSelection, SelectedFile};
pub use state::{Effect, FormState, TaskEpoch, TaskPhase};

/// Upload endpoint, relative to the base url.
pub const PROCESS_ROUTE: &str = "process-video/";

/// Status endpoint, relative to the base url. The task id is the next segment.
pub const STATUS_ROUTE: &str = "task-status";

/// Multipart field name shared by every uploaded file.
pub const PART_NAME: &str = "file";
