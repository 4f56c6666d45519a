use crate::common::progress::{clamp_percent, percent};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Reply of `POST /process-video/` once the upload is accepted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadAccepted {
    /// Human readable message shown above the processing status
    pub message: String,

    /// Identifier used to poll `GET /task-status/{task_id}`
    pub task_id: String,
}

/// Processing task state as reported by the server.
///
/// Names follow the backend's conventions; anything unknown is kept verbatim
/// and treated as still in progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Started,
    Progress,
    Retry,
    Revoked,
    Success,
    Failure,
    Other(String),
}

impl TaskState {
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Started => "STARTED",
            TaskState::Progress => "PROGRESS",
            TaskState::Retry => "RETRY",
            TaskState::Revoked => "REVOKED",
            TaskState::Success => "SUCCESS",
            TaskState::Failure => "FAILURE",
            TaskState::Other(s) => s,
        }
    }

    /// Only `SUCCESS` and `FAILURE` end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => TaskState::Pending,
            "STARTED" => TaskState::Started,
            "PROGRESS" => TaskState::Progress,
            "RETRY" => TaskState::Retry,
            "REVOKED" => TaskState::Revoked,
            "SUCCESS" => TaskState::Success,
            "FAILURE" => TaskState::Failure,
            _ => TaskState::Other(s),
        }
    }
}

impl From<&str> for TaskState {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply of `GET /task-status/{task_id}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TaskStatusReply {
    pub state: TaskState,

    /// Processing progress, 0..=100
    pub progress: u8,
}

impl TaskStatusReply {
    pub fn new(state: impl Into<TaskState>, progress: u8) -> Self {
        Self {
            state: state.into(),
            progress: progress.min(100),
        }
    }
}

// Some workers report `current`/`total` frame counters instead of `progress`,
// and queued tasks come back with no meta at all.
#[derive(Deserialize)]
struct RawTaskStatus {
    state: TaskState,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    current: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
}

impl<'de> Deserialize<'de> for TaskStatusReply {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawTaskStatus::deserialize(deserializer)?;

        let progress = match (raw.progress, raw.current, raw.total) {
            (Some(p), _, _) => clamp_percent(p),
            (None, Some(current), Some(total)) => percent(current, total),
            _ => 0,
        };

        Ok(TaskStatusReply {
            state: raw.state,
            progress,
        })
    }
}
