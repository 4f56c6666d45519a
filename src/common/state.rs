use crate::common::event::Event;
use crate::common::progress::percent;
use crate::{FileSelection, TaskState, VidupError, VidupResult};
use log::{debug, error, info, warn};
use std::fmt;

/// Generation of the task being followed. Every accepted upload gets a new
/// one, so poll results that belong to a superseded task can be told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskEpoch(u64);

impl TaskEpoch {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TaskEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPhase {
    /// No task id yet.
    Idle,

    /// Task id known, last observed state not terminal.
    Polling { task_id: String, epoch: TaskEpoch },

    /// `SUCCESS` or `FAILURE` observed. Only a new upload leaves this phase.
    Terminal { task_id: String, epoch: TaskEpoch },
}

impl Default for TaskPhase {
    fn default() -> Self {
        TaskPhase::Idle
    }
}

/// What the owner of the state must do after applying an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start polling `task_id`, superseding whatever was polled before.
    StartPolling { task_id: String, epoch: TaskEpoch },
    StopPolling,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    progress_before: u8,
}

/// Everything the upload form shows.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    selection: FileSelection,
    upload_progress: u8,
    processing_message: Option<String>,
    phase: TaskPhase,
    epoch: TaskEpoch,
    task_status: Option<TaskState>,
    task_progress: u8,
    upload_error: Option<String>,
    in_flight: Option<InFlight>,
}

impl FormState {
    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn processing_message(&self) -> Option<&str> {
        self.processing_message.as_deref()
    }

    pub fn phase(&self) -> &TaskPhase {
        &self.phase
    }

    pub fn task_id(&self) -> Option<&str> {
        match &self.phase {
            TaskPhase::Idle => None,
            TaskPhase::Polling { task_id, .. } | TaskPhase::Terminal { task_id, .. } => {
                Some(task_id)
            }
        }
    }

    pub fn task_status(&self) -> Option<&TaskState> {
        self.task_status.as_ref()
    }

    pub fn task_progress(&self) -> u8 {
        self.task_progress
    }

    /// Message of the last failed upload, cleared by the next submission.
    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.phase, TaskPhase::Polling { .. })
    }

    /// Nothing in flight: no upload running and no task being polled.
    pub fn is_settled(&self) -> bool {
        !self.is_uploading() && !self.is_polling()
    }

    pub fn select(&mut self, selection: FileSelection) {
        self.selection = selection;
    }

    /// Marks an upload as started and hands out the files to send.
    pub fn begin_upload(&mut self) -> VidupResult<FileSelection> {
        if self.in_flight.is_some() {
            return Err(VidupError::UploadInFlight);
        }

        self.in_flight = Some(InFlight {
            progress_before: self.upload_progress,
        });
        self.upload_error = None;

        Ok(self.selection.clone())
    }

    /// Gives up on the current task without a terminal status.
    pub(crate) fn halt_polling(&mut self) {
        if let TaskPhase::Polling { task_id, epoch } = &self.phase {
            self.phase = TaskPhase::Terminal {
                task_id: task_id.clone(),
                epoch: *epoch,
            };
        }
    }

    pub fn apply(&mut self, event: Event) -> Effect {
        match event {
            Event::UploadProgress { loaded, total } => {
                if self.in_flight.is_some() {
                    self.upload_progress = percent(loaded, total);
                }
                Effect::None
            }
            Event::Uploaded { result } => self.finish_upload(result),
            Event::Polled { epoch, result } => {
                let task_id = match &self.phase {
                    TaskPhase::Polling {
                        task_id,
                        epoch: current,
                    } if *current == epoch => task_id.clone(),
                    _ => {
                        debug!("dropping status of superseded task {}", epoch);
                        return Effect::None;
                    }
                };

                match result {
                    Ok(reply) => {
                        let terminal = reply.state.is_terminal();
                        self.task_status = Some(reply.state);
                        self.task_progress = reply.progress;

                        if terminal {
                            info!(
                                "task {} finished with {}",
                                task_id,
                                self.task_status.as_ref().map(TaskState::as_str).unwrap_or("")
                            );
                            self.phase = TaskPhase::Terminal { task_id, epoch };
                            Effect::StopPolling
                        } else {
                            Effect::None
                        }
                    }
                    Err(e) => {
                        warn!("error fetching status of task {}: {}", task_id, e);
                        Effect::None
                    }
                }
            }
        }
    }

    fn finish_upload(&mut self, result: VidupResult<crate::UploadAccepted>) -> Effect {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => {
                debug!("ignoring upload result with no upload in flight");
                return Effect::None;
            }
        };

        match result {
            Ok(accepted) => {
                self.processing_message = Some(accepted.message);
                self.upload_progress = 0;
                self.selection = FileSelection::empty();
                self.task_status = None;
                self.task_progress = 0;

                if accepted.task_id.is_empty() {
                    warn!("upload accepted without a task id, nothing to poll");
                    self.phase = TaskPhase::Idle;
                    return Effect::StopPolling;
                }

                self.epoch = self.epoch.next();
                info!(
                    "upload accepted, following task {} ({})",
                    accepted.task_id, self.epoch
                );
                self.phase = TaskPhase::Polling {
                    task_id: accepted.task_id.clone(),
                    epoch: self.epoch,
                };

                Effect::StartPolling {
                    task_id: accepted.task_id,
                    epoch: self.epoch,
                }
            }
            Err(e) => {
                error!("error uploading files: {}", e);
                self.upload_progress = in_flight.progress_before;
                self.upload_error = Some(e.to_string());
                Effect::None
            }
        }
    }
}
