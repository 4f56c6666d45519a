use crate::common::state::TaskEpoch;
use crate::{TaskStatusReply, UploadAccepted, VidupResult};
use futures::Stream;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Completion delivered to the form, applied one at a time.
#[derive(Debug)]
pub enum Event {
    /// Body bytes consumed by the transport so far.
    UploadProgress { loaded: u64, total: u64 },

    /// The upload request finished.
    Uploaded { result: VidupResult<UploadAccepted> },

    /// A status poll issued for the task of `epoch` finished.
    Polled {
        epoch: TaskEpoch,
        result: VidupResult<TaskStatusReply>,
    },
}

#[derive(Debug, Clone)]
pub struct Emitter(UnboundedSender<Event>);

impl Emitter {
    /// Returns `false` once the receiving side is gone.
    pub fn emit(&self, event: Event) -> bool {
        self.0.unbounded_send(event).is_ok()
    }
}

#[derive(Debug)]
pub struct Events(UnboundedReceiver<Event>);

impl Stream for Events {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().0).poll_next(cx)
    }
}

pub fn event_channel() -> (Emitter, Events) {
    let (sender, receiver) = unbounded();
    (Emitter(sender), Events(receiver))
}
